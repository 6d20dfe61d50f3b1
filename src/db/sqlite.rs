use std::str::FromStr;

use chrono::{DateTime, Utc};
use funnel_sdk::{
    Lead, LeadStatus, LeadUpdate, NewLead, NewPurchase, PaymentStatus, Purchase, PurchaseUpdate,
};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OptionalExtension, Row, params, types::Type};

use super::FunnelStore;
use crate::error::Result;

pub type DbPool = Pool<SqliteConnectionManager>;

const PURCHASE_COLS: &str = "id, timestamp, customer_name, customer_email, customer_phone, \
    product_id, product_name, amount, payment_status, payment_id, order_id";

const LEAD_COLS: &str = "id, timestamp, name, email, phone, product_interest, status";

/// Create the funnel tables if they do not exist yet.
pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS purchases (
            id TEXT PRIMARY KEY,
            timestamp TEXT NOT NULL,
            customer_name TEXT NOT NULL,
            customer_email TEXT NOT NULL,
            customer_phone TEXT NOT NULL,
            product_id INTEGER NOT NULL,
            product_name TEXT NOT NULL,
            amount REAL NOT NULL,
            payment_status TEXT NOT NULL,
            payment_id TEXT,
            order_id TEXT
        );
        CREATE TABLE IF NOT EXISTS leads (
            id TEXT PRIMARY KEY,
            timestamp TEXT NOT NULL,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT NOT NULL,
            product_interest INTEGER,
            status TEXT NOT NULL
        );",
    )
}

/// SQLite-backed store. Rows are listed in insertion (rowid) order.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn open(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(4).build(manager)?;
        Self::from_pool(pool)
    }

    /// A private in-memory database. One connection, since each in-memory
    /// connection would otherwise see its own empty database.
    pub fn in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder().max_size(1).build(manager)?;
        Self::from_pool(pool)
    }

    pub fn from_pool(pool: DbPool) -> Result<Self> {
        let conn = pool.get()?;
        init_db(&conn)?;
        Ok(Self { pool })
    }
}

fn parse_enum<T>(idx: usize, value: String) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn purchase_from_row(row: &Row) -> rusqlite::Result<Purchase> {
    let timestamp: DateTime<Utc> = row.get(1)?;
    Ok(Purchase {
        id: row.get(0)?,
        timestamp,
        customer_name: row.get(2)?,
        customer_email: row.get(3)?,
        customer_phone: row.get(4)?,
        product_id: row.get(5)?,
        product_name: row.get(6)?,
        amount: row.get(7)?,
        payment_status: parse_enum::<PaymentStatus>(8, row.get(8)?)?,
        payment_id: row.get(9)?,
        order_id: row.get(10)?,
    })
}

fn lead_from_row(row: &Row) -> rusqlite::Result<Lead> {
    Ok(Lead {
        id: row.get(0)?,
        timestamp: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        product_interest: row.get(5)?,
        status: parse_enum::<LeadStatus>(6, row.get(6)?)?,
    })
}

fn get_purchase(conn: &Connection, id: &str) -> Result<Option<Purchase>> {
    let sql = format!("SELECT {} FROM purchases WHERE id = ?1", PURCHASE_COLS);
    Ok(conn
        .query_row(&sql, params![id], purchase_from_row)
        .optional()?)
}

fn get_lead(conn: &Connection, id: &str) -> Result<Option<Lead>> {
    let sql = format!("SELECT {} FROM leads WHERE id = ?1", LEAD_COLS);
    Ok(conn.query_row(&sql, params![id], lead_from_row).optional()?)
}

impl FunnelStore for SqliteStore {
    fn create_purchase(&self, input: NewPurchase) -> Result<Purchase> {
        let conn = self.pool.get()?;
        let purchase = Purchase::from_new(input);

        conn.execute(
            "INSERT INTO purchases (id, timestamp, customer_name, customer_email, customer_phone,
             product_id, product_name, amount, payment_status, payment_id, order_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                &purchase.id,
                &purchase.timestamp,
                &purchase.customer_name,
                &purchase.customer_email,
                &purchase.customer_phone,
                purchase.product_id,
                &purchase.product_name,
                purchase.amount,
                purchase.payment_status.as_ref(),
                &purchase.payment_id,
                &purchase.order_id,
            ],
        )?;

        Ok(purchase)
    }

    fn create_lead(&self, input: NewLead) -> Result<Lead> {
        let conn = self.pool.get()?;
        let lead = Lead::from_new(input);

        conn.execute(
            "INSERT INTO leads (id, timestamp, name, email, phone, product_interest, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &lead.id,
                &lead.timestamp,
                &lead.name,
                &lead.email,
                &lead.phone,
                lead.product_interest,
                lead.status.as_ref(),
            ],
        )?;

        Ok(lead)
    }

    fn list_purchases(&self) -> Result<Vec<Purchase>> {
        let conn = self.pool.get()?;
        let sql = format!("SELECT {} FROM purchases ORDER BY rowid", PURCHASE_COLS);
        let mut stmt = conn.prepare(&sql)?;
        let purchases = stmt
            .query_map([], purchase_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(purchases)
    }

    fn list_leads(&self) -> Result<Vec<Lead>> {
        let conn = self.pool.get()?;
        let sql = format!("SELECT {} FROM leads ORDER BY rowid", LEAD_COLS);
        let mut stmt = conn.prepare(&sql)?;
        let leads = stmt
            .query_map([], lead_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(leads)
    }

    fn update_purchase(&self, id: &str, update: &PurchaseUpdate) -> Result<Option<Purchase>> {
        let conn = self.pool.get()?;
        let Some(mut purchase) = get_purchase(&conn, id)? else {
            return Ok(None);
        };

        purchase.apply(update);
        conn.execute(
            "UPDATE purchases SET payment_status = ?1, payment_id = ?2 WHERE id = ?3",
            params![purchase.payment_status.as_ref(), &purchase.payment_id, id],
        )?;

        Ok(Some(purchase))
    }

    fn update_lead(&self, id: &str, update: &LeadUpdate) -> Result<Option<Lead>> {
        let conn = self.pool.get()?;
        let Some(mut lead) = get_lead(&conn, id)? else {
            return Ok(None);
        };

        lead.apply(update);
        conn.execute(
            "UPDATE leads SET status = ?1 WHERE id = ?2",
            params![lead.status.as_ref(), id],
        )?;

        Ok(Some(lead))
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
