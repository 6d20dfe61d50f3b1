//! Server-side record storage behind the funnel API.
//!
//! Handlers only see [`FunnelStore`], so the in-memory lists can be swapped for
//! SQLite (or any other database) without touching the HTTP contract.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, init_db};

use std::sync::Arc;

use funnel_sdk::{Lead, LeadUpdate, NewLead, NewPurchase, Purchase, PurchaseUpdate};

use crate::config::{Config, StoreKind};
use crate::error::Result;

/// Create/list/update access to the two funnel collections.
///
/// Implementations assign `id` and `timestamp` on create and keep insertion order on list.
pub trait FunnelStore: Send + Sync {
    fn create_purchase(&self, input: NewPurchase) -> Result<Purchase>;

    fn create_lead(&self, input: NewLead) -> Result<Lead>;

    fn list_purchases(&self) -> Result<Vec<Purchase>>;

    fn list_leads(&self) -> Result<Vec<Lead>>;

    /// `Ok(None)` when no purchase has this id.
    fn update_purchase(&self, id: &str, update: &PurchaseUpdate) -> Result<Option<Purchase>>;

    fn update_lead(&self, id: &str, update: &LeadUpdate) -> Result<Option<Lead>>;

    fn backend_name(&self) -> &'static str;
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FunnelStore>,
}

impl AppState {
    pub fn new(store: impl FunnelStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Build the store selected by `config.store`.
pub fn open_store(config: &Config) -> Result<Arc<dyn FunnelStore>> {
    let store: Arc<dyn FunnelStore> = match config.store {
        StoreKind::Memory => Arc::new(MemoryStore::new()),
        StoreKind::Sqlite => Arc::new(SqliteStore::open(&config.database_path)?),
    };
    Ok(store)
}
