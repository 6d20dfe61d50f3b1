//! CSV rendering of the purchase and lead collections.

use std::borrow::Cow;

use chrono::{DateTime, Utc};

use crate::models::{Lead, Purchase};

const PURCHASE_HEADERS: [&str; 9] = [
    "Purchase ID",
    "Date",
    "Customer Name",
    "Email",
    "Phone",
    "Product",
    "Amount",
    "Status",
    "Payment ID",
];

const LEAD_HEADERS: [&str; 7] = [
    "Lead ID",
    "Date",
    "Name",
    "Email",
    "Phone",
    "Product Interest",
    "Status",
];

const CURRENCY_SYMBOL: &str = "₹";
const MISSING: &str = "N/A";

pub fn purchases_csv(purchases: &[Purchase]) -> String {
    let rows = purchases.iter().map(|p| {
        vec![
            Cow::Borrowed(p.id.as_str()),
            Cow::Owned(format_date(p.timestamp)),
            Cow::Borrowed(p.customer_name.as_str()),
            Cow::Borrowed(p.customer_email.as_str()),
            Cow::Borrowed(p.customer_phone.as_str()),
            Cow::Borrowed(p.product_name.as_str()),
            Cow::Owned(format!("{}{}", CURRENCY_SYMBOL, p.amount)),
            Cow::Borrowed(p.payment_status.as_ref()),
            Cow::Borrowed(p.payment_id.as_deref().unwrap_or(MISSING)),
        ]
    });
    render(&PURCHASE_HEADERS, rows)
}

pub fn leads_csv(leads: &[Lead]) -> String {
    let rows = leads.iter().map(|l| {
        vec![
            Cow::Borrowed(l.id.as_str()),
            Cow::Owned(format_date(l.timestamp)),
            Cow::Borrowed(l.name.as_str()),
            Cow::Borrowed(l.email.as_str()),
            Cow::Borrowed(l.phone.as_str()),
            l.product_interest
                .map(|id| Cow::Owned(id.to_string()))
                .unwrap_or(Cow::Borrowed(MISSING)),
            Cow::Borrowed(l.status.as_ref()),
        ]
    });
    render(&LEAD_HEADERS, rows)
}

fn render<'a>(headers: &[&str], rows: impl Iterator<Item = Vec<Cow<'a, str>>>) -> String {
    let mut lines = vec![headers.iter().map(|h| escape(h)).collect::<Vec<_>>().join(",")];
    lines.extend(rows.map(|row| row.iter().map(|f| escape(f)).collect::<Vec<_>>().join(",")));
    lines.join("\n")
}

fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Quote a field only when it contains a delimiter, quote or line break.
fn escape(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
