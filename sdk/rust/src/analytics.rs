//! Funnel analytics derived from the purchase and lead collections.
//!
//! The server and the local fallback both call [`AnalyticsSnapshot::compute`],
//! so the snapshot has the same shape whichever store answered.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{Lead, PaymentStatus, Purchase, Record};

/// Number of records kept in `recent_purchases` / `recent_leads`.
pub const RECENT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub total_purchases: usize,
    pub successful_purchases: usize,
    pub failed_purchases: usize,
    pub pending_purchases: usize,
    /// Sum of `amount` over successful purchases
    pub total_revenue: f64,
    pub total_leads: usize,
    /// Product id -> number of successful purchases
    pub product_sales: BTreeMap<i64, usize>,
    pub recent_purchases: Vec<Purchase>,
    pub recent_leads: Vec<Lead>,
    /// Successful purchases per lead as a percentage with two decimals, `"0"` without leads
    pub conversion_rate: String,
}

impl AnalyticsSnapshot {
    pub fn compute(purchases: &[Purchase], leads: &[Lead]) -> Self {
        let count_status = |status: PaymentStatus| {
            purchases
                .iter()
                .filter(|p| p.payment_status == status)
                .count()
        };

        let mut total_revenue = 0.0;
        let mut product_sales = BTreeMap::new();
        for purchase in purchases
            .iter()
            .filter(|p| p.payment_status == PaymentStatus::Success)
        {
            total_revenue += purchase.amount;
            *product_sales.entry(purchase.product_id).or_insert(0) += 1;
        }

        let successful_purchases = count_status(PaymentStatus::Success);

        Self {
            total_purchases: purchases.len(),
            successful_purchases,
            failed_purchases: count_status(PaymentStatus::Failed),
            pending_purchases: count_status(PaymentStatus::Pending),
            total_revenue,
            total_leads: leads.len(),
            product_sales,
            recent_purchases: most_recent(purchases, RECENT_LIMIT),
            recent_leads: most_recent(leads, RECENT_LIMIT),
            conversion_rate: conversion_rate(successful_purchases, leads.len()),
        }
    }
}

/// Newest first; records sharing a timestamp keep their insertion order.
pub fn most_recent<T: Record>(records: &[T], limit: usize) -> Vec<T> {
    let mut sorted = records.to_vec();
    // stable sort keeps ties in insertion order
    sorted.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
    sorted.truncate(limit);
    sorted
}

pub fn conversion_rate(successful: usize, leads: usize) -> String {
    if leads == 0 {
        return "0".to_string();
    }
    format!("{:.2}", successful as f64 / leads as f64 * 100.0)
}
