use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use super::Record;
use crate::ids::{IdKind, generate_id, now_millis};
use crate::local::Namespace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub product_id: i64,
    pub product_name: String,
    /// Currency-agnostic, non-negative
    pub amount: f64,
    pub payment_status: PaymentStatus,
    /// Payment gateway reference, set once the provider reports back
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
}

/// Purchase fields supplied by the caller; id and timestamp are minted on creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPurchase {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub product_id: i64,
    pub product_name: String,
    pub amount: f64,
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
}

/// The mutable subset of a purchase. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
}

impl NewPurchase {
    /// Check the invariants a purchase must satisfy before it is stored remotely.
    pub fn validate(&self) -> Result<(), String> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err("amount must be a non-negative number".into());
        }
        Ok(())
    }
}

impl Purchase {
    pub fn from_new(input: NewPurchase) -> Self {
        let now = now_millis();
        Self {
            id: generate_id(IdKind::Purchase, now),
            timestamp: now,
            customer_name: input.customer_name,
            customer_email: input.customer_email,
            customer_phone: input.customer_phone,
            product_id: input.product_id,
            product_name: input.product_name,
            amount: input.amount,
            payment_status: input.payment_status,
            payment_id: input.payment_id,
            order_id: input.order_id,
        }
    }

    pub fn apply(&mut self, update: &PurchaseUpdate) {
        if let Some(status) = update.payment_status {
            self.payment_status = status;
        }
        if let Some(ref payment_id) = update.payment_id {
            self.payment_id = Some(payment_id.clone());
        }
    }
}

impl Record for Purchase {
    const NAMESPACE: Namespace = Namespace::Purchases;

    fn id(&self) -> &str {
        &self.id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
