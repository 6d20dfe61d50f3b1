//! JSON envelopes exchanged with the `/api/purchases` endpoint.

use serde::{Deserialize, Serialize};

use super::{Lead, LeadUpdate, Purchase, PurchaseUpdate};

/// `action` query selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Purchase,
    Lead,
    Purchases,
    Leads,
    Analytics,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Purchase => "purchase",
            Action::Lead => "lead",
            Action::Purchases => "purchases",
            Action::Leads => "leads",
            Action::Analytics => "analytics",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseEnvelope {
    pub success: bool,
    pub purchase: Purchase,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadEnvelope {
    pub success: bool,
    pub lead: Lead,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PurchaseList {
    #[serde(default)]
    pub purchases: Vec<Purchase>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadList {
    #[serde(default)]
    pub leads: Vec<Lead>,
}

/// PUT body: the target id alongside the fields to merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseUpdateRequest {
    pub id: String,
    #[serde(flatten)]
    pub update: PurchaseUpdate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadUpdateRequest {
    pub id: String,
    #[serde(flatten)]
    pub update: LeadUpdate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
