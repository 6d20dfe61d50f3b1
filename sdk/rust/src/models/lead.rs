use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use super::Record;
use crate::ids::{IdKind, generate_id, now_millis};
use crate::local::Namespace;

/// Funnel position of a lead: lead -> payment_initiated -> purchased
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LeadStatus {
    Lead,
    PaymentInitiated,
    Purchased,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Product the prospect asked about
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_interest: Option<i64>,
    pub status: LeadStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLead {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_interest: Option<i64>,
    pub status: LeadStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LeadStatus>,
}

impl Lead {
    pub fn from_new(input: NewLead) -> Self {
        let now = now_millis();
        Self {
            id: generate_id(IdKind::Lead, now),
            timestamp: now,
            name: input.name,
            email: input.email,
            phone: input.phone,
            product_interest: input.product_interest,
            status: input.status,
        }
    }

    pub fn apply(&mut self, update: &LeadUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
    }
}

impl Record for Lead {
    const NAMESPACE: Namespace = Namespace::Leads;

    fn id(&self) -> &str {
        &self.id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_snake_case_on_the_wire() {
        let json = serde_json::to_string(&LeadStatus::PaymentInitiated).unwrap();
        assert_eq!(json, "\"payment_initiated\"");
        assert_eq!(LeadStatus::PaymentInitiated.as_ref(), "payment_initiated");
    }

    #[test]
    fn from_new_assigns_lead_id() {
        let lead = Lead::from_new(NewLead {
            name: "Ravi".into(),
            email: "ravi@example.com".into(),
            phone: "9000000002".into(),
            product_interest: Some(7),
            status: LeadStatus::Lead,
        });
        assert!(lead.id.starts_with("LEAD_"));
        assert_eq!(lead.product_interest, Some(7));
    }

    #[test]
    fn empty_update_is_a_no_op() {
        let mut lead = Lead::from_new(NewLead {
            name: "Ravi".into(),
            email: "ravi@example.com".into(),
            phone: "9000000002".into(),
            product_interest: None,
            status: LeadStatus::PaymentInitiated,
        });
        let before = lead.clone();
        lead.apply(&LeadUpdate::default());
        assert_eq!(lead, before);
    }
}
