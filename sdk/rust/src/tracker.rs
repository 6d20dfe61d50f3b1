//! Remote-first tracker with a local write-through mirror.
//!
//! Every operation tries the gateway once. On success, writes are mirrored into
//! the local store and the remote value is returned. On failure the same
//! operation runs against the local store alone. No call ever returns an error;
//! which store answered is only visible in the logs.

use std::sync::Arc;

use crate::analytics::AnalyticsSnapshot;
use crate::export;
use crate::gateway::Gateway;
use crate::local::{LocalStore, Namespace};
use crate::models::{
    Lead, LeadStatus, LeadUpdate, NewLead, NewPurchase, PaymentStatus, Purchase, PurchaseUpdate,
    Record,
};

#[derive(Clone)]
pub struct Tracker {
    gateway: Arc<dyn Gateway>,
    local: LocalStore,
}

impl Tracker {
    pub fn new(gateway: impl Gateway + 'static, local: LocalStore) -> Self {
        Self::from_shared(Arc::new(gateway), local)
    }

    pub fn from_shared(gateway: Arc<dyn Gateway>, local: LocalStore) -> Self {
        Self { gateway, local }
    }

    pub fn local(&self) -> &LocalStore {
        &self.local
    }

    /// Record a purchase. Input with a negative or non-finite amount is never
    /// sent to the API, which would reject it; it is kept locally only.
    pub async fn save_purchase(&self, input: NewPurchase) -> Purchase {
        if let Err(reason) = input.validate() {
            tracing::warn!("Purchase not sent to API ({}), saving locally", reason);
            let purchase = Purchase::from_new(input);
            self.local_append(&purchase);
            return purchase;
        }

        match self.gateway.create_purchase(&input).await {
            Ok(purchase) => {
                self.mirror_append(&purchase);
                purchase
            }
            Err(e) => {
                tracing::warn!("API unavailable, saving purchase locally: {}", e);
                let purchase = Purchase::from_new(input);
                self.local_append(&purchase);
                purchase
            }
        }
    }

    pub async fn save_lead(&self, input: NewLead) -> Lead {
        match self.gateway.create_lead(&input).await {
            Ok(lead) => {
                self.mirror_append(&lead);
                lead
            }
            Err(e) => {
                tracing::warn!("API unavailable, saving lead locally: {}", e);
                let lead = Lead::from_new(input);
                self.local_append(&lead);
                lead
            }
        }
    }

    pub async fn list_purchases(&self) -> Vec<Purchase> {
        match self.gateway.list_purchases().await {
            Ok(purchases) => purchases,
            Err(e) => {
                tracing::warn!("API unavailable, reading purchases locally: {}", e);
                self.local.read_all()
            }
        }
    }

    pub async fn list_leads(&self) -> Vec<Lead> {
        match self.gateway.list_leads().await {
            Ok(leads) => leads,
            Err(e) => {
                tracing::warn!("API unavailable, reading leads locally: {}", e);
                self.local.read_all()
            }
        }
    }

    /// Set the payment outcome of a purchase. `None` when no store knows the id.
    pub async fn update_purchase_status(
        &self,
        id: &str,
        status: PaymentStatus,
        payment_id: Option<String>,
    ) -> Option<Purchase> {
        let update = PurchaseUpdate {
            payment_status: Some(status),
            payment_id,
        };

        match self.gateway.update_purchase(id, &update).await {
            Ok(purchase) => {
                self.mirror_update::<Purchase>(id, |p| p.apply(&update));
                Some(purchase)
            }
            Err(e) => {
                tracing::warn!("API unavailable, updating purchase {} locally: {}", id, e);
                self.local_update::<Purchase>(id, |p| p.apply(&update))
            }
        }
    }

    pub async fn update_lead_status(&self, id: &str, status: LeadStatus) -> Option<Lead> {
        let update = LeadUpdate {
            status: Some(status),
        };

        match self.gateway.update_lead(id, &update).await {
            Ok(lead) => {
                self.mirror_update::<Lead>(id, |l| l.apply(&update));
                Some(lead)
            }
            Err(e) => {
                tracing::warn!("API unavailable, updating lead {} locally: {}", id, e);
                self.local_update::<Lead>(id, |l| l.apply(&update))
            }
        }
    }

    pub async fn analytics(&self) -> AnalyticsSnapshot {
        match self.gateway.analytics().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("API unavailable, calculating analytics locally: {}", e);
                let purchases: Vec<Purchase> = self.local.read_all();
                let leads: Vec<Lead> = self.local.read_all();
                AnalyticsSnapshot::compute(&purchases, &leads)
            }
        }
    }

    pub async fn export_purchases_csv(&self) -> String {
        export::purchases_csv(&self.list_purchases().await)
    }

    pub async fn export_leads_csv(&self) -> String {
        export::leads_csv(&self.list_leads().await)
    }

    /// Wipe the local mirror. The remote store is left alone.
    pub fn clear_all(&self) {
        for namespace in Namespace::all() {
            if let Err(e) = self.local.clear(namespace) {
                tracing::warn!("Failed to clear local {}: {}", namespace.key(), e);
            }
        }
    }

    fn mirror_append<T: Record>(&self, record: &T) {
        if let Err(e) = self.local.append_one(record) {
            tracing::warn!("Failed to mirror {} into local store: {}", record.id(), e);
        }
    }

    fn local_append<T: Record>(&self, record: &T) {
        if let Err(e) = self.local.append_one(record) {
            tracing::error!("Failed to save {} to local store: {}", record.id(), e);
        }
    }

    fn mirror_update<T: Record>(&self, id: &str, merge: impl FnOnce(&mut T)) {
        match self.local.update_one(id, merge) {
            Ok(Some(_)) => {}
            Ok(None) => tracing::debug!("{} not mirrored locally, skipping update", id),
            Err(e) => tracing::warn!("Failed to mirror update of {} into local store: {}", id, e),
        }
    }

    fn local_update<T: Record>(&self, id: &str, merge: impl FnOnce(&mut T)) -> Option<T> {
        match self.local.update_one(id, merge) {
            Ok(found) => found,
            Err(e) => {
                tracing::error!("Failed to update {} in local store: {}", id, e);
                None
            }
        }
    }
}

impl std::fmt::Debug for Tracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracker")
            .field("local", &self.local)
            .finish_non_exhaustive()
    }
}
