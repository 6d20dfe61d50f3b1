use std::sync::RwLock;

use funnel_sdk::{Lead, LeadUpdate, NewLead, NewPurchase, Purchase, PurchaseUpdate};

use super::FunnelStore;
use crate::error::{AppError, Result};

/// Process-local store. Contents vanish when the server restarts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    purchases: RwLock<Vec<Purchase>>,
    leads: RwLock<Vec<Lead>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> AppError {
    AppError::Internal("store lock poisoned".into())
}

impl FunnelStore for MemoryStore {
    fn create_purchase(&self, input: NewPurchase) -> Result<Purchase> {
        let purchase = Purchase::from_new(input);
        self.purchases
            .write()
            .map_err(|_| poisoned())?
            .push(purchase.clone());
        Ok(purchase)
    }

    fn create_lead(&self, input: NewLead) -> Result<Lead> {
        let lead = Lead::from_new(input);
        self.leads.write().map_err(|_| poisoned())?.push(lead.clone());
        Ok(lead)
    }

    fn list_purchases(&self) -> Result<Vec<Purchase>> {
        Ok(self.purchases.read().map_err(|_| poisoned())?.clone())
    }

    fn list_leads(&self) -> Result<Vec<Lead>> {
        Ok(self.leads.read().map_err(|_| poisoned())?.clone())
    }

    fn update_purchase(&self, id: &str, update: &PurchaseUpdate) -> Result<Option<Purchase>> {
        let mut purchases = self.purchases.write().map_err(|_| poisoned())?;
        Ok(purchases.iter_mut().find(|p| p.id == id).map(|purchase| {
            purchase.apply(update);
            purchase.clone()
        }))
    }

    fn update_lead(&self, id: &str, update: &LeadUpdate) -> Result<Option<Lead>> {
        let mut leads = self.leads.write().map_err(|_| poisoned())?;
        Ok(leads.iter_mut().find(|l| l.id == id).map(|lead| {
            lead.apply(update);
            lead.clone()
        }))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
