//! Server-side store selection and the in-memory backend.

use funnel::config::StoreKind;
use funnel::db::FunnelStore;
use funnel_sdk::LeadUpdate;

mod common;
use common::*;

#[test]
fn test_store_kind_parses_lowercase() {
    assert_eq!("sqlite".parse::<StoreKind>().unwrap(), StoreKind::Sqlite);
    assert_eq!("memory".parse::<StoreKind>().unwrap(), StoreKind::Memory);
    assert!("postgres".parse::<StoreKind>().is_err());
}

#[test]
fn test_memory_store_lists_in_insertion_order() {
    let store = MemoryStore::new();
    let a = store.create_purchase(new_purchase("A", 10.0)).unwrap();
    let b = store.create_purchase(new_purchase("B", 20.0)).unwrap();

    assert_eq!(store.list_purchases().unwrap(), vec![a, b]);
}

#[test]
fn test_memory_store_update_unknown_lead_is_none() {
    let store = MemoryStore::new();
    store.create_lead(new_lead("Known")).unwrap();

    let update = LeadUpdate {
        status: Some(LeadStatus::Purchased),
    };

    assert!(store.update_lead("LEAD_0_missing00", &update).unwrap().is_none());
    assert_eq!(store.list_leads().unwrap()[0].status, LeadStatus::Lead);
}
