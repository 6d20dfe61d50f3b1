//! Tracker against a live API server and against an unreachable one.
//!
//! Covers write-through mirroring, transparent fallback, update semantics,
//! analytics on both paths and CSV export.

use std::time::Duration;

use axum::{Json, Router, http::StatusCode, routing::any};
use chrono::Utc;
use funnel_sdk::{FileStorage, Lead, OfflineGateway, Purchase};
use serde_json::{Value, json};

mod common;
use common::*;

fn is_purchase_id(id: &str) -> bool {
    let mut parts = id.splitn(3, '_');
    parts.next() == Some("PURCH")
        && parts
            .next()
            .is_some_and(|millis| !millis.is_empty() && millis.chars().all(|c| c.is_ascii_digit()))
        && parts
            .next()
            .is_some_and(|suffix| !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_alphanumeric()))
}

#[tokio::test]
async fn test_save_purchase_id_and_timestamp() {
    let endpoint = spawn_server(memory_state()).await;
    let tracker = tracker_for(&endpoint);
    let before = Utc::now();

    let purchase = tracker.save_purchase(new_purchase("Asha", 100.0)).await;

    assert!(is_purchase_id(&purchase.id), "unexpected id {}", purchase.id);
    assert!(purchase.timestamp.timestamp_millis() >= before.timestamp_millis());
    let json = serde_json::to_value(&purchase).unwrap();
    let raw = json["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(raw).is_ok());
}

#[tokio::test]
async fn test_remote_write_is_mirrored_locally() {
    let state = memory_state();
    let endpoint = spawn_server(state.clone()).await;
    let tracker = tracker_for(&endpoint);

    let purchase = tracker.save_purchase(new_purchase("Asha", 100.0)).await;
    let lead = tracker.save_lead(new_lead("Asha")).await;

    assert_eq!(state.store.list_purchases().unwrap(), vec![purchase.clone()]);
    assert_eq!(tracker.local().read_all::<Purchase>(), vec![purchase]);
    assert_eq!(tracker.local().read_all::<Lead>(), vec![lead]);
}

#[tokio::test]
async fn test_unreachable_api_falls_back_to_local_store() {
    let tracker = tracker_for(&dead_endpoint().await);

    let purchase = tracker.save_purchase(new_purchase("Offline", 75.0)).await;

    assert!(is_purchase_id(&purchase.id));
    assert_eq!(tracker.list_purchases().await, vec![purchase]);
}

/// An endpoint that answers every request with the same status and body.
async fn canned_endpoint(status: StatusCode, body: Value) -> String {
    let app = Router::new().route(
        API_PATH,
        any(move || {
            let body = body.clone();
            async move { (status, Json(body)) }
        }),
    );
    spawn_router(app).await
}

#[tokio::test]
async fn test_server_error_falls_back_to_local_store() {
    let endpoint = canned_endpoint(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "database unavailable" }),
    )
    .await;
    let tracker = tracker_for(&endpoint);

    let purchase = tracker.save_purchase(new_purchase("Asha", 100.0)).await;

    assert!(is_purchase_id(&purchase.id));
    assert_eq!(tracker.local().read_all::<Purchase>(), vec![purchase.clone()]);
    assert_eq!(tracker.list_purchases().await, vec![purchase]);
}

#[tokio::test]
async fn test_undecodable_analytics_is_computed_locally() {
    // Older deployments answer with a smaller analytics shape.
    let endpoint = canned_endpoint(
        StatusCode::OK,
        json!({
            "totalPurchases": 0,
            "totalRevenue": 0,
            "totalLeads": 0,
            "conversionRate": 0,
            "recentPurchases": []
        }),
    )
    .await;
    let tracker = tracker_for(&endpoint);
    let mut paid = new_purchase("Asha", 120.0);
    paid.payment_status = PaymentStatus::Success;
    let purchase = tracker.save_purchase(paid).await;
    tracker.save_lead(new_lead("Asha")).await;

    let snapshot = tracker.analytics().await;

    assert_eq!(snapshot.total_purchases, 1);
    assert_eq!(snapshot.total_leads, 1);
    assert_eq!(snapshot.total_revenue, 120.0);
    assert_eq!(snapshot.conversion_rate, "100.00");
    assert_eq!(snapshot.recent_purchases, vec![purchase]);
}

#[tokio::test]
async fn test_negative_amount_is_kept_local_only() {
    let state = memory_state();
    let endpoint = spawn_server(state.clone()).await;
    let tracker = tracker_for(&endpoint);

    let purchase = tracker.save_purchase(new_purchase("Refund", -3.0)).await;

    assert!(state.store.list_purchases().unwrap().is_empty());
    assert_eq!(tracker.local().read_all::<Purchase>(), vec![purchase]);
}

#[tokio::test]
async fn test_list_is_idempotent_on_both_paths() {
    let endpoint = spawn_server(memory_state()).await;
    let online = tracker_for(&endpoint);
    online.save_purchase(new_purchase("A", 1.0)).await;
    online.save_purchase(new_purchase("B", 2.0)).await;
    assert_eq!(online.list_purchases().await, online.list_purchases().await);

    let offline = tracker_for(&dead_endpoint().await);
    offline.save_lead(new_lead("C")).await;
    assert_eq!(offline.list_leads().await, offline.list_leads().await);
}

#[tokio::test]
async fn test_update_purchase_status_remote_and_mirror() {
    let state = memory_state();
    let endpoint = spawn_server(state.clone()).await;
    let tracker = tracker_for(&endpoint);
    let saved = tracker.save_purchase(new_purchase("Asha", 100.0)).await;

    let updated = tracker
        .update_purchase_status(&saved.id, PaymentStatus::Success, Some("PAY123".into()))
        .await
        .expect("purchase exists");

    let mut expected = saved.clone();
    expected.payment_status = PaymentStatus::Success;
    expected.payment_id = Some("PAY123".into());
    assert_eq!(updated, expected);
    assert_eq!(state.store.list_purchases().unwrap(), vec![expected.clone()]);
    assert_eq!(tracker.local().read_all::<Purchase>(), vec![expected]);
}

#[tokio::test]
async fn test_update_unknown_purchase_changes_nothing() {
    let state = memory_state();
    let endpoint = spawn_server(state.clone()).await;
    let tracker = tracker_for(&endpoint);
    let saved = tracker.save_purchase(new_purchase("Asha", 100.0)).await;

    let result = tracker
        .update_purchase_status("PURCH_0_unknown00", PaymentStatus::Failed, None)
        .await;

    assert!(result.is_none());
    assert_eq!(state.store.list_purchases().unwrap(), vec![saved.clone()]);
    assert_eq!(tracker.local().read_all::<Purchase>(), vec![saved]);
}

#[tokio::test]
async fn test_remote_not_found_falls_back_to_local_copy() {
    let local = LocalStore::new(MemoryStorage::new());

    // Recorded while the API was down, so only the local store knows it.
    let offline = Tracker::new(OfflineGateway, local.clone());
    let lead = offline.save_lead(new_lead("Late")).await;

    let endpoint = spawn_server(memory_state()).await;
    let online = Tracker::new(HttpGateway::new(&endpoint).unwrap(), local.clone());

    let updated = online
        .update_lead_status(&lead.id, LeadStatus::PaymentInitiated)
        .await
        .expect("local copy is updated");

    assert_eq!(updated.status, LeadStatus::PaymentInitiated);
    assert_eq!(local.read_all::<Lead>()[0].status, LeadStatus::PaymentInitiated);
}

#[tokio::test]
async fn test_update_lead_status_goes_remote_first() {
    let state = memory_state();
    let endpoint = spawn_server(state.clone()).await;
    let tracker = tracker_for(&endpoint);
    let lead = tracker.save_lead(new_lead("Kiran")).await;

    tracker
        .update_lead_status(&lead.id, LeadStatus::Purchased)
        .await
        .expect("lead exists remotely");

    assert_eq!(state.store.list_leads().unwrap()[0].status, LeadStatus::Purchased);
    assert_eq!(tracker.local().read_all::<Lead>()[0].status, LeadStatus::Purchased);
}

#[tokio::test]
async fn test_local_analytics_without_leads() {
    let tracker = tracker_for(&dead_endpoint().await);
    tracker.save_purchase(new_purchase("Solo", 20.0)).await;

    let snapshot = tracker.analytics().await;

    assert_eq!(snapshot.total_purchases, 1);
    assert_eq!(snapshot.total_leads, 0);
    assert_eq!(snapshot.conversion_rate, "0");
}

#[tokio::test]
async fn test_remote_recent_purchases_newest_first_capped_at_ten() {
    let endpoint = spawn_server(memory_state()).await;
    let tracker = tracker_for(&endpoint);

    let mut saved = Vec::new();
    for n in 0..12 {
        saved.push(tracker.save_purchase(new_purchase(&format!("C{}", n), 1.0)).await);
        tokio::time::sleep(Duration::from_millis(3)).await;
    }

    let snapshot = tracker.analytics().await;

    assert_eq!(snapshot.total_purchases, 12);
    assert_eq!(snapshot.recent_purchases.len(), 10);
    let ids: Vec<&str> = snapshot.recent_purchases.iter().map(|p| p.id.as_str()).collect();
    let expected: Vec<&str> = saved.iter().rev().take(10).map(|p| p.id.as_str()).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn test_local_recent_purchases_newest_first_capped_at_ten() {
    let tracker = tracker_for(&dead_endpoint().await);

    let mut saved = Vec::new();
    for n in 0..11 {
        saved.push(tracker.save_purchase(new_purchase(&format!("C{}", n), 1.0)).await);
        tokio::time::sleep(Duration::from_millis(3)).await;
    }

    let snapshot = tracker.analytics().await;

    assert_eq!(snapshot.recent_purchases.len(), 10);
    assert_eq!(snapshot.recent_purchases[0], saved[10]);
    assert_eq!(snapshot.recent_purchases[9], saved[1]);
}

#[tokio::test]
async fn test_export_purchases_csv() {
    let tracker = tracker_for(&dead_endpoint().await);
    let first = tracker.save_purchase(new_purchase("Meera", 100.0)).await;
    let second = tracker.save_purchase(new_purchase("Nila", 250.5)).await;

    let csv = tracker.export_purchases_csv().await;
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with(&first.id));
    assert!(lines[1].contains("₹100"));
    assert!(lines[2].starts_with(&second.id));
    assert!(lines[2].contains("₹250.5"));
}

#[tokio::test]
async fn test_export_leads_csv_reflects_remote_data() {
    let endpoint = spawn_server(memory_state()).await;
    let tracker = tracker_for(&endpoint);
    let lead = tracker.save_lead(new_lead("Ravi")).await;

    let csv = tracker.export_leads_csv().await;

    let row = csv.lines().nth(1).unwrap();
    assert!(row.starts_with(&lead.id));
    assert!(row.ends_with(",1,lead"));
}

#[tokio::test]
async fn test_file_backed_fallback_persists_between_trackers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("funnel.json");
    let endpoint = dead_endpoint().await;

    let saved = {
        let local = LocalStore::new(FileStorage::open(&path).unwrap());
        let tracker = Tracker::new(HttpGateway::new(&endpoint).unwrap(), local);
        tracker.save_lead(new_lead("Persisted")).await
    };

    let local = LocalStore::new(FileStorage::open(&path).unwrap());
    let tracker = Tracker::new(HttpGateway::new(&endpoint).unwrap(), local);
    assert_eq!(tracker.list_leads().await, vec![saved]);

    tracker.clear_all();
    assert!(tracker.list_leads().await.is_empty());
}
