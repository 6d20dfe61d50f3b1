//! Shared helpers for API and tracker integration tests.
#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub use funnel::config::API_PATH;
pub use funnel::db::{AppState, MemoryStore, SqliteStore};
pub use funnel::handlers;
pub use funnel_sdk::{
    HttpGateway, LeadStatus, LocalStore, MemoryStorage, NewLead, NewPurchase, PaymentStatus,
    Tracker,
};

pub fn memory_state() -> AppState {
    AppState::new(MemoryStore::new())
}

pub fn memory_app() -> Router {
    handlers::app(memory_state())
}

pub fn uri(action: &str) -> String {
    format!("{}?action={}", API_PATH, action)
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("Response should be valid JSON")
}

pub fn purchase_json(name: &str, amount: f64) -> Value {
    json!({
        "customerName": name,
        "customerEmail": format!("{}@example.com", name.to_lowercase()),
        "customerPhone": "9000000000",
        "productId": 1,
        "productName": "Breathwork Course",
        "amount": amount,
        "paymentStatus": "pending"
    })
}

pub fn lead_json(name: &str) -> Value {
    json!({
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "phone": "9000000000",
        "productInterest": 1,
        "status": "lead"
    })
}

pub fn new_purchase(name: &str, amount: f64) -> NewPurchase {
    serde_json::from_value(purchase_json(name, amount)).unwrap()
}

pub fn new_lead(name: &str) -> NewLead {
    serde_json::from_value(lead_json(name)).unwrap()
}

/// Serve `state` on an ephemeral localhost port; returns the resource URL.
pub async fn spawn_server(state: AppState) -> String {
    spawn_router(handlers::app(state)).await
}

/// Serve an arbitrary router on an ephemeral port; returns the resource URL.
pub async fn spawn_router(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}{}", addr, API_PATH)
}

/// A resource URL on a localhost port nothing is listening on.
pub async fn dead_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}{}", addr, API_PATH)
}

pub fn tracker_for(endpoint: &str) -> Tracker {
    let gateway = HttpGateway::new(endpoint).unwrap();
    Tracker::new(gateway, LocalStore::new(MemoryStorage::new()))
}
