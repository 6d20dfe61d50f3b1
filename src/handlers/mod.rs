mod funnel;

pub use funnel::*;

use axum::{
    Router,
    extract::State,
    http::{Method, header},
    routing::get,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::API_PATH;
use crate::db::AppState;
use crate::extractors::Json;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    store: &'static str,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        store: state.store.backend_name(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health)).route(
        API_PATH,
        get(read_funnel)
            .post(create_record)
            .put(update_record)
            .delete(method_not_allowed)
            .options(preflight),
    )
}

/// Any origin may call the API with JSON bodies.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
}

/// Fully layered application, ready to serve.
pub fn app(state: AppState) -> Router {
    router()
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
