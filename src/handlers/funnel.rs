//! `/api/purchases`: one resource, the `action` query parameter selects the collection.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use funnel_sdk::{
    AnalyticsSnapshot, LeadEnvelope, LeadList, LeadUpdateRequest, NewLead, NewPurchase,
    PurchaseEnvelope, PurchaseList, PurchaseUpdateRequest,
};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use crate::db::AppState;
use crate::error::{AppError, Result};
use crate::extractors::{Json, Query};

#[derive(Debug, Deserialize)]
pub struct ActionQuery {
    #[serde(default)]
    pub action: Option<String>,
}

fn invalid_action() -> AppError {
    AppError::BadRequest("Invalid action".into())
}

fn parse_body<T: DeserializeOwned>(body: Value, what: &str) -> Result<T> {
    serde_json::from_value(body).map_err(|e| AppError::BadRequest(format!("Invalid {}: {}", what, e)))
}

/// GET: `purchases`, `leads` or `analytics`.
pub async fn read_funnel(
    State(state): State<AppState>,
    Query(query): Query<ActionQuery>,
) -> Result<Response> {
    match query.action.as_deref() {
        Some("purchases") => {
            let purchases = state.store.list_purchases()?;
            Ok(Json(PurchaseList { purchases }).into_response())
        }
        Some("leads") => {
            let leads = state.store.list_leads()?;
            Ok(Json(LeadList { leads }).into_response())
        }
        Some("analytics") => {
            let purchases = state.store.list_purchases()?;
            let leads = state.store.list_leads()?;
            Ok(Json(AnalyticsSnapshot::compute(&purchases, &leads)).into_response())
        }
        _ => Err(invalid_action()),
    }
}

/// POST: `purchase` or `lead`. The server assigns id and timestamp; any sent are ignored.
pub async fn create_record(
    State(state): State<AppState>,
    Query(query): Query<ActionQuery>,
    Json(body): Json<Value>,
) -> Result<Response> {
    match query.action.as_deref() {
        Some("purchase") => {
            let input: NewPurchase = parse_body(body, "purchase")?;
            input.validate().map_err(AppError::BadRequest)?;
            let purchase = state.store.create_purchase(input)?;

            tracing::info!("Recorded purchase {} ({})", purchase.id, purchase.product_name);

            Ok((
                StatusCode::CREATED,
                Json(PurchaseEnvelope {
                    success: true,
                    purchase,
                }),
            )
                .into_response())
        }
        Some("lead") => {
            let input: NewLead = parse_body(body, "lead")?;
            let lead = state.store.create_lead(input)?;

            tracing::info!("Recorded lead {}", lead.id);

            Ok((StatusCode::CREATED, Json(LeadEnvelope { success: true, lead })).into_response())
        }
        _ => Err(invalid_action()),
    }
}

/// PUT: `{ id, ...fields }`. Only the mutable fields of each record kind are applied.
pub async fn update_record(
    State(state): State<AppState>,
    Query(query): Query<ActionQuery>,
    Json(body): Json<Value>,
) -> Result<Response> {
    match query.action.as_deref() {
        Some("purchase") => {
            let request: PurchaseUpdateRequest = parse_body(body, "purchase update")?;
            let purchase = state
                .store
                .update_purchase(&request.id, &request.update)?
                .ok_or_else(|| AppError::NotFound("Purchase not found".into()))?;

            tracing::info!(
                "Purchase {} is now {}",
                purchase.id,
                purchase.payment_status.as_ref()
            );

            Ok(Json(PurchaseEnvelope {
                success: true,
                purchase,
            })
            .into_response())
        }
        Some("lead") => {
            let request: LeadUpdateRequest = parse_body(body, "lead update")?;
            let lead = state
                .store
                .update_lead(&request.id, &request.update)?
                .ok_or_else(|| AppError::NotFound("Lead not found".into()))?;

            tracing::info!("Lead {} is now {}", lead.id, lead.status.as_ref());

            Ok(Json(LeadEnvelope { success: true, lead }).into_response())
        }
        _ => Err(invalid_action()),
    }
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Empty 200. Under `cors_layer` the layer answers OPTIONS itself, with the CORS headers.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}
