//! Pricing API route handlers

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::AppState;

use super::calculators::{PreviewInput, PricingCalculationInput};
use super::requests::{CalculatePricingRequest, PreviewRequest, QuickEstimateQuery};
use super::responses::{CalculatePricingResponse, PreviewResponse, QuickEstimateResponse};
use super::services;

/// Header carrying the caller's tenant id
pub const TENANT_HEADER: &str = "x-tenant-id";

/// Pricing routes, mounted under `/api/pricing`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/calculate", post(calculate))
        .route("/quick-estimate", get(quick_estimate))
        .route("/preview", post(preview))
        .route("/settings/invalidate", post(invalidate_settings))
}

fn tenant_id(headers: &HeaderMap) -> Result<Uuid> {
    let raw = headers
        .get(TENANT_HEADER)
        .ok_or_else(|| AppError::bad_request("missing X-Tenant-Id header"))?;

    raw.to_str()
        .ok()
        .and_then(|s| Uuid::parse_str(s.trim()).ok())
        .ok_or_else(|| AppError::bad_request("X-Tenant-Id must be a UUID"))
}

fn rejected(message: &str, body_text: String) -> AppError {
    AppError::BadRequest {
        message: message.to_string(),
        details: Some(serde_json::json!({ "reason": body_text })),
    }
}

/// Full breakdown for a service request
async fn calculate(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<CalculatePricingRequest>, JsonRejection>,
) -> Result<Json<CalculatePricingResponse>> {
    let tenant = tenant_id(&headers)?;
    let Json(req) = payload.map_err(|e| rejected("invalid pricing request", e.body_text()))?;

    let input = PricingCalculationInput::from(&req);
    let breakdown = services::calculate_for_tenant(&state.db, &state.cache, tenant, &input).await?;

    Ok(Json(CalculatePricingResponse {
        pricing: breakdown.into(),
        input: req,
    }))
}

/// Single-number estimate from query parameters
async fn quick_estimate(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: std::result::Result<Query<QuickEstimateQuery>, QueryRejection>,
) -> Result<Json<QuickEstimateResponse>> {
    let tenant = tenant_id(&headers)?;
    let Query(q) = query.map_err(|e| rejected("invalid quick estimate query", e.body_text()))?;

    let estimate = services::quick_estimate_for_tenant(
        &state.db,
        &state.cache,
        tenant,
        &q.service_type,
        q.facility_size,
        &q.service_frequency,
    )
    .await?;

    Ok(Json(QuickEstimateResponse { estimate, input: q }))
}

/// Labor-hours and production-items preview for the settings screen
async fn preview(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<PreviewRequest>, JsonRejection>,
) -> Result<Json<PreviewResponse>> {
    let tenant = tenant_id(&headers)?;
    let Json(req) = payload.map_err(|e| rejected("invalid preview request", e.body_text()))?;

    let input = PreviewInput::from(&req);
    let preview = services::preview_for_tenant(&state.db, &state.cache, tenant, &input).await?;

    Ok(Json(PreviewResponse {
        preview: preview.into(),
        input: req,
    }))
}

/// Drop the tenant's cached settings after they were edited
async fn invalidate_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode> {
    let tenant = tenant_id(&headers)?;
    state.cache.invalidate_tenant(tenant).await;
    Ok(StatusCode::NO_CONTENT)
}
