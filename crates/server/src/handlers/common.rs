//! Shared handler helpers.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use checkwright_core::ModelCode;
use checkwright_store::TrackerStore;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /v1/health - Health check.
///
/// Intentionally unauthenticated so load balancers and probes can use it.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    state.store.health_check().await?;
    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}

/// Response for operations that remove a resource.
#[derive(Debug, Serialize)]
pub struct RemovedResponse {
    pub removed: bool,
}

/// Parse a model code path segment; a malformed code is a caller error.
pub fn parse_model(raw: &str) -> ApiResult<ModelCode> {
    ModelCode::parse(raw).map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// Format a timestamp for API responses.
pub fn format_ts(ts: OffsetDateTime) -> ApiResult<String> {
    ts.format(&Rfc3339)
        .map_err(|e| ApiError::Internal(format!("failed to format timestamp: {e}")))
}
