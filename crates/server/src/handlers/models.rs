//! Model (product line) management endpoints.

use crate::audit::{AuditAction, AuditEvent};
use crate::auth::Identity;
use crate::error::{ApiError, ApiResult};
use crate::handlers::common::{format_ts, parse_model};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use checkwright_core::{DEFAULT_SECTIONS, Role};
use checkwright_store::ModelRepo;
use checkwright_store::models::ModelRow;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Request to register a model.
#[derive(Debug, Deserialize)]
pub struct CreateModelRequest {
    pub model_code: String,
    pub display_name: String,
    /// Recognized checklist sections, in display order. Defaults to the
    /// standard four-stage set when omitted.
    pub sections: Option<Vec<String>>,
}

/// Model details.
#[derive(Debug, Serialize)]
pub struct ModelResponse {
    pub model_code: String,
    pub display_name: String,
    pub sections: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

fn model_row_to_response(row: ModelRow) -> ApiResult<ModelResponse> {
    let sections = row
        .section_list()
        .map_err(|e| ApiError::Internal(format!("corrupt section list: {e}")))?;
    Ok(ModelResponse {
        created_at: format_ts(row.created_at)?,
        updated_at: format_ts(row.updated_at)?,
        model_code: row.model_code,
        display_name: row.display_name,
        sections,
    })
}

/// POST /v1/models - Register a model.
pub async fn create_model(
    State(state): State<AppState>,
    identity: Identity,
    Json(body): Json<CreateModelRequest>,
) -> ApiResult<(StatusCode, Json<ModelResponse>)> {
    identity.require_role(Role::Admin)?;

    let code = parse_model(&body.model_code)?;
    let sections = body
        .sections
        .unwrap_or_else(|| DEFAULT_SECTIONS.iter().map(|s| s.to_string()).collect());

    let now = OffsetDateTime::now_utc();
    let row = ModelRow {
        model_code: code.to_string(),
        display_name: body.display_name,
        sections: serde_json::to_string(&sections)
            .map_err(|e| ApiError::Internal(format!("failed to encode sections: {e}")))?,
        created_at: now,
        updated_at: now,
    };
    state.store.create_model(&row).await?;

    state
        .audit
        .record(AuditEvent {
            actor: identity.actor,
            action: AuditAction::Created,
            resource: "model",
            resource_id: code.to_string(),
            model: code.to_string(),
        })
        .await;

    Ok((StatusCode::CREATED, Json(model_row_to_response(row)?)))
}

/// GET /v1/models - List models.
pub async fn list_models(State(state): State<AppState>) -> ApiResult<Json<Vec<ModelResponse>>> {
    let rows = state.store.list_models().await?;
    let models = rows
        .into_iter()
        .map(model_row_to_response)
        .collect::<ApiResult<Vec<_>>>()?;
    Ok(Json(models))
}

/// GET /v1/models/{model} - Get one model's configuration.
pub async fn get_model(
    State(state): State<AppState>,
    Path(model): Path<String>,
) -> ApiResult<Json<ModelResponse>> {
    let code = parse_model(&model)?;
    let row = state
        .store
        .get_model(&code)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("model '{code}' not found")))?;
    Ok(Json(model_row_to_response(row)?))
}
