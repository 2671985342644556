//! Checklist endpoints, served through the view cache.

use crate::audit::{AuditAction, AuditEvent};
use crate::auth::Identity;
use crate::error::{ApiError, ApiResult};
use crate::handlers::common::{RemovedResponse, format_ts, parse_model};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use checkwright_core::{Priority, Role};
use checkwright_store::models::ChecklistEntryRow;
use checkwright_store::repos::EntryPatch;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Request to create a checklist entry.
#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    pub section: String,
    pub text: String,
    pub option_tag: Option<String>,
    /// Defaults to the caller when omitted.
    pub author: Option<String>,
    pub due_date: Option<Date>,
    pub category: Option<String>,
    /// Defaults to `normal` when omitted.
    pub priority: Option<String>,
}

/// Request to patch a checklist entry. Omitted fields are untouched;
/// nullable fields accept an explicit `null` to clear.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateEntryRequest {
    pub section: Option<String>,
    pub text: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub option_tag: Option<Option<String>>,
    pub author: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<Date>>,
    #[serde(default, deserialize_with = "double_option")]
    pub category: Option<Option<String>>,
    pub priority: Option<String>,
}

/// Distinguish an absent field from an explicit `null`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Checklist entry details.
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub entry_id: Uuid,
    pub part_id: Uuid,
    pub model_code: String,
    pub section: String,
    pub option_tag: Option<String>,
    pub text: String,
    pub author: String,
    pub due_date: Option<Date>,
    pub category: Option<String>,
    pub priority: String,
    pub created_at: String,
    pub updated_at: String,
}

fn entry_row_to_response(row: ChecklistEntryRow) -> ApiResult<EntryResponse> {
    Ok(EntryResponse {
        created_at: format_ts(row.created_at)?,
        updated_at: format_ts(row.updated_at)?,
        entry_id: row.entry_id,
        part_id: row.part_id,
        model_code: row.model_code,
        section: row.section,
        option_tag: row.option_tag,
        text: row.body,
        author: row.author,
        due_date: row.due_date,
        category: row.category,
        priority: row.priority,
    })
}

fn validate_priority(priority: Option<String>) -> ApiResult<Option<String>> {
    match priority {
        None => Ok(None),
        Some(p) => {
            Priority::parse(&p).map_err(|e| ApiError::BadRequest(e.to_string()))?;
            Ok(Some(p))
        }
    }
}

async fn audit_entry(
    state: &AppState,
    identity: &Identity,
    action: AuditAction,
    entry_id: Uuid,
    model: &str,
) {
    state
        .audit
        .record(AuditEvent {
            actor: identity.actor.clone(),
            action,
            resource: "checklist_entry",
            resource_id: entry_id.to_string(),
            model: model.to_string(),
        })
        .await;
}

/// GET /v1/models/{model}/parts/{part_id}/checklist - Grouped view.
pub async fn get_checklist(
    State(state): State<AppState>,
    Path((model, part_id)): Path<(String, Uuid)>,
) -> ApiResult<Json<BTreeMap<String, Vec<EntryResponse>>>> {
    let model = parse_model(&model)?;
    let sections = state.cache.sections(part_id, &model).await?;

    let mut out = BTreeMap::new();
    for (section, entries) in sections {
        let entries = entries
            .into_iter()
            .map(entry_row_to_response)
            .collect::<ApiResult<Vec<_>>>()?;
        out.insert(section, entries);
    }
    Ok(Json(out))
}

/// POST /v1/models/{model}/parts/{part_id}/checklist - Create an entry.
pub async fn create_entry(
    State(state): State<AppState>,
    identity: Identity,
    Path((model, part_id)): Path<(String, Uuid)>,
    Json(body): Json<CreateEntryRequest>,
) -> ApiResult<(StatusCode, Json<EntryResponse>)> {
    identity.require_role(Role::User)?;
    let model = parse_model(&model)?;
    let priority = validate_priority(body.priority)?
        .unwrap_or_else(|| Priority::default().as_str().to_string());

    let now = OffsetDateTime::now_utc();
    let entry = ChecklistEntryRow {
        entry_id: Uuid::new_v4(),
        part_id,
        model_code: model.to_string(),
        section: body.section,
        option_tag: body.option_tag,
        body: body.text,
        author: body.author.unwrap_or_else(|| identity.actor.clone()),
        due_date: body.due_date,
        category: body.category,
        priority,
        created_at: now,
        updated_at: now,
    };

    let entry = state.cache.create(&model, entry).await?;
    audit_entry(&state, &identity, AuditAction::Created, entry.entry_id, model.as_str()).await;
    Ok((StatusCode::CREATED, Json(entry_row_to_response(entry)?)))
}

/// PUT /v1/models/{model}/parts/{part_id}/checklist/{entry_id} - Patch an
/// entry.
pub async fn update_entry(
    State(state): State<AppState>,
    identity: Identity,
    Path((model, part_id, entry_id)): Path<(String, Uuid, Uuid)>,
    Json(body): Json<UpdateEntryRequest>,
) -> ApiResult<Json<EntryResponse>> {
    identity.require_role(Role::User)?;
    let model = parse_model(&model)?;

    let patch = EntryPatch {
        section: body.section,
        option_tag: body.option_tag,
        body: body.text,
        author: body.author,
        due_date: body.due_date,
        category: body.category,
        priority: validate_priority(body.priority)?,
    };

    let entry = state.cache.update(part_id, &model, entry_id, &patch).await?;
    audit_entry(&state, &identity, AuditAction::Updated, entry_id, model.as_str()).await;
    Ok(Json(entry_row_to_response(entry)?))
}

/// DELETE /v1/models/{model}/parts/{part_id}/checklist/{entry_id} -
/// Delete an entry.
pub async fn delete_entry(
    State(state): State<AppState>,
    identity: Identity,
    Path((model, part_id, entry_id)): Path<(String, Uuid, Uuid)>,
) -> ApiResult<Json<RemovedResponse>> {
    identity.require_role(Role::User)?;
    let model = parse_model(&model)?;

    state.cache.delete(part_id, &model, entry_id).await?;
    audit_entry(&state, &identity, AuditAction::Deleted, entry_id, model.as_str()).await;
    Ok(Json(RemovedResponse { removed: true }))
}
