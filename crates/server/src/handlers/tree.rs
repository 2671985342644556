//! Tree navigation and editing endpoints.

use crate::audit::{AuditAction, AuditEvent};
use crate::auth::Identity;
use crate::error::{ApiError, ApiResult};
use crate::handlers::common::{RemovedResponse, format_ts, parse_model};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use checkwright_core::{ModelCode, NodeKind, Role};
use checkwright_store::models::NodeRow;
use checkwright_store::{NodeRepo, PressTree, StoreError, build_tree};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to create a press (root).
#[derive(Debug, Deserialize)]
pub struct CreatePressRequest {
    pub name: String,
}

/// Request to create an assembly under a press.
#[derive(Debug, Deserialize)]
pub struct CreateAssemblyRequest {
    pub press_id: Uuid,
    pub name: String,
}

/// Request to create a part under an assembly.
#[derive(Debug, Deserialize)]
pub struct CreatePartRequest {
    pub assembly_id: Uuid,
    pub name: String,
}

/// Request to rename a node.
#[derive(Debug, Deserialize)]
pub struct RenameNodeRequest {
    pub name: String,
}

/// Request to reorder a sibling list.
#[derive(Debug, Deserialize)]
pub struct MoveChildRequest {
    pub parent_id: Uuid,
    pub from_index: usize,
    pub to_index: usize,
}

/// Response for a successful move.
#[derive(Debug, Serialize)]
pub struct MoveResponse {
    pub success: bool,
}

/// Node details.
#[derive(Debug, Serialize)]
pub struct NodeResponse {
    pub node_id: Uuid,
    pub model_code: String,
    pub parent_id: Option<Uuid>,
    pub kind: String,
    pub name: String,
    pub sort_order: i64,
    pub created_at: String,
    pub updated_at: String,
}

fn node_row_to_response(row: NodeRow) -> ApiResult<NodeResponse> {
    Ok(NodeResponse {
        created_at: format_ts(row.created_at)?,
        updated_at: format_ts(row.updated_at)?,
        node_id: row.node_id,
        model_code: row.model_code,
        parent_id: row.parent_id,
        kind: row.kind,
        name: row.node_name,
        sort_order: row.sort_order,
    })
}

/// Resolve a node and insist it belongs to the addressed model.
async fn require_scoped_node(
    state: &AppState,
    node_id: Uuid,
    model: &ModelCode,
    what: &str,
) -> ApiResult<NodeRow> {
    let node = state
        .store
        .get_node(node_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("{what} {node_id} not found")))?;
    if node.model_code != model.as_str() {
        return Err(StoreError::TenantMismatch {
            requested: model.to_string(),
            stored: node.model_code,
        }
        .into());
    }
    Ok(node)
}

async fn audit_node(state: &AppState, identity: &Identity, action: AuditAction, node: &NodeRow) {
    state
        .audit
        .record(AuditEvent {
            actor: identity.actor.clone(),
            action,
            resource: "node",
            resource_id: node.node_id.to_string(),
            model: node.model_code.clone(),
        })
        .await;
}

/// GET /v1/models/{model}/tree - Full nested tree for a model.
pub async fn get_tree(
    State(state): State<AppState>,
    Path(model): Path<String>,
) -> ApiResult<Json<Vec<PressTree>>> {
    let model = parse_model(&model)?;
    let tree = build_tree(state.store.as_ref(), &model).await?;
    Ok(Json(tree))
}

/// POST /v1/models/{model}/presses - Create a press (root).
pub async fn create_press(
    State(state): State<AppState>,
    identity: Identity,
    Path(model): Path<String>,
    Json(body): Json<CreatePressRequest>,
) -> ApiResult<(StatusCode, Json<NodeResponse>)> {
    identity.require_role(Role::User)?;
    let model = parse_model(&model)?;

    let node = state.store.create_press(&model, &body.name).await?;
    audit_node(&state, &identity, AuditAction::Created, &node).await;
    Ok((StatusCode::CREATED, Json(node_row_to_response(node)?)))
}

/// POST /v1/models/{model}/assemblies - Create an assembly under a press.
pub async fn create_assembly(
    State(state): State<AppState>,
    identity: Identity,
    Path(model): Path<String>,
    Json(body): Json<CreateAssemblyRequest>,
) -> ApiResult<(StatusCode, Json<NodeResponse>)> {
    identity.require_role(Role::User)?;
    let model = parse_model(&model)?;
    require_scoped_node(&state, body.press_id, &model, "press").await?;

    let node = state
        .store
        .create_child(body.press_id, NodeKind::Assembly, &body.name)
        .await?;
    audit_node(&state, &identity, AuditAction::Created, &node).await;
    Ok((StatusCode::CREATED, Json(node_row_to_response(node)?)))
}

/// POST /v1/models/{model}/parts - Create a part under an assembly.
pub async fn create_part(
    State(state): State<AppState>,
    identity: Identity,
    Path(model): Path<String>,
    Json(body): Json<CreatePartRequest>,
) -> ApiResult<(StatusCode, Json<NodeResponse>)> {
    identity.require_role(Role::User)?;
    let model = parse_model(&model)?;
    require_scoped_node(&state, body.assembly_id, &model, "assembly").await?;

    let node = state
        .store
        .create_child(body.assembly_id, NodeKind::Part, &body.name)
        .await?;
    audit_node(&state, &identity, AuditAction::Created, &node).await;
    Ok((StatusCode::CREATED, Json(node_row_to_response(node)?)))
}

/// PUT /v1/nodes/{node_id} - Rename a node.
pub async fn rename_node(
    State(state): State<AppState>,
    identity: Identity,
    Path(node_id): Path<Uuid>,
    Json(body): Json<RenameNodeRequest>,
) -> ApiResult<Json<NodeResponse>> {
    identity.require_role(Role::User)?;

    let node = state.store.rename_node(node_id, &body.name).await?;
    audit_node(&state, &identity, AuditAction::Renamed, &node).await;
    Ok(Json(node_row_to_response(node)?))
}

/// DELETE /v1/nodes/{node_id} - Delete a node and its whole subtree.
pub async fn delete_node(
    State(state): State<AppState>,
    identity: Identity,
    Path(node_id): Path<Uuid>,
) -> ApiResult<Json<RemovedResponse>> {
    identity.require_role(Role::Admin)?;

    // Fetched first: the cascade needs the node's model for cache
    // invalidation and audit after the rows are gone.
    let node = state
        .store
        .get_node(node_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("node {node_id} not found")))?;
    let model = ModelCode::parse(&node.model_code)
        .map_err(|e| ApiError::Internal(format!("corrupt model code: {e}")))?;

    let outcome = state.store.delete_subtree(node_id).await?;
    for part_id in &outcome.removed_parts {
        state.cache.invalidate(*part_id, &model);
    }

    audit_node(&state, &identity, AuditAction::Deleted, &node).await;
    Ok(Json(RemovedResponse { removed: true }))
}

/// PATCH /v1/models/{model}/tree/move - Reorder a sibling list.
///
/// One protocol serves both levels: assemblies under a press and parts
/// under an assembly are moved the same way, addressed by their parent.
pub async fn move_child(
    State(state): State<AppState>,
    identity: Identity,
    Path(model): Path<String>,
    Json(body): Json<MoveChildRequest>,
) -> ApiResult<Json<MoveResponse>> {
    identity.require_role(Role::User)?;
    let model = parse_model(&model)?;

    let moved = state
        .store
        .move_child(body.parent_id, &model, body.from_index, body.to_index)
        .await?;

    if moved {
        state
            .audit
            .record(AuditEvent {
                actor: identity.actor,
                action: AuditAction::Moved,
                resource: "node",
                resource_id: body.parent_id.to_string(),
                model: model.to_string(),
            })
            .await;
    }
    Ok(Json(MoveResponse { success: true }))
}
