//! Node repository: the ordered, model-scoped hierarchy.

use crate::error::StoreResult;
use crate::models::NodeRow;
use async_trait::async_trait;
use checkwright_core::{ModelCode, NodeKind};
use uuid::Uuid;

/// Outcome of a cascading subtree delete.
#[derive(Debug, Clone, Default)]
pub struct SubtreeDelete {
    pub nodes_removed: u64,
    pub entries_removed: u64,
    /// Ids of removed part nodes, for cache invalidation by the caller.
    pub removed_parts: Vec<Uuid>,
}

/// Repository for hierarchy nodes.
#[async_trait]
pub trait NodeRepo: Send + Sync {
    /// Create a press (root) for a model. Root creation is the one place
    /// the model scope is supplied explicitly; the model must be
    /// registered. The press is appended to the end of the root list.
    async fn create_press(&self, model: &ModelCode, name: &str) -> StoreResult<NodeRow>;

    /// Create a child node; the model scope is inherited from the parent.
    /// Fails with `Validation` when `kind` is not allowed under the
    /// parent's kind. The child is appended to the end of the sibling
    /// list.
    async fn create_child(
        &self,
        parent_id: Uuid,
        kind: NodeKind,
        name: &str,
    ) -> StoreResult<NodeRow>;

    /// Get a node by id.
    async fn get_node(&self, node_id: Uuid) -> StoreResult<Option<NodeRow>>;

    /// Rename a node in place.
    async fn rename_node(&self, node_id: Uuid, name: &str) -> StoreResult<NodeRow>;

    /// Delete a node and every descendant, including the checklist
    /// entries of removed parts, in one transaction; then close the order
    /// gap among the surviving siblings.
    async fn delete_subtree(&self, node_id: Uuid) -> StoreResult<SubtreeDelete>;

    /// Presses of a model, ordered by `sort_order`.
    async fn list_presses(&self, model: &ModelCode) -> StoreResult<Vec<NodeRow>>;

    /// Children of `parent_id`, ordered by `sort_order`. A disagreement
    /// between `model` and the parent's stored scope is a
    /// `TenantMismatch`, never an empty list.
    async fn list_children(&self, parent_id: Uuid, model: &ModelCode) -> StoreResult<Vec<NodeRow>>;

    /// Move the child at `from_index` to `to_index` within a sibling list
    /// and renumber displaced siblings atomically. Returns whether any
    /// row changed; `from == to` is a no-op and writes nothing.
    async fn move_child(
        &self,
        parent_id: Uuid,
        model: &ModelCode,
        from_index: usize,
        to_index: usize,
    ) -> StoreResult<bool>;
}
