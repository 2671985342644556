//! Database models mapping to the tracker schema.

use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

// =============================================================================
// Models (product lines)
// =============================================================================

/// Model record; the tenant boundary for nodes and checklist entries.
#[derive(Debug, Clone, FromRow)]
pub struct ModelRow {
    pub model_code: String,
    pub display_name: String,
    /// JSON array of recognized checklist section names, in display order.
    pub sections: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl ModelRow {
    /// Decode the section list from its JSON column.
    pub fn section_list(&self) -> Result<Vec<String>, serde_json::Error> {
        serde_json::from_str(&self.sections)
    }
}

// =============================================================================
// Hierarchy nodes
// =============================================================================

/// Hierarchy node record (press, assembly, or part).
///
/// `sort_order` values of one parent's children form a contiguous,
/// duplicate-free 0-based sequence at rest; every mutation preserves that
/// or fails atomically.
#[derive(Debug, Clone, FromRow)]
pub struct NodeRow {
    pub node_id: Uuid,
    pub model_code: String,
    /// NULL only for presses (roots).
    pub parent_id: Option<Uuid>,
    pub kind: String,
    pub node_name: String,
    pub sort_order: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

// =============================================================================
// Checklist entries
// =============================================================================

/// Checklist entry attached to a part node.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ChecklistEntryRow {
    pub entry_id: Uuid,
    pub part_id: Uuid,
    /// Always equals the owning part's model; enforced at write time.
    pub model_code: String,
    pub section: String,
    pub option_tag: Option<String>,
    pub body: String,
    pub author: String,
    pub due_date: Option<Date>,
    pub category: Option<String>,
    pub priority: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
