//! Checklist repository: entries attached to part nodes.

use crate::error::StoreResult;
use crate::models::ChecklistEntryRow;
use async_trait::async_trait;
use checkwright_core::ModelCode;
use std::collections::BTreeMap;
use time::Date;
use uuid::Uuid;

/// Checklist entries grouped by section. Only sections with at least one
/// entry are present; entries within a section are in creation order.
pub type SectionedEntries = BTreeMap<String, Vec<ChecklistEntryRow>>;

/// Partial update of a checklist entry. `None` leaves a field untouched;
/// nullable fields use a double option so "absent" and "clear" stay
/// distinct.
#[derive(Debug, Clone, Default)]
pub struct EntryPatch {
    pub section: Option<String>,
    pub option_tag: Option<Option<String>>,
    pub body: Option<String>,
    pub author: Option<String>,
    pub due_date: Option<Option<Date>>,
    pub category: Option<Option<String>>,
    pub priority: Option<String>,
}

impl EntryPatch {
    /// Apply this patch to an entry in place. Field validation is the
    /// store's job; this only copies values.
    pub fn apply_to(&self, entry: &mut ChecklistEntryRow) {
        if let Some(section) = &self.section {
            entry.section = section.clone();
        }
        if let Some(option_tag) = &self.option_tag {
            entry.option_tag = option_tag.clone();
        }
        if let Some(body) = &self.body {
            entry.body = body.clone();
        }
        if let Some(author) = &self.author {
            entry.author = author.clone();
        }
        if let Some(due_date) = &self.due_date {
            entry.due_date = *due_date;
        }
        if let Some(category) = &self.category {
            entry.category = category.clone();
        }
        if let Some(priority) = &self.priority {
            entry.priority = priority.clone();
        }
    }
}

/// Repository for checklist entries.
#[async_trait]
pub trait ChecklistRepo: Send + Sync {
    /// Grouped checklist view of a part. Fails with `TenantMismatch` when
    /// `model` disagrees with the part's stored scope, and with
    /// `Validation` when the node is not a part.
    async fn sections_for_part(
        &self,
        part_id: Uuid,
        model: &ModelCode,
    ) -> StoreResult<SectionedEntries>;

    /// Persist a new entry. Validates that the owning node is a part in
    /// the entry's model, that the section is recognized by the model's
    /// configuration, and that the body is non-blank.
    async fn create_entry(&self, entry: &ChecklistEntryRow) -> StoreResult<()>;

    /// Get an entry by id.
    async fn get_entry(&self, entry_id: Uuid) -> StoreResult<Option<ChecklistEntryRow>>;

    /// Partially update an entry; patched fields are revalidated. Returns
    /// the updated row.
    async fn update_entry(
        &self,
        entry_id: Uuid,
        patch: &EntryPatch,
    ) -> StoreResult<ChecklistEntryRow>;

    /// Delete an entry by id.
    async fn delete_entry(&self, entry_id: Uuid) -> StoreResult<()>;
}
