//! Common test utilities for cache tests.

pub mod mocks;

use checkwright_core::ModelCode;
use checkwright_store::models::ChecklistEntryRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[allow(unused_imports)]
pub use mocks::MockChecklistStore;

/// Parse a known-good model code.
pub fn model_code(code: &str) -> ModelCode {
    ModelCode::parse(code).expect("valid model code")
}

/// Build a checklist entry row for tests.
pub fn entry_fixture(part_id: Uuid, model: &str, section: &str, body: &str) -> ChecklistEntryRow {
    let now = OffsetDateTime::now_utc();
    ChecklistEntryRow {
        entry_id: Uuid::new_v4(),
        part_id,
        model_code: model.to_string(),
        section: section.to_string(),
        option_tag: None,
        body: body.to_string(),
        author: "inspector".to_string(),
        due_date: None,
        category: None,
        priority: "normal".to_string(),
        created_at: now,
        updated_at: now,
    }
}
