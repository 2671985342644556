//! Shared fixtures for store integration tests.

use checkwright_core::ModelCode;
use checkwright_store::models::{ChecklistEntryRow, ModelRow};
use checkwright_store::{ModelRepo, SqliteStore};
use tempfile::TempDir;
use time::OffsetDateTime;
use uuid::Uuid;

/// Open a store backed by a temporary database file.
pub async fn open_store() -> (SqliteStore, TempDir) {
    let dir = tempfile::tempdir().expect("failed to create temp directory");
    let store = SqliteStore::new(dir.path().join("tracker.db"))
        .await
        .expect("failed to open store");
    (store, dir)
}

/// Parse a known-good model code.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub fn model_code(code: &str) -> ModelCode {
    ModelCode::parse(code).expect("valid model code")
}

/// Register a model with the given sections and return its typed code.
pub async fn register_model(store: &SqliteStore, code: &str, sections: &[&str]) -> ModelCode {
    let now = OffsetDateTime::now_utc();
    let row = ModelRow {
        model_code: code.to_string(),
        display_name: format!("Model {}", code.to_uppercase()),
        sections: serde_json::to_string(sections).expect("serialize sections"),
        created_at: now,
        updated_at: now,
    };
    store.create_model(&row).await.expect("failed to register model");
    model_code(code)
}

/// Build a checklist entry row for tests.
#[allow(dead_code)]
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

/// Assert that `orders` is the contiguous sequence 0..n.
#[allow(dead_code)]
pub fn assert_contiguous(orders: &[i64]) {
    let expected: Vec<i64> = (0..orders.len() as i64).collect();
    assert_eq!(orders, expected.as_slice(), "sibling orders must be contiguous from 0");
}
