//! Server test utilities.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use checkwright_cache::{CacheSettings, ChecklistCache};
use checkwright_core::config::AppConfig;
use checkwright_server::audit::{AuditEvent, AuditSink};
use checkwright_server::{AppState, create_router};
use checkwright_store::{SqliteStore, TrackerStore};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::ServiceExt;

/// Audit sink that records events for assertions.
#[derive(Default)]
pub struct RecordingAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

#[allow(dead_code)]
impl RecordingAuditSink {
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditSink for RecordingAuditSink {
    async fn record(&self, event: AuditEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/
/// separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    pub audit: Arc<RecordingAuditSink>,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server over a temporary database.
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("tracker.db");

        let sqlite = Arc::new(
            SqliteStore::new(&db_path)
                .await
                .expect("Failed to open tracker store"),
        );
        let cache = Arc::new(ChecklistCache::new(sqlite.clone(), CacheSettings::default()));
        let audit = Arc::new(RecordingAuditSink::default());
        let store: Arc<dyn TrackerStore> = sqlite;

        let state = AppState::new(AppConfig::for_testing(), store, cache, audit.clone());
        let router = create_router(state.clone());

        Self { router, state, audit, _temp_dir: temp_dir }
    }
}

/// Make a JSON request against the router, optionally as `actor` with the
/// given role headers.
pub async fn json_request(
    router: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
    role: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(role) = role {
        builder = builder.header("x-actor", "test-user").header("x-role", role);
    }

    let body = match body {
        Some(v) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&v).unwrap())
        }
        None => Body::empty(),
    };

    let request = builder.body(body).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body_json: serde_json::Value = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, body_json)
}
