//! Application state shared across handlers.

use crate::audit::AuditSink;
use checkwright_cache::ChecklistCache;
use checkwright_core::config::AppConfig;
use checkwright_store::TrackerStore;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Tracker store (nodes, models, checklist entries).
    pub store: Arc<dyn TrackerStore>,
    /// Checklist view cache; all checklist reads and writes go through it.
    pub cache: Arc<ChecklistCache>,
    /// Audit collaborator.
    pub audit: Arc<dyn AuditSink>,
}

impl AppState {
    /// Create application state.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn TrackerStore>,
        cache: Arc<ChecklistCache>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            cache,
            audit,
        }
    }
}
