//! HTTP control plane for the checklist tracker.
//!
//! This crate provides:
//! - model (product line) management
//! - tree navigation and editing (press → assembly → part)
//! - per-part checklist views, served through the TTL cache
//! - role gates on write paths, audit emission on mutations

pub mod audit;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use audit::{AuditAction, AuditEvent, AuditSink, TracingAuditSink};
pub use auth::Identity;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
