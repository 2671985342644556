//! Audit event emission.
//!
//! The tracker does not persist audit history itself. Every successful
//! mutation is announced to a collaborator sink with the resource id and
//! model scope; the collaborator records its own state and is never read
//! back.

use async_trait::async_trait;
use std::fmt;

/// What happened to a resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuditAction {
    Created,
    Renamed,
    Moved,
    Updated,
    Deleted,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Created => "created",
            Self::Renamed => "renamed",
            Self::Moved => "moved",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        };
        write!(f, "{s}")
    }
}

/// A single audit emission.
#[derive(Clone, Debug)]
pub struct AuditEvent {
    /// Opaque caller id from the identity gateway.
    pub actor: String,
    pub action: AuditAction,
    /// Resource kind: `model`, `node`, or `checklist_entry`.
    pub resource: &'static str,
    pub resource_id: String,
    /// Model scope of the resource.
    pub model: String,
}

/// Collaborator interface for audit recording.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, event: AuditEvent);
}

/// Default sink: structured tracing events.
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, event: AuditEvent) {
        tracing::info!(
            actor = %event.actor,
            action = %event.action,
            resource = event.resource,
            resource_id = %event.resource_id,
            model = %event.model,
            "audit"
        );
    }
}
