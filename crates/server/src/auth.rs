//! Caller identity supplied by the upstream gateway.
//!
//! Authentication happens before requests reach this service: the
//! gateway injects `x-actor` (opaque caller id) and `x-role`. This module
//! turns those headers into a typed identity and enforces role gates.
//! Model scoping is the store layer's job.

use crate::error::ApiError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use checkwright_core::Role;

/// Header carrying the opaque caller id.
pub const ACTOR_HEADER: &str = "x-actor";
/// Header carrying the caller role (`admin` | `user`).
pub const ROLE_HEADER: &str = "x-role";

/// Authenticated caller identity.
#[derive(Clone, Debug)]
pub struct Identity {
    pub actor: String,
    pub role: Role,
}

impl Identity {
    /// Check whether the caller's role grants `role`.
    pub fn has_role(&self, role: Role) -> bool {
        self.role.implies(role)
    }

    /// Require a role, returning an error if not granted.
    pub fn require_role(&self, role: Role) -> Result<(), ApiError> {
        if self.has_role(role) {
            Ok(())
        } else {
            Err(ApiError::Forbidden(format!("requires role: {role}")))
        }
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Result<Option<&'a str>, ApiError> {
    match parts.headers.get(name) {
        None => Ok(None),
        Some(value) => value
            .to_str()
            .map(Some)
            .map_err(|_| ApiError::Unauthorized(format!("malformed {name} header"))),
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor = header(parts, ACTOR_HEADER)?
            .ok_or_else(|| ApiError::Unauthorized(format!("missing {ACTOR_HEADER} header")))?;
        if actor.trim().is_empty() {
            return Err(ApiError::Unauthorized(format!("blank {ACTOR_HEADER} header")));
        }
        let role = header(parts, ROLE_HEADER)?
            .ok_or_else(|| ApiError::Unauthorized(format!("missing {ROLE_HEADER} header")))?;
        let role = Role::parse(role)
            .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

        Ok(Identity { actor: actor.to_string(), role })
    }
}
