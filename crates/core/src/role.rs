//! Caller roles.
//!
//! Identity arrives pre-authenticated from the upstream gateway; this
//! module only names the roles and their ordering. `Admin` implies `User`.

use crate::error::{Error, Result};
use std::fmt;

/// Role of an authenticated caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// May read and edit tree nodes and checklist entries.
    User,
    /// Everything `User` may do, plus destructive tree operations and
    /// model management.
    Admin,
}

impl Role {
    /// Parse from the canonical string form.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(Error::InvalidRole(other.to_string())),
        }
    }

    /// Get the canonical string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Whether this role grants everything `other` grants.
    pub fn implies(&self, other: Role) -> bool {
        match self {
            Self::Admin => true,
            Self::User => matches!(other, Self::User),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
