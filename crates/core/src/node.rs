//! Node kinds of the part hierarchy.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a hierarchy node.
///
/// The hierarchy used in this domain is press → assembly → part. The
/// parent rules live in [`NodeKind::allowed_under`] so depth policy stays
/// data, not query shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Root of a model's tree: a press machine.
    Press,
    /// Grouping level under a press.
    Assembly,
    /// Leaf carrying checklist entries.
    Part,
}

impl NodeKind {
    /// Get the canonical string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Press => "press",
            Self::Assembly => "assembly",
            Self::Part => "part",
        }
    }

    /// Parse from the canonical string form.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "press" => Ok(Self::Press),
            "assembly" => Ok(Self::Assembly),
            "part" => Ok(Self::Part),
            other => Err(Error::InvalidNodeKind(other.to_string())),
        }
    }

    /// Whether a node of this kind may be created under a parent of
    /// `parent` kind. Presses are roots and are never created under a
    /// parent.
    pub fn allowed_under(&self, parent: NodeKind) -> bool {
        matches!(
            (self, parent),
            (Self::Assembly, Self::Press) | (Self::Part, Self::Assembly)
        )
    }

    /// Whether this kind sits at the root of a tree.
    pub fn is_root(&self) -> bool {
        matches!(self, Self::Press)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_rules() {
        assert!(NodeKind::Assembly.allowed_under(NodeKind::Press));
        assert!(NodeKind::Part.allowed_under(NodeKind::Assembly));

        assert!(!NodeKind::Part.allowed_under(NodeKind::Press));
        assert!(!NodeKind::Assembly.allowed_under(NodeKind::Assembly));
        assert!(!NodeKind::Press.allowed_under(NodeKind::Press));
        assert!(!NodeKind::Press.allowed_under(NodeKind::Assembly));
    }

    #[test]
    fn test_parse_roundtrip() {
        for kind in [NodeKind::Press, NodeKind::Assembly, NodeKind::Part] {
            assert_eq!(NodeKind::parse(kind.as_str()).unwrap(), kind);
        }
        assert!(NodeKind::parse("widget").is_err());
    }
}
