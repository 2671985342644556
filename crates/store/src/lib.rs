//! Persisted state for the part hierarchy and its checklists.
//!
//! One repository trait per concern ([`repos`]), row structs in
//! [`models`], and a combined [`TrackerStore`] trait implemented by
//! [`SqliteStore`]. Sibling ordering is maintained by the reorder
//! protocol in [`reorder`]; the nested tree shape is assembled in
//! [`tree`].

pub mod error;
pub mod models;
pub mod reorder;
pub mod repos;
pub mod store;
pub mod tree;

pub use error::{StoreError, StoreResult};
pub use repos::{ChecklistRepo, EntryPatch, ModelRepo, NodeRepo, SectionedEntries, SubtreeDelete};
pub use store::{SqliteStore, TrackerStore};
pub use tree::{AssemblyTree, PartNode, PressTree, build_tree};
