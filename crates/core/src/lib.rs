//! Core domain types for the Checkwright part-hierarchy tracker.
//!
//! This crate is I/O-free: it defines the vocabulary shared by the store,
//! cache, and HTTP crates: model (tenant) codes, node kinds, caller roles,
//! checklist priorities, and application configuration.

pub mod config;
pub mod error;
pub mod model;
pub mod node;
pub mod priority;
pub mod role;

pub use error::{Error, Result};
pub use model::{DEFAULT_SECTIONS, ModelCode, validate_section_name};
pub use node::NodeKind;
pub use priority::Priority;
pub use role::Role;
