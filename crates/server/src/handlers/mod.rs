//! HTTP request handlers.

pub mod checklist;
pub mod common;
pub mod models;
pub mod tree;

pub use checklist::*;
pub use common::*;
pub use models::*;
pub use tree::*;
