//! Time-bounded cache for per-part checklist views.
//!
//! Sits between the HTTP layer and the checklist store. Reads are served
//! from a cached copy while it is fresh; mutations patch the cached copy
//! alongside the synchronous store write, so a burst of edits never pays
//! a refetch per edit, and a failed write rolls the copy back.

mod cache;

pub use cache::{CacheSettings, ChecklistCache};
