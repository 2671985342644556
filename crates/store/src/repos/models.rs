//! Model (product line) repository.

use crate::error::StoreResult;
use crate::models::ModelRow;
use async_trait::async_trait;
use checkwright_core::ModelCode;

/// Repository for model configuration.
#[async_trait]
pub trait ModelRepo: Send + Sync {
    /// Register a model. Fails with `Conflict` when the code is already
    /// taken, and with `Validation` when the section list is empty or
    /// contains an invalid name.
    async fn create_model(&self, model: &ModelRow) -> StoreResult<()>;

    /// Get a model by code.
    async fn get_model(&self, code: &ModelCode) -> StoreResult<Option<ModelRow>>;

    /// List all models, ordered by code.
    async fn list_models(&self) -> StoreResult<Vec<ModelRow>>;
}
