use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::products::model::{Fields, Product};

/// Trait abstraction for product storage.
/// The HTTP layer only sees this; the JSON document store is one implementation.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, ServiceError>;
    async fn get(&self, id: u64) -> Result<Option<Product>, ServiceError>;
    async fn create(&self, fields: Fields) -> Result<Product, ServiceError>;
    /// Fails with [`ServiceError::NotFound`] when no record has `id`.
    async fn update(&self, id: u64, patch: Fields) -> Result<Product, ServiceError>;
    /// Returns whether a record was removed.
    async fn delete(&self, id: u64) -> Result<bool, ServiceError>;
}
