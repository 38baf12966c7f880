use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

use crate::models::{Account, NewAccount};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique index rejected the write.
    #[error("Duplicate value for unique field '{field}'")]
    Duplicate { field: String },

    #[error("Store error: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Persistence for account documents.
///
/// Implementations only persist; validation happens before any call. Email
/// uniqueness must be enforced atomically by the store itself.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// All accounts in insertion order.
    async fn list(&self) -> Result<Vec<Account>, StoreError>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Account>, StoreError>;

    /// Assigns an id and persists the account.
    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError>;

    /// Returns `false` when no account matched.
    async fn delete_by_id(&self, id: ObjectId) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
