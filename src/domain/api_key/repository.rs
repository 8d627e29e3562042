//! API key store trait

use async_trait::async_trait;
use std::fmt::Debug;

#[cfg(test)]
use mockall::automock;

use super::entity::{ApiKeyId, ApiKeyRecord, NewApiKeyRecord};
use crate::domain::DomainError;

/// Repository trait for API key storage
///
/// Backend failures surface as `DomainError::StorageUnavailable`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ApiKeyRepository: Send + Sync + Debug {
    /// List all records, newest first
    async fn list(&self) -> Result<Vec<ApiKeyRecord>, DomainError>;

    /// Store a new record, assigning `id` and `created_at` when unset.
    ///
    /// Fails with `Conflict` if the id or the secret is already taken.
    async fn insert(&self, record: NewApiKeyRecord) -> Result<ApiKeyRecord, DomainError>;

    /// Rename a record; `NotFound` if the id is unknown
    async fn update_name(&self, id: &ApiKeyId, name: &str) -> Result<ApiKeyRecord, DomainError>;

    /// Remove a record; `NotFound` if the id is unknown
    async fn delete(&self, id: &ApiKeyId) -> Result<(), DomainError>;

    /// Exact-match lookup. Absence is `Ok(None)`, never `NotFound`.
    async fn find_by_secret(&self, secret: &str) -> Result<Option<ApiKeyRecord>, DomainError>;

    /// Cheap liveness probe for readiness checks
    async fn ping(&self) -> Result<(), DomainError>;
}
