//! API Key service
//!
//! Provides high-level operations for API key management.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::api_key::{
    normalize_name, normalize_secret, ApiKeyId, ApiKeyRecord, ApiKeyRepository, NewApiKeyRecord,
};
use crate::domain::DomainError;
use crate::infrastructure::observability::record_key_operation;

use super::generator::{ApiKeyGenerator, SecretGenerator};

/// Attempts at inserting a freshly generated secret before giving up on collisions
pub const MAX_SECRET_ATTEMPTS: usize = 3;

/// API Key service for managing API keys
#[derive(Debug)]
pub struct ApiKeyService<R>
where
    R: ApiKeyRepository,
{
    repository: Arc<R>,
    generator: Arc<dyn SecretGenerator>,
}

impl<R: ApiKeyRepository> ApiKeyService<R> {
    /// Create a new API key service
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            generator: Arc::new(ApiKeyGenerator::default()),
        }
    }

    /// Create with a custom generator
    pub fn with_generator(mut self, generator: Arc<dyn SecretGenerator>) -> Self {
        self.generator = generator;
        self
    }

    /// Create a new API key with a generated secret
    pub async fn create_key(&self, raw_name: &str) -> Result<ApiKeyRecord, DomainError> {
        let result = self.try_create_key(raw_name).await;
        record_key_operation("create", outcome_label(&result));
        result
    }

    async fn try_create_key(&self, raw_name: &str) -> Result<ApiKeyRecord, DomainError> {
        let name = normalize_name(raw_name)?;
        info!("Creating API key: name={}", name);

        let mut attempt = 1;

        loop {
            let secret = self.generator.generate();

            match self
                .repository
                .insert(NewApiKeyRecord::new(name.clone(), secret))
                .await
            {
                Ok(created) => {
                    info!("API key created: id={}", created.id());
                    return Ok(created);
                }
                Err(e) if e.is_conflict() && attempt < MAX_SECRET_ATTEMPTS => {
                    warn!(
                        "Generated secret collided (attempt {}/{}), regenerating",
                        attempt, MAX_SECRET_ATTEMPTS
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Rename an existing API key
    pub async fn rename_key(
        &self,
        id: &ApiKeyId,
        raw_name: &str,
    ) -> Result<ApiKeyRecord, DomainError> {
        let result = self.try_rename_key(id, raw_name).await;
        record_key_operation("rename", outcome_label(&result));
        result
    }

    async fn try_rename_key(
        &self,
        id: &ApiKeyId,
        raw_name: &str,
    ) -> Result<ApiKeyRecord, DomainError> {
        let name = normalize_name(raw_name)?;
        info!("Renaming API key: id={}, name={}", id, name);

        self.repository.update_name(id, &name).await
    }

    /// Delete an API key
    pub async fn delete_key(&self, id: &ApiKeyId) -> Result<(), DomainError> {
        info!("Deleting API key: id={}", id);

        let result = self.repository.delete(id).await;
        record_key_operation("delete", outcome_label(&result));
        result
    }

    /// List all API keys, newest first
    pub async fn list_keys(&self) -> Result<Vec<ApiKeyRecord>, DomainError> {
        let result = self.repository.list().await;

        if let Ok(keys) = &result {
            debug!("Listed {} API keys", keys.len());
        }

        record_key_operation("list", outcome_label(&result));
        result
    }

    /// Check whether a presented secret belongs to a stored key
    ///
    /// Never reveals which record matched.
    pub async fn validate_key(&self, raw_secret: &str) -> Result<bool, DomainError> {
        let result = self.try_validate_key(raw_secret).await;
        record_key_operation("validate", outcome_label(&result));
        result
    }

    async fn try_validate_key(&self, raw_secret: &str) -> Result<bool, DomainError> {
        let secret = normalize_secret(raw_secret)?;
        let found = self.repository.find_by_secret(secret).await?.is_some();

        debug!(
            "Validated API key: fingerprint={}, valid={}",
            ApiKeyGenerator::fingerprint(secret),
            found
        );

        Ok(found)
    }

    /// Probe the underlying store
    pub async fn ping(&self) -> Result<(), DomainError> {
        self.repository.ping().await
    }
}

fn outcome_label<T>(result: &Result<T, DomainError>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(DomainError::InvalidInput { .. }) => "invalid_input",
        Err(DomainError::NotFound { .. }) => "not_found",
        Err(DomainError::Conflict { .. }) => "conflict",
        Err(DomainError::StorageUnavailable { .. }) => "storage_unavailable",
    }
}
