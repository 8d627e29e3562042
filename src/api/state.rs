//! Application state for shared services

use std::sync::Arc;

use crate::domain::api_key::{ApiKeyId, ApiKeyRecord, ApiKeyRepository};
use crate::domain::DomainError;
use crate::infrastructure::api_key::ApiKeyService;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub api_key_service: Arc<dyn ApiKeyServiceTrait>,
}

impl AppState {
    pub fn new(api_key_service: Arc<dyn ApiKeyServiceTrait>) -> Self {
        Self { api_key_service }
    }
}

/// Trait for API key service operations
#[async_trait::async_trait]
pub trait ApiKeyServiceTrait: Send + Sync {
    async fn list(&self) -> Result<Vec<ApiKeyRecord>, DomainError>;
    async fn create(&self, name: &str) -> Result<ApiKeyRecord, DomainError>;
    async fn rename(&self, id: &str, name: &str) -> Result<ApiKeyRecord, DomainError>;
    async fn delete(&self, id: &str) -> Result<(), DomainError>;
    /// `true` iff the trimmed secret matches a stored key
    async fn validate(&self, secret: &str) -> Result<bool, DomainError>;
    async fn ping(&self) -> Result<(), DomainError>;
}

#[async_trait::async_trait]
impl<R: ApiKeyRepository + 'static> ApiKeyServiceTrait for ApiKeyService<R> {
    async fn list(&self) -> Result<Vec<ApiKeyRecord>, DomainError> {
        ApiKeyService::list_keys(self).await
    }

    async fn create(&self, name: &str) -> Result<ApiKeyRecord, DomainError> {
        ApiKeyService::create_key(self, name).await
    }

    async fn rename(&self, id: &str, name: &str) -> Result<ApiKeyRecord, DomainError> {
        let key_id = ApiKeyId::new(id)?;
        ApiKeyService::rename_key(self, &key_id, name).await
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let key_id = ApiKeyId::new(id)?;
        ApiKeyService::delete_key(self, &key_id).await
    }

    async fn validate(&self, secret: &str) -> Result<bool, DomainError> {
        ApiKeyService::validate_key(self, secret).await
    }

    async fn ping(&self) -> Result<(), DomainError> {
        ApiKeyService::ping(self).await
    }
}
