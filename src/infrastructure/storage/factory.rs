//! Key store factory for runtime backend selection

use std::sync::Arc;

use tracing::info;

use crate::api::state::ApiKeyServiceTrait;
use crate::domain::DomainError;
use crate::infrastructure::api_key::{
    ApiKeyService, InMemoryApiKeyRepository, PostgresApiKeyRepository,
};

use super::postgres::PostgresConfig;

/// Supported storage types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    InMemory,
    Postgres(PostgresConfig),
}

impl StorageConfig {
    /// Returns the storage type
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// An opened key store, ready to back the key service
///
/// Owns the backend's lifecycle: [`open`](Self::open) connects and migrates,
/// [`close`](Self::close) releases resources.
#[derive(Debug, Clone)]
pub enum KeyStore {
    InMemory(Arc<InMemoryApiKeyRepository>),
    Postgres(Arc<PostgresApiKeyRepository>),
}

impl KeyStore {
    /// A fresh, empty in-memory store
    pub fn in_memory() -> Self {
        Self::InMemory(Arc::new(InMemoryApiKeyRepository::new()))
    }

    /// Open the configured backend
    pub async fn open(config: &StorageConfig) -> Result<Self, DomainError> {
        match config {
            StorageConfig::InMemory => {
                info!("Using in-memory key store");
                Ok(Self::in_memory())
            }
            StorageConfig::Postgres(pg_config) => {
                info!("Using PostgreSQL key store");
                let repository = PostgresApiKeyRepository::connect(pg_config).await?;
                repository.init().await?;
                Ok(Self::Postgres(Arc::new(repository)))
            }
        }
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory(_) => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }

    /// Build the key service on top of this store
    pub fn service(&self) -> Arc<dyn ApiKeyServiceTrait> {
        match self {
            Self::InMemory(repository) => Arc::new(ApiKeyService::new(repository.clone())),
            Self::Postgres(repository) => Arc::new(ApiKeyService::new(repository.clone())),
        }
    }

    /// Release backend resources
    pub async fn close(&self) {
        if let Self::Postgres(repository) = self {
            repository.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_type_from_str() {
        assert_eq!(StorageType::from_str("memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::from_str("in_memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::from_str("In-Memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::from_str("postgres"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("postgresql"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("pg"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("unknown"), None);
    }

    #[test]
    fn test_storage_config_types() {
        assert_eq!(StorageConfig::InMemory.storage_type(), StorageType::InMemory);

        let postgres = StorageConfig::Postgres(PostgresConfig::new("postgres://localhost/test"));
        assert_eq!(postgres.storage_type(), StorageType::Postgres);
    }

    #[tokio::test]
    async fn test_open_in_memory_store() {
        let store = KeyStore::open(&StorageConfig::InMemory).await.unwrap();
        assert_eq!(store.storage_type(), StorageType::InMemory);

        let service = store.service();
        let created = service.create("demo").await.unwrap();

        assert!(service.validate(created.secret()).await.unwrap());
        assert!(service.ping().await.is_ok());

        store.close().await;
    }

    #[tokio::test]
    async fn test_services_share_the_store() {
        let store = KeyStore::open(&StorageConfig::InMemory).await.unwrap();

        store.service().create("demo").await.unwrap();

        assert_eq!(store.service().list().await.unwrap().len(), 1);
    }
}
