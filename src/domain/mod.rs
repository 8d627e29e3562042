//! Domain layer - Core business logic and entities

pub mod api_key;
pub mod error;

pub use api_key::{
    ApiKeyId, ApiKeyRecord, ApiKeyRepository, ApiKeyValidationError, NewApiKeyRecord,
};
pub use error::DomainError;
