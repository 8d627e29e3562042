//! API Key domain
//!
//! Record types, the key store contract and input validation.

mod entity;
mod repository;
mod validation;

pub use entity::{ApiKeyId, ApiKeyRecord, NewApiKeyRecord, CREATED_AT_SUBSEC_DIGITS};
#[cfg(test)]
pub use repository::MockApiKeyRepository;
pub use repository::ApiKeyRepository;
pub use validation::{
    normalize_name, normalize_secret, validate_api_key_id, ApiKeyValidationError,
};
