//! API key input validation

use thiserror::Error;

use crate::domain::DomainError;

/// Errors that can occur while validating caller-supplied API key fields
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiKeyValidationError {
    #[error("Name is required")]
    EmptyName,

    #[error("ID is required")]
    EmptyId,

    #[error("API key is required")]
    EmptySecret,
}

impl From<ApiKeyValidationError> for DomainError {
    fn from(err: ApiKeyValidationError) -> Self {
        DomainError::invalid_input(err.to_string())
    }
}

/// Trim a display name; any non-blank name is accepted
pub fn normalize_name(raw: &str) -> Result<String, ApiKeyValidationError> {
    let name = raw.trim();

    if name.is_empty() {
        return Err(ApiKeyValidationError::EmptyName);
    }

    Ok(name.to_string())
}

/// Trim a presented secret; empty input is rejected rather than looked up
pub fn normalize_secret(raw: &str) -> Result<&str, ApiKeyValidationError> {
    let secret = raw.trim();

    if secret.is_empty() {
        return Err(ApiKeyValidationError::EmptySecret);
    }

    Ok(secret)
}

/// Record ids are opaque, but never blank
pub fn validate_api_key_id(id: &str) -> Result<(), ApiKeyValidationError> {
    if id.trim().is_empty() {
        return Err(ApiKeyValidationError::EmptyId);
    }

    Ok(())
}
