use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Storage unavailable: {message}")]
    StorageUnavailable { message: String },
}

impl DomainError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn storage_unavailable(message: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            message: message.into(),
        }
    }

    /// The caller-facing message, without the variant prefix
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput { message }
            | Self::NotFound { message }
            | Self::Conflict { message }
            | Self::StorageUnavailable { message } => message,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("API key not found");
        assert_eq!(error.to_string(), "Not found: API key not found");
        assert!(error.is_not_found());
    }

    #[test]
    fn test_invalid_input_error() {
        let error = DomainError::invalid_input("Name is required");
        assert_eq!(error.to_string(), "Invalid input: Name is required");
        assert_eq!(error.message(), "Name is required");
    }

    #[test]
    fn test_conflict_error() {
        let error = DomainError::conflict("Secret already exists");
        assert_eq!(error.to_string(), "Conflict: Secret already exists");
        assert!(error.is_conflict());
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_storage_unavailable_error() {
        let error = DomainError::storage_unavailable("connection refused");
        assert_eq!(error.to_string(), "Storage unavailable: connection refused");
    }
}
