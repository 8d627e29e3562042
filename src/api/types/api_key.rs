//! API key wire types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::api_key::{ApiKeyId, ApiKeyRecord};

/// Body of `POST /api-keys`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateApiKeyRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of `PUT /api-keys`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateApiKeyRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Query of `DELETE /api-keys?id=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteApiKeyQuery {
    #[serde(default)]
    pub id: Option<String>,
}

/// Body of `POST /api-keys/validate`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateKeyRequest {
    #[serde(default)]
    pub api_key: Option<String>,
}

/// A key record as sent over the wire; `key` carries the secret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyResponse {
    pub id: ApiKeyId,
    pub name: String,
    pub key: String,
    pub created_at: DateTime<Utc>,
}

impl From<ApiKeyRecord> for ApiKeyResponse {
    fn from(record: ApiKeyRecord) -> Self {
        Self {
            id: record.id().clone(),
            name: record.name().to_string(),
            key: record.secret().to_string(),
            created_at: record.created_at(),
        }
    }
}

impl From<ApiKeyResponse> for ApiKeyRecord {
    fn from(response: ApiKeyResponse) -> Self {
        ApiKeyRecord::new(
            response.id,
            response.name,
            response.key,
            response.created_at,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteApiKeyResponse {
    pub success: bool,
}

/// Result of a validation request; `error` only appears on failures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateKeyResponse {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidateKeyResponse {
    pub fn result(valid: bool) -> Self {
        Self { valid, error: None }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
        }
    }
}
