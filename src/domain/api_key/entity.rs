//! API key record and identifier types

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{validate_api_key_id, ApiKeyValidationError};

/// API key identifier - opaque, non-blank string
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiKeyId(String);

impl ApiKeyId {
    /// Create a new ApiKeyId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, ApiKeyValidationError> {
        let id = id.into();
        validate_api_key_id(&id)?;
        Ok(Self(id))
    }

    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ApiKeyId {
    type Error = ApiKeyValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ApiKeyId> for String {
    fn from(id: ApiKeyId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ApiKeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored API key
///
/// Only the name is mutable after creation. The secret is never regenerated.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKeyRecord {
    id: ApiKeyId,
    name: String,
    secret: String,
    created_at: DateTime<Utc>,
}

impl ApiKeyRecord {
    pub fn new(
        id: ApiKeyId,
        name: impl Into<String>,
        secret: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            secret: secret.into(),
            created_at,
        }
    }

    pub fn id(&self) -> &ApiKeyId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replace the display name; callers are expected to pass a normalized name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

// Records end up in log lines through `{:?}`; keep the secret out of them.
impl std::fmt::Debug for ApiKeyRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyRecord")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("secret", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Fractional-second digits kept on `created_at`; matches Postgres `TIMESTAMPTZ`
pub const CREATED_AT_SUBSEC_DIGITS: u16 = 6;

/// Insert payload for the key store
///
/// `id` and `created_at` are filled in by the store when left unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApiKeyRecord {
    pub id: Option<ApiKeyId>,
    pub name: String,
    pub secret: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewApiKeyRecord {
    pub fn new(name: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            secret: secret.into(),
            created_at: None,
        }
    }

    pub fn with_id(mut self, id: ApiKeyId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Materialize the record, assigning a fresh id and the current time where unset.
    ///
    /// `created_at` is truncated to microseconds so every store reports the same instant.
    pub fn into_record(self) -> ApiKeyRecord {
        let created_at = self.created_at.unwrap_or_else(Utc::now);

        ApiKeyRecord {
            id: self.id.unwrap_or_else(ApiKeyId::generate),
            name: self.name,
            secret: self.secret,
            created_at: created_at.trunc_subsecs(CREATED_AT_SUBSEC_DIGITS),
        }
    }
}
