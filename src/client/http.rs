//! HTTP client for the key management API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

use super::error::ClientError;
use crate::api::types::{
    ApiKeyResponse, CreateApiKeyRequest, DeleteApiKeyResponse, UpdateApiKeyRequest,
    ValidateKeyRequest, ValidateKeyResponse,
};
use crate::domain::api_key::ApiKeyRecord;

/// Boundary calls made by the synchronization layer
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ApiKeysClient: Send + Sync {
    async fn list(&self) -> Result<Vec<ApiKeyRecord>, ClientError>;
    async fn create(&self, name: &str) -> Result<ApiKeyRecord, ClientError>;
    async fn rename(&self, id: &str, name: &str) -> Result<ApiKeyRecord, ClientError>;
    async fn delete(&self, id: &str) -> Result<(), ClientError>;
    async fn validate(&self, secret: &str) -> Result<bool, ClientError>;
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// `ApiKeysClient` over reqwest
#[derive(Debug, Clone)]
pub struct HttpApiKeysClient {
    base_url: String,
    client: Client,
}

impl HttpApiKeysClient {
    /// Create a client for the API at `base_url`, with an optional per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = Client::builder();

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();

        if !status.is_success() {
            let body = response.json::<ErrorBody>().await.unwrap_or_default();
            debug!("API call failed: status={}, error={:?}", status, body.error);

            return Err(ClientError::Api {
                status: status.as_u16(),
                message: body.error,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Transport(format!("Invalid response body: {}", e)))
    }
}

#[async_trait]
impl ApiKeysClient for HttpApiKeysClient {
    async fn list(&self) -> Result<Vec<ApiKeyRecord>, ClientError> {
        let response = self.client.get(self.url("/api-keys")).send().await?;
        let keys: Vec<ApiKeyResponse> = Self::parse(response).await?;

        Ok(keys.into_iter().map(ApiKeyRecord::from).collect())
    }

    async fn create(&self, name: &str) -> Result<ApiKeyRecord, ClientError> {
        let body = CreateApiKeyRequest {
            name: Some(name.to_string()),
        };
        let response = self
            .client
            .post(self.url("/api-keys"))
            .json(&body)
            .send()
            .await?;
        let created: ApiKeyResponse = Self::parse(response).await?;

        Ok(created.into())
    }

    async fn rename(&self, id: &str, name: &str) -> Result<ApiKeyRecord, ClientError> {
        let body = UpdateApiKeyRequest {
            id: Some(id.to_string()),
            name: Some(name.to_string()),
        };
        let response = self
            .client
            .put(self.url("/api-keys"))
            .json(&body)
            .send()
            .await?;
        let updated: ApiKeyResponse = Self::parse(response).await?;

        Ok(updated.into())
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let response = self
            .client
            .delete(self.url("/api-keys"))
            .query(&[("id", id)])
            .send()
            .await?;
        let _: DeleteApiKeyResponse = Self::parse(response).await?;

        Ok(())
    }

    async fn validate(&self, secret: &str) -> Result<bool, ClientError> {
        let body = ValidateKeyRequest {
            api_key: Some(secret.to_string()),
        };
        let response = self
            .client
            .post(self.url("/api-keys/validate"))
            .json(&body)
            .send()
            .await?;
        let result: ValidateKeyResponse = Self::parse(response).await?;

        Ok(result.valid)
    }
}
