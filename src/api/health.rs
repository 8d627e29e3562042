//! Health check endpoints

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::types::Json;

use super::state::AppState;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    fn status_code(self) -> StatusCode {
        match self {
            Self::Healthy => StatusCode::OK,
            Self::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Body of `/health`
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
}

/// Body of `/ready`
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status: HealthStatus,
    pub version: String,
    pub key_store: StoreHealth,
}

/// Outcome of pinging the key store
#[derive(Debug, Serialize, Deserialize)]
pub struct StoreHealth {
    pub status: HealthStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub latency_ms: u64,
}

/// Process is up and serving requests
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness: 503 when the key store cannot be reached
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let key_store = ping_key_store(&state).await;
    let status = key_store.status;

    let response = ReadinessResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        key_store,
    };

    (status.status_code(), Json(response))
}

pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

async fn ping_key_store(state: &AppState) -> StoreHealth {
    let start = Instant::now();
    let result = state.api_key_service.ping().await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(()) => StoreHealth {
            status: HealthStatus::Healthy,
            error: None,
            latency_ms,
        },
        Err(e) => {
            warn!("Key store ping failed: {}", e);
            StoreHealth {
                status: HealthStatus::Unhealthy,
                error: Some(e.to_string()),
                latency_ms,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_codes() {
        assert_eq!(HealthStatus::Healthy.status_code(), StatusCode::OK);
        assert_eq!(
            HealthStatus::Unhealthy.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_readiness_serialization() {
        let response = ReadinessResponse {
            status: HealthStatus::Unhealthy,
            version: "0.1.0".to_string(),
            key_store: StoreHealth {
                status: HealthStatus::Unhealthy,
                error: Some("Storage unavailable: connection refused".to_string()),
                latency_ms: 3,
            },
        };

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "status": "unhealthy",
                "version": "0.1.0",
                "key_store": {
                    "status": "unhealthy",
                    "error": "Storage unavailable: connection refused",
                    "latency_ms": 3
                }
            })
        );
    }

    #[test]
    fn test_healthy_store_omits_error() {
        let store = StoreHealth {
            status: HealthStatus::Healthy,
            error: None,
            latency_ms: 0,
        };

        let value = serde_json::to_value(&store).unwrap();

        assert_eq!(value["status"], "healthy");
        assert!(value.get("error").is_none());
    }
}
