//! API key management endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use tracing::{debug, error};

use crate::api::state::AppState;
use crate::api::types::{
    ApiError, ApiKeyResponse, CreateApiKeyRequest, DeleteApiKeyQuery, DeleteApiKeyResponse, Json,
    UpdateApiKeyRequest, ValidateKeyRequest, ValidateKeyResponse,
};
use crate::domain::DomainError;

/// Create the API key router
pub fn create_api_keys_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_api_keys)
                .post(create_api_key)
                .put(update_api_key)
                .delete(delete_api_key),
        )
        .route("/validate", post(validate_api_key))
}

/// GET /api-keys
pub async fn list_api_keys(
    State(state): State<AppState>,
) -> Result<Json<Vec<ApiKeyResponse>>, ApiError> {
    debug!("Listing API keys");

    let keys = state.api_key_service.list().await?;

    Ok(Json(keys.into_iter().map(ApiKeyResponse::from).collect()))
}

/// POST /api-keys
pub async fn create_api_key(
    State(state): State<AppState>,
    Json(request): Json<CreateApiKeyRequest>,
) -> Result<(StatusCode, Json<ApiKeyResponse>), ApiError> {
    let name = request.name.unwrap_or_default();
    let created = state.api_key_service.create(&name).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// PUT /api-keys
pub async fn update_api_key(
    State(state): State<AppState>,
    Json(request): Json<UpdateApiKeyRequest>,
) -> Result<Json<ApiKeyResponse>, ApiError> {
    let (Some(id), Some(name)) = (request.id, request.name) else {
        return Err(ApiError::bad_request("ID and name are required"));
    };

    if id.trim().is_empty() || name.trim().is_empty() {
        return Err(ApiError::bad_request("ID and name are required"));
    }

    let updated = state.api_key_service.rename(&id, &name).await?;

    Ok(Json(updated.into()))
}

/// DELETE /api-keys?id=
pub async fn delete_api_key(
    State(state): State<AppState>,
    Query(query): Query<DeleteApiKeyQuery>,
) -> Result<Json<DeleteApiKeyResponse>, ApiError> {
    let id = query.id.unwrap_or_default();
    state.api_key_service.delete(&id).await?;

    Ok(Json(DeleteApiKeyResponse { success: true }))
}

/// POST /api-keys/validate
///
/// An unknown key is a successful answer (`valid: false`), not an error.
pub async fn validate_api_key(
    State(state): State<AppState>,
    payload: Result<Json<ValidateKeyRequest>, ApiError>,
) -> (StatusCode, Json<ValidateKeyResponse>) {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return (
                rejection.status,
                Json(ValidateKeyResponse::failure(rejection.message())),
            );
        }
    };

    let secret = request.api_key.unwrap_or_default();

    match state.api_key_service.validate(&secret).await {
        Ok(valid) => (StatusCode::OK, Json(ValidateKeyResponse::result(valid))),
        Err(DomainError::InvalidInput { message }) => (
            StatusCode::BAD_REQUEST,
            Json(ValidateKeyResponse::failure(message)),
        ),
        Err(e) => {
            error!("Failed to validate API key: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ValidateKeyResponse::failure("Failed to validate API key")),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::domain::api_key::MockApiKeyRepository;
    use crate::infrastructure::api_key::{ApiKeyService, InMemoryApiKeyRepository};

    fn app_with_repository<R>(repository: R) -> Router
    where
        R: crate::domain::api_key::ApiKeyRepository + 'static,
    {
        let service = ApiKeyService::new(Arc::new(repository));
        let state = AppState::new(Arc::new(service));

        Router::new()
            .nest("/api-keys", create_api_keys_router())
            .with_state(state)
    }

    fn app() -> Router {
        app_with_repository(InMemoryApiKeyRepository::new())
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create(app: &Router, name: &str) -> Value {
        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/api-keys", json!({ "name": name })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await
    }

    #[tokio::test]
    async fn test_create_api_key() {
        let app = app();

        let created = create(&app, "  Production ").await;

        assert_eq!(created["name"], "Production");
        let key = created["key"].as_str().unwrap();
        assert!(key.starts_with("sk_"));
        assert_eq!(key.len(), 35);
        assert!(created["id"].as_str().is_some());
        assert!(created["createdAt"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_create_api_key_requires_name() {
        let app = app();

        for body in [json!({}), json!({ "name": "" }), json!({ "name": "   " })] {
            let response = app
                .clone()
                .oneshot(json_request(Method::POST, "/api-keys", body))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_json(response).await, json!({ "error": "Name is required" }));
        }

        let list = app
            .clone()
            .oneshot(empty_request(Method::GET, "/api-keys"))
            .await
            .unwrap();
        assert_eq!(body_json(list).await, json!([]));
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let app = app();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api-keys")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"name\":"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Invalid request body" })
        );
    }

    #[tokio::test]
    async fn test_crud_scenario() {
        let app = app();

        let first = create(&app, "first").await;
        let second = create(&app, "second").await;

        let list = app
            .clone()
            .oneshot(empty_request(Method::GET, "/api-keys"))
            .await
            .unwrap();
        assert_eq!(list.status(), StatusCode::OK);
        let list = body_json(list).await;
        assert_eq!(list.as_array().unwrap().len(), 2);
        assert_eq!(list[0]["id"], second["id"]);

        let updated = app
            .clone()
            .oneshot(json_request(
                Method::PUT,
                "/api-keys",
                json!({ "id": first["id"], "name": "renamed" }),
            ))
            .await
            .unwrap();
        assert_eq!(updated.status(), StatusCode::OK);
        let updated = body_json(updated).await;
        assert_eq!(updated["name"], "renamed");
        assert_eq!(updated["key"], first["key"]);
        assert_eq!(updated["createdAt"], first["createdAt"]);

        let uri = format!("/api-keys?id={}", first["id"].as_str().unwrap());
        let deleted = app
            .clone()
            .oneshot(empty_request(Method::DELETE, &uri))
            .await
            .unwrap();
        assert_eq!(deleted.status(), StatusCode::OK);
        assert_eq!(body_json(deleted).await, json!({ "success": true }));

        let list = app
            .clone()
            .oneshot(empty_request(Method::GET, "/api-keys"))
            .await
            .unwrap();
        let list = body_json(list).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(list[0]["id"], second["id"]);
    }

    #[tokio::test]
    async fn test_update_api_key_validation() {
        let app = app();

        for body in [
            json!({ "name": "x" }),
            json!({ "id": "k1" }),
            json!({ "id": "k1", "name": "  " }),
        ] {
            let response = app
                .clone()
                .oneshot(json_request(Method::PUT, "/api-keys", body))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                body_json(response).await,
                json!({ "error": "ID and name are required" })
            );
        }
    }

    #[tokio::test]
    async fn test_update_unknown_api_key() {
        let app = app();

        let response = app
            .oneshot(json_request(
                Method::PUT,
                "/api-keys",
                json!({ "id": "missing", "name": "x" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({ "error": "API key not found" }));
    }

    #[tokio::test]
    async fn test_delete_api_key_errors() {
        let app = app();

        let missing_id = app
            .clone()
            .oneshot(empty_request(Method::DELETE, "/api-keys"))
            .await
            .unwrap();
        assert_eq!(missing_id.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(missing_id).await, json!({ "error": "ID is required" }));

        let unknown = app
            .oneshot(empty_request(Method::DELETE, "/api-keys?id=missing"))
            .await
            .unwrap();
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_validate_api_key() {
        let app = app();
        let created = create(&app, "prod").await;
        let key = created["key"].as_str().unwrap();

        let cases = [
            (json!({ "apiKey": key }), StatusCode::OK, json!({ "valid": true })),
            (
                json!({ "apiKey": format!("  {}  ", key) }),
                StatusCode::OK,
                json!({ "valid": true }),
            ),
            (
                json!({ "apiKey": "sk_unknown" }),
                StatusCode::OK,
                json!({ "valid": false }),
            ),
            (
                json!({ "apiKey": "  " }),
                StatusCode::BAD_REQUEST,
                json!({ "valid": false, "error": "API key is required" }),
            ),
            (
                json!({}),
                StatusCode::BAD_REQUEST,
                json!({ "valid": false, "error": "API key is required" }),
            ),
        ];

        for (body, status, expected) in cases {
            let response = app
                .clone()
                .oneshot(json_request(Method::POST, "/api-keys/validate", body))
                .await
                .unwrap();

            assert_eq!(response.status(), status);
            assert_eq!(body_json(response).await, expected);
        }
    }

    #[tokio::test]
    async fn test_validate_malformed_body() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api-keys/validate")
            .body(Body::from("apiKey=sk_abc"))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "valid": false, "error": "Invalid request body" })
        );
    }

    #[tokio::test]
    async fn test_storage_failures_are_internal_errors() {
        let mut mock = MockApiKeyRepository::new();
        mock.expect_list()
            .returning(|| Err(DomainError::storage_unavailable("db down")));
        mock.expect_find_by_secret()
            .returning(|_| Err(DomainError::storage_unavailable("db down")));
        let app = app_with_repository(mock);

        let list = app
            .clone()
            .oneshot(empty_request(Method::GET, "/api-keys"))
            .await
            .unwrap();
        assert_eq!(list.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(list).await,
            json!({ "error": "Internal server error" })
        );

        let validate = app
            .oneshot(json_request(
                Method::POST,
                "/api-keys/validate",
                json!({ "apiKey": "sk_abc" }),
            ))
            .await
            .unwrap();
        assert_eq!(validate.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(validate).await,
            json!({ "valid": false, "error": "Failed to validate API key" })
        );
    }
}
