//! Custom JSON extractor that returns errors as JSON

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::ApiError;

/// Message for any body that cannot be read as the expected JSON
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

/// Custom JSON extractor that converts all rejection errors to a 400 `ApiError`
///
/// Syntax errors, shape mismatches and a missing content type all surface the
/// same way; the underlying reason is logged at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Consume the extractor and return the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match AxumJson::<T>::from_request(req, state).await {
            Ok(AxumJson(value)) => Ok(Json(value)),
            Err(rejection) => {
                debug!("Rejected request body: {}", describe_rejection(&rejection));
                Err(ApiError::bad_request(INVALID_BODY_MESSAGE))
            }
        }
    }
}

fn describe_rejection(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::JsonDataError(err) => format!("invalid JSON data: {}", err.body_text()),
        JsonRejection::JsonSyntaxError(err) => {
            format!("invalid JSON syntax: {}", err.body_text())
        }
        JsonRejection::MissingJsonContentType(_) => "missing JSON content type".to_string(),
        JsonRejection::BytesRejection(err) => {
            format!("failed to read body: {}", err.body_text())
        }
        other => other.body_text(),
    }
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

impl<T> From<T> for Json<T> {
    fn from(value: T) -> Self {
        Json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, StatusCode};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct NameBody {
        name: String,
    }

    fn request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn test_extracts_valid_body() {
        let req = request(Some("application/json"), r#"{"name":"prod"}"#);

        let Json(body) = Json::<NameBody>::from_request(req, &()).await.unwrap();

        assert_eq!(body.name, "prod");
    }

    #[tokio::test]
    async fn test_rejections_become_bad_request() {
        let cases = [
            request(Some("application/json"), "{not json"),
            request(Some("application/json"), r#"{"name": 5}"#),
            request(None, r#"{"name":"prod"}"#),
        ];

        for req in cases {
            let err = Json::<NameBody>::from_request(req, &()).await.unwrap_err();

            assert_eq!(err.status, StatusCode::BAD_REQUEST);
            assert_eq!(err.message(), INVALID_BODY_MESSAGE);
        }
    }

    #[test]
    fn test_json_into_inner() {
        let json = Json(42);
        assert_eq!(json.into_inner(), 42);
    }
}
