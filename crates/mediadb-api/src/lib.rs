use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use mediadb_storage::{ErrorCategory, StorageError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON error envelope returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorDetail {
    /// Stable machine-readable code: invalid | not-found | unavailable | internal
    pub code: String,
    pub message: String,
}

impl ErrorBody {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

/// High-level API errors to be mapped to HTTP responses
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        match self {
            ApiError::BadRequest(msg) => ErrorBody::new("invalid", msg),
            ApiError::NotFound(msg) => ErrorBody::new("not-found", msg),
            ApiError::Unavailable(msg) => ErrorBody::new("unavailable", msg),
            ApiError::Internal(msg) => ErrorBody::new("internal", msg),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        let category = err.category();
        tracing::warn!(error = %err, %category, "Storage failure surfaced to client");
        match category {
            ErrorCategory::Infrastructure => ApiError::Unavailable(err.to_string()),
            ErrorCategory::Data | ErrorCategory::Internal => ApiError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match serde_json::to_vec(&self.to_body()) {
            Ok(b) => b,
            Err(_) => {
                // Fallback minimal body if serialization fails
                br#"{"error":{"code":"internal","message":"Serialization failure"}}"#.to_vec()
            }
        };

        (
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
            body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_response_sets_status_and_content_type() {
        let resp = ApiError::bad_request("Invalid locale").into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let content_type = resp.headers().get(header::CONTENT_TYPE).unwrap();
        assert_eq!(content_type, &HeaderValue::from_static("application/json"));
    }

    #[test]
    fn error_body_shape() {
        let body = ApiError::not_found("No route for /v2/domains").to_body();
        assert_eq!(body.error.code, "not-found");
        assert_eq!(body.error.message, "No route for /v2/domains");

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"]["code"], "not-found");
    }

    #[test]
    fn api_error_variants_map_to_status_and_codes() {
        let cases: Vec<(ApiError, StatusCode, &str)> = vec![
            (
                ApiError::bad_request("x"),
                StatusCode::BAD_REQUEST,
                "invalid",
            ),
            (ApiError::not_found("x"), StatusCode::NOT_FOUND, "not-found"),
            (
                ApiError::unavailable("x"),
                StatusCode::SERVICE_UNAVAILABLE,
                "unavailable",
            ),
            (
                ApiError::internal("x"),
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
            ),
        ];
        for (err, status, code) in cases.into_iter() {
            assert_eq!(err.status_code(), status);
            assert_eq!(err.to_body().error.code, code);
        }
    }

    #[test]
    fn storage_errors_map_by_category() {
        let cases: Vec<(StorageError, StatusCode)> = vec![
            (
                StorageError::connection_error("refused"),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                StorageError::invalid_row("null id"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                StorageError::internal("boom"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code(), status);
        }
    }
}
