//! Error types for vitrine-viewer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::loader::FetchError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Upstream document could not be fetched or parsed (502)
    #[error("Bad gateway: {0}")]
    BadGateway(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::BadGateway(_) => "BAD_GATEWAY",
        }
    }
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        let message = err.to_string();
        match fetch_status(&err) {
            StatusCode::BAD_REQUEST => ApiError::BadRequest(message),
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            _ => ApiError::BadGateway(message),
        }
    }
}

/// HTTP status reported for a failed document fetch
pub fn fetch_status(err: &FetchError) -> StatusCode {
    if matches!(err, FetchError::InvalidReference(_)) {
        StatusCode::BAD_REQUEST
    } else if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::BAD_GATEWAY
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_mapping() {
        let bad = ApiError::from(FetchError::InvalidReference("../x".to_string()));
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

        let missing = ApiError::from(FetchError::NotFound("a.json".to_string()));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let http_missing = ApiError::from(FetchError::Http(404, "http://x/a.json".to_string()));
        assert_eq!(http_missing.status(), StatusCode::NOT_FOUND);

        let upstream = ApiError::from(FetchError::Http(500, "http://x/a.json".to_string()));
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);

        let parse = ApiError::from(FetchError::Parse("a.json".to_string(), "eof".to_string()));
        assert_eq!(parse.status(), StatusCode::BAD_GATEWAY);
    }
}
