// HTTP API error types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::store::StoreError;

/// One field-level validation failure, serialized into the `errors` array.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub msg: &'static str,
    pub param: &'static str,
}

impl FieldError {
    pub fn new(param: &'static str, msg: &'static str) -> Self {
        Self { msg, param }
    }
}

/// HTTP API error with appropriate status codes and client-safe bodies.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    Validation(Vec<FieldError>),
    BadRequest(String),

    // 401 Unauthorized: missing/invalid credential, or ownership mismatch
    Unauthorized(String),
    Forbidden,

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error; the cause is logged, never sent
    Server,
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Validation(_) => 400,
            ApiError::BadRequest(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden => 401,
            ApiError::NotFound(_) => 404,
            ApiError::Server => 500,
        }
    }

    /// Client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation(_) => "Invalid request",
            ApiError::BadRequest(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden => "Not authorized",
            ApiError::NotFound(msg) => msg,
            ApiError::Server => "Server Error",
        }
    }

    /// JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Validation(errors) => json!({ "errors": errors }),
            _ => json!({ "msg": self.message() }),
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn validation(errors: Vec<FieldError>) -> Self {
        ApiError::Validation(errors)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden() -> Self {
        ApiError::Forbidden
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn server() -> Self {
        ApiError::Server
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        // Log the real error but return a generic message
        tracing::error!("store error: {err}");
        ApiError::Server
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
