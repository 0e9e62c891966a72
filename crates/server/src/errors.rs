use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::customer::CustomerError;
use thiserror::Error;
use tracing::error;

/// JSON error body: `{"error": <title>, "message": <detail>}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub message: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, message: Option<String>) -> Self {
        Self { status, title, message }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.title, "message": self.message });
        (self.status, Json(body)).into_response()
    }
}

impl From<CustomerError> for JsonApiError {
    fn from(e: CustomerError) -> Self {
        match e {
            CustomerError::NotFound(msg) => JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(msg)),
            CustomerError::EmailUnavailable(msg) => JsonApiError::new(StatusCode::CONFLICT, "Conflict", Some(msg)),
            CustomerError::Repository(_) => {
                error!(err = %e, code = e.code(), "customer repository failure");
                // 细节只写日志，不返回给客户端
                JsonApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    Some("An unexpected error occurred".to_string()),
                )
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
}
