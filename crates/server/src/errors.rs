use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::error;

use service::errors::ServiceError;

/// JSON error body returned by every handler.
#[derive(Debug)]
pub struct JsonApiError {
    status: StatusCode,
    body: Value,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &str, detail: Option<String>) -> Self {
        let body = match detail {
            Some(d) => json!({ "error": title, "detail": d }),
            None => json!({ "error": title }),
        };
        Self { status, body }
    }

    pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, body: json!({ "message": message.into() }) }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(violations) => Self {
                status: StatusCode::BAD_REQUEST,
                body: json!({ "errors": violations }),
            },
            ServiceError::NotFound(msg) => Self::message(StatusCode::NOT_FOUND, msg),
            ServiceError::Db(_) | ServiceError::Serialization(_) => {
                error!(error = %e, "request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", None)
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
