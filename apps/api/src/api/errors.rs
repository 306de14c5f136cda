use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::services::ServiceError;

/// API error type with HTTP status code and message
///
/// `errors` carries every validation failure when a team edit is rejected.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub errors: Vec<String>,
}

impl ApiError {
    /// Creates a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// Creates a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Creates a 409 Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Creates a 422 Unprocessable Entity error listing every failed check
    pub fn unprocessable(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            errors,
            ..Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
        }
    }

    /// Creates a 500 Internal Server Error
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = if self.errors.is_empty() {
            json!({ "error": self.message })
        } else {
            json!({ "error": self.message, "errors": self.errors })
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::NotFound { .. } => Self::not_found(error.to_string()),
            ServiceError::InvalidInput(_) | ServiceError::Classification(_) => {
                Self::bad_request(error.to_string())
            }
            ServiceError::Validation(result) => {
                Self::unprocessable("Team membership is invalid", result.errors)
            }
            ServiceError::Team(_) => {
                let message = error.to_string();
                Self::unprocessable(message.clone(), vec![message])
            }
            ServiceError::RegenerationInProgress(_) | ServiceError::AssignmentConflict { .. } => {
                Self::conflict(error.to_string())
            }
            ServiceError::Repository(e) => {
                tracing::error!(error = %e, "Repository failure");
                Self::internal_server_error(format!("Database error: {}", e))
            }
        }
    }
}
