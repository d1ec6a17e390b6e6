//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("field `{field}` is out of range: {message}")]
    OutOfRange { field: &'static str, message: String },

    #[error("unknown profile `{0}`")]
    UnknownProfile(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable error kind for the JSON body
    fn error_type(&self) -> &'static str {
        match self {
            AppError::MissingField(_) => "missing_field",
            AppError::InvalidBody(_) => "invalid_type",
            AppError::OutOfRange { .. } => "out_of_range",
            AppError::UnknownProfile(_) => "unknown_profile",
            AppError::Internal(_) => "internal",
        }
    }
}

/// JSON error body returned to the caller
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        };

        let body = ErrorResponse {
            error_type: self.error_type().to_string(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_types_are_stable() {
        assert_eq!(AppError::MissingField("length").error_type(), "missing_field");
        assert_eq!(
            AppError::UnknownProfile("kp9".to_string()).error_type(),
            "unknown_profile"
        );
        assert_eq!(
            AppError::OutOfRange {
                field: "depth",
                message: "must be positive".to_string(),
            }
            .error_type(),
            "out_of_range"
        );
    }

    #[test]
    fn test_error_messages_name_the_field() {
        let err = AppError::MissingField("wall_thickness");
        assert!(err.to_string().contains("wall_thickness"));

        let err = AppError::UnknownProfile("doesnotexist".to_string());
        assert!(err.to_string().contains("doesnotexist"));
    }
}
