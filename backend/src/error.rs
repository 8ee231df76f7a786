//! Error handling for the farm dashboard server
//!
//! Provides consistent JSON error responses

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::LifecycleError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    // Business logic errors
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    /// Prefix the offending field, e.g. `health` becomes `records[2].health`
    pub fn within(self, prefix: &str) -> Self {
        match self {
            AppError::Validation { field, message } => AppError::Validation {
                field: format!("{}.{}", prefix, field),
                message,
            },
            other => other,
        }
    }
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        let message = err.to_string();
        match err {
            LifecycleError::HarvestBeforePlanting => AppError::Validation {
                field: "estimated_harvest_date".to_string(),
                message,
            },
            LifecycleError::PercentageOutOfRange { field, .. } => AppError::Validation {
                field: field.to_string(),
                message,
            },
            LifecycleError::UnknownStatus(_) => AppError::Validation {
                field: "status".to_string(),
                message,
            },
            LifecycleError::InvalidTransition { .. } => AppError::InvalidStateTransition(message),
            LifecycleError::InvalidThresholds(_) => AppError::Configuration(message),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::BytesRejection(e) if e.status().is_server_error() => {
                AppError::InternalError(anyhow::anyhow!(e.body_text()))
            }
            other => AppError::ValidationError(other.body_text()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        match fields.first().and_then(|(field, errs)| errs.first().map(|e| (*field, e))) {
            Some((field, error)) => AppError::Validation {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} failed '{}' check", field, error.code)),
            },
            None => AppError::ValidationError(errors.to_string()),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::InvalidStateTransition(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "INVALID_STATE_TRANSITION".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message: format!("Configuration error: {}", msg),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shared::CropStatus;

    #[test]
    fn test_lifecycle_errors_map_to_fields() {
        match AppError::from(LifecycleError::HarvestBeforePlanting) {
            AppError::Validation { field, .. } => assert_eq!(field, "estimated_harvest_date"),
            other => panic!("unexpected {:?}", other),
        }

        match AppError::from(LifecycleError::PercentageOutOfRange {
            field: "health",
            value: 120,
        }) {
            AppError::Validation { field, message } => {
                assert_eq!(field, "health");
                assert!(message.contains("120"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_transition_error_is_unprocessable() {
        let err = AppError::from(LifecycleError::InvalidTransition {
            from: CropStatus::Ready,
            to: CropStatus::Planted,
        });
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_within_prefixes_field() {
        let err = AppError::Validation {
            field: "health".to_string(),
            message: "bad".to_string(),
        }
        .within("records[2]");
        match err {
            AppError::Validation { field, .. } => assert_eq!(field, "records[2].health"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_invalid_thresholds_are_configuration_errors() {
        let err = AppError::from(LifecycleError::InvalidThresholds("bad order".to_string()));
        assert!(matches!(err, AppError::Configuration(_)));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_error_hides_details() {
        let err = AppError::from(anyhow::anyhow!("disk on fire"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_status_code() {
        let err = AppError::ValidationError("bad input".to_string());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
