//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::pricing::PricingError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Resource not found")]
    NotFound,

    #[error("Validation error: {message}")]
    Validation {
        field: Option<String>,
        message: String,
    },

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Validation { .. } | AppError::Pricing(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Template(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            AppError::NotFound => "not_found",
            AppError::Validation { .. } => "validation_error",
            AppError::Pricing(e) => e.error_type(),
            AppError::Conflict(_) => "conflict",
            AppError::Database(_) => "database_error",
            AppError::Template(_) => "template_error",
            AppError::Internal(_) => "internal_error",
        }
    }
}

/// JSON body returned for every failed request
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Server-side failures are logged in full, the client gets a generic message
        let (message, details) = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                ("Database error".to_string(), None)
            }
            AppError::Template(e) => {
                tracing::error!("Template error: {}", e);
                ("Template error".to_string(), None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("Internal error".to_string(), None)
            }
            AppError::Validation { field, message } => (
                message.clone(),
                field.as_ref().map(|f| serde_json::json!({ "field": f })),
            ),
            AppError::Pricing(e) => (
                e.to_string(),
                e.field().map(|f| serde_json::json!({ "field": f })),
            ),
            other => (other.to_string(), None),
        };

        let body = ErrorResponse {
            error_type: self.error_type().to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::validation("name", "must not be empty").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::from(PricingError::InvalidTaxRate(dec!(-1))).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::Conflict("quote is validated".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Internal("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_pricing_error_type_passes_through() {
        let err = AppError::from(PricingError::InvalidDimensions {
            field: "width_cm",
            reason: "must be positive (got 0)".to_string(),
        });
        assert_eq!(err.error_type(), "invalid_dimensions");
        assert!(err.to_string().contains("width_cm"));
    }

    #[test]
    fn test_internal_error_response_hides_details() {
        let response = AppError::Internal("secret connection string".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
