//! Error types for the Gateway

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hwconf_core::storage::StoreError;
use hwconf_core::ConfiguratorError;
use serde_json::json;
use thiserror::Error;

/// Gateway error type
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{0}")]
    InvalidPayload(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{message}: {details}")]
    Persistence { message: String, details: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn persistence(message: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Persistence {
            message: message.into(),
            details: err.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Persistence { .. } | Self::InvalidConfig(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<StoreError> for GatewayError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::EmailTaken => GatewayError::Conflict("Email already in use".to_string()),
            StoreError::NotFound(what) => GatewayError::NotFound(format!("Not found: {}", what)),
            other => GatewayError::persistence("Database operation failed", other),
        }
    }
}

impl From<ConfiguratorError> for GatewayError {
    fn from(e: ConfiguratorError) -> Self {
        match e {
            ConfiguratorError::InvalidPayload(message) => {
                GatewayError::InvalidPayload(message)
            }
            ConfiguratorError::Unauthenticated => {
                GatewayError::Unauthenticated("Invalid or expired token".to_string())
            }
            ConfiguratorError::PersistenceFailure(details) => {
                GatewayError::persistence("Database operation failed", details)
            }
            other => GatewayError::Internal(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        GatewayError::Internal(e.to_string())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Persistence { message, details } => {
                json!({ "error": message, "details": details })
            }
            Self::InvalidConfig(_) | Self::Io(_) | Self::Internal(_) => {
                json!({ "error": "Unable to process request", "details": self.to_string() })
            }
            _ => json!({ "error": self.to_string() }),
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!(status = status.as_u16(), "Request rejected: {}", self);
        }

        (status, Json(body)).into_response()
    }
}

/// Result type for Gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            GatewayError::InvalidPayload("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::Conflict("x".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            GatewayError::persistence("Signup failed", "disk full").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_from_configurator_error() {
        let err: GatewayError = ConfiguratorError::missing_field("quantity").into();
        assert!(matches!(
            &err,
            GatewayError::InvalidPayload(m) if m == "Missing required field: quantity"
        ));

        let err: GatewayError =
            ConfiguratorError::RemoteSummaryUnavailable("timeout".to_string()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_from_store_error() {
        let err: GatewayError = StoreError::EmailTaken.into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }
}
