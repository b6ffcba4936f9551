use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Defects in catalog data
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("Failed to parse catalog: {0}")]
    Parse(String),
    #[error("Catalog entry '{id}' is inconsistent: {reason}")]
    Inconsistent { id: String, reason: String },
    #[error("Catalog has no usable {0}")]
    Empty(&'static str),
}

/// Errors returned by the planning engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlannerError {
    /// Malformed or out-of-range request field
    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl PlannerError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Application error types surfaced over HTTP
#[derive(Debug, Error)]
pub enum AppError {
    /// Request could not be parsed or failed validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Configuration or catalog error
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Internal server error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            Self::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::ConfigError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            Self::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": {
                "message": error_message,
                "type": error_type_name(&self),
            }
        }));

        (status, body).into_response()
    }
}

fn error_type_name(error: &AppError) -> &'static str {
    match error {
        AppError::InvalidInput(_) => "invalid_input",
        AppError::ConfigError(_) => "config_error",
        AppError::InternalError(_) => "internal_error",
    }
}

impl From<PlannerError> for AppError {
    fn from(err: PlannerError) -> Self {
        match err {
            PlannerError::InvalidInput { .. } => Self::InvalidInput(err.to_string()),
            PlannerError::Catalog(inner) => Self::ConfigError(inner.to_string()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}
