use thiserror::Error;

use crate::config::ConfigError;

/// Custom error types for the presumption validator
#[derive(Debug, Error)]
pub enum ValidatorError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Error from external service {service}: {message}")]
    ExternalServiceError { service: String, message: String },

    #[error("Template error: {0}")]
    TemplateError(String),

    #[error("Dataset error: {0}")]
    DatasetError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
}

/// Result type specific to validator operations
pub type ValidatorResult<T> = Result<T, ValidatorError>;

