//! Error types for muninn-core

use thiserror::Error;

/// Result type alias using muninn-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for Muninn
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Two sources share the same name
    #[error("Duplicate source name: {name}")]
    DuplicateSource { name: String },

    /// Source endpoint is missing or not a valid URL
    #[error("Invalid endpoint for source {name}: {endpoint}")]
    InvalidEndpoint { name: String, endpoint: String },

    /// Missing required field
    #[error("Missing required field: {field}")]
    MissingField { field: String },
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a duplicate source error
    pub fn duplicate_source(name: impl Into<String>) -> Self {
        Self::DuplicateSource { name: name.into() }
    }

    /// Create an invalid endpoint error
    pub fn invalid_endpoint(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            name: name.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }
}
