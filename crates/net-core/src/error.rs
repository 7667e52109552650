//! Error types for network operations

use thiserror::Error;

/// Main error type for network operations
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("System error: {0}")]
    System(#[from] SystemError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration file errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file {path} does not exist")]
    MissingConfigurationFile { path: String },

    #[error("Configuration file {path} is not valid UTF-8")]
    Encoding { path: String },

    #[error("Invalid configuration value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{address} is not a valid IPv4 or IPv6 address")]
    InvalidAddress { address: String },

    #[error("Invalid interface name: {name}")]
    InterfaceName { name: String },
}

/// System operation errors
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Restored contents of {path} do not match the snapshot")]
    SnapshotMismatch { path: String },
}
