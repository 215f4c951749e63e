//! Ringfront Error Types

use thiserror::Error;

/// Result type alias for ringfront operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ringfront error types
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    // Startup errors
    #[error("Cluster connection failed: {0}")]
    Connection(#[from] scylla::transport::errors::NewSessionError),

    #[error("Schema bootstrap failed: {0}")]
    Schema(String),

    // Request errors
    #[error("Invalid user id: {0}")]
    InvalidId(String),

    #[error("Store error: {0}")]
    Store(#[from] scylla::transport::errors::QueryError),

    #[error("Row decode error: {0}")]
    Decode(String),

    // Network errors
    #[error("Network error: {0}")]
    Network(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this error should abort startup rather than fail one request
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Config(_)
                | Error::ConfigParse(_)
                | Error::Connection(_)
                | Error::Schema(_)
                | Error::Network(_)
                | Error::Io(_)
        )
    }
}
