//! Error types for the core library.

use thiserror::Error;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid node configuration
    #[error("Invalid node: {0}")]
    InvalidNode(String),
    /// Ring layout violates a partitioning invariant
    #[error("Topology error: {0}")]
    Topology(String),
    /// Malformed configuration value
    #[error("Configuration error: {0}")]
    Config(String),
    /// Reading a topology document failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Topology document is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
