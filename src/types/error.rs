//! Error types for the points engine

use thiserror::Error;

/// Main error type for points-engine operations
#[derive(Debug, Error)]
pub enum PointsError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Ledger index error: {0}")]
    Ledger(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Price lookup error: {0}")]
    Price(String),

    #[error("No evidence: {0}")]
    NoEvidence(String),

    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

// Implement From conversions for common error types

impl From<reqwest::Error> for PointsError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

impl From<serde_json::Error> for PointsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(format!("JSON error: {}", err))
    }
}

/// Result type alias for points-engine operations
pub type Result<T> = std::result::Result<T, PointsError>;
