//! Error types for the lift_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for lift_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// The catalog is missing data the routine generator needs
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    /// User-supplied parameters were rejected
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A routine, set or exercise lookup found nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// The record belongs to another user
    #[error("Permission denied: {0}")]
    NotOwner(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
