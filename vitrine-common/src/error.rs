//! Common error types for Vitrine

use thiserror::Error;

/// Common result type for Vitrine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the Vitrine crates
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Explicitly requested file does not exist
    #[error("Not found: {0}")]
    NotFound(String),
}
