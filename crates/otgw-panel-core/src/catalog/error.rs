//! Error types for definition parsing

use thiserror::Error;

/// Errors that can occur while reading the plugin's definitions
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Expected a JSON object or array of definitions, got {0}")]
    UnexpectedShape(String),

    #[error("Invalid message id '{0}'")]
    InvalidMessageId(String),

    #[error("Invalid flag mask '{mask}' in message {message}")]
    InvalidFlagMask { message: u8, mask: String },

    #[error("Missing field '{field}' in {context}")]
    MissingField { context: String, field: String },

    #[error("Invalid instance count for '{0}'")]
    InvalidCount(String),
}
