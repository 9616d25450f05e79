//! Crate error type.

use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced by document operations and the file codec.
pub enum DocError {
    #[error("I/O error: {0}")]
    /// Filesystem I/O failed.
    Io(#[from] std::io::Error),

    #[error("document parse error: {0}")]
    /// The document file could not be parsed or declares an unsupported version.
    Parse(String),

    #[error("operation requires a non-empty selection")]
    /// A styling or comment operation was given an empty or inverted range.
    InvalidRange,

    #[error("invalid color '{0}': expected six hex digits")]
    /// A color value was not a six digit hex string.
    InvalidColor(String),
}

impl From<serde_json::Error> for DocError {
    fn from(err: serde_json::Error) -> Self {
        DocError::Parse(err.to_string())
    }
}
