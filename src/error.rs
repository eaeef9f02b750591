//! Error types for the validation engine.
//!
//! Only the top-level document shape is fatal. Everything else (unparsable
//! slot labels, staff without a target entry) is recovered locally and
//! surfaces inside the report instead of as an error.

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Error type for engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The top-level structure could not be interpreted as a sequence of
    /// room schedule objects.
    #[error("Invalid schedule document: {0}")]
    InvalidDocument(String),

    /// A schedule file could not be read.
    #[error("Failed to read schedule file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
