//! Custom error types for the trianglem-reader crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
///
/// Every variant is fatal for the container or file being decoded, but never
/// for sibling files in a batch: callers processing several archives report
/// the failure and move on.
#[derive(Debug, Error)]
pub enum FormatError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// A container's leading bytes did not match its expected signature.
    #[error("Bad magic in {container} container: expected {expected:?}, got {found:?}")]
    BadMagic {
        container: &'static str,
        expected: &'static [u8],
        found: Vec<u8>,
    },

    /// An index record could not be fully read before the buffer ended.
    #[error("Truncated index entry at offset {offset}")]
    TruncatedEntry { offset: usize },

    /// No recognized compressed-stream signature was found inside the scan
    /// window following the declared-size field.
    #[error("No deflate stream signature within {window} bytes of the container header")]
    StreamNotFound { window: usize },

    /// The located compressed stream could not be inflated.
    #[error("Inflate failed: {0}")]
    InflateError(String),
}

/// A convenience `Result` type alias using the crate's `FormatError` type.
pub type Result<T> = std::result::Result<T, FormatError>;
