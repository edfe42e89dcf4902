//! Error types for the index crate.

use canopy_types::TypeError;

/// Errors that can occur during index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// An invalid path was provided.
    #[error(transparent)]
    InvalidPath(#[from] TypeError),

    /// The specified path is not present in the index.
    #[error("path not found in index: {0}")]
    PathNotFound(String),

    /// A persisted index line could not be parsed.
    #[error("malformed index line {line_no}: {reason}")]
    Parse { line_no: usize, reason: String },

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] canopy_store::StoreError),

    /// I/O error reading or writing the persisted index.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
