//! Error types for tree materialization.

use canopy_types::TypeError;

/// Errors that can occur while materializing a tree.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A build was requested with zero entries: nothing is staged, there
    /// is no root to build.
    #[error("cannot build a tree from an empty entry set")]
    EmptyInput,

    /// One path names both a file and a directory (`a` next to `a/b`).
    #[error("path conflict: {path:?} is both a file and a directory")]
    PathConflict { path: String },

    /// An invalid path was provided.
    #[error(transparent)]
    InvalidPath(#[from] TypeError),

    /// Store operation failed. Includes `NotFound` when an entry's blob
    /// was never persisted; re-stage and retry.
    #[error("store error: {0}")]
    Store(#[from] canopy_store::StoreError),
}

/// Convenience alias for build results.
pub type BuildResult<T> = Result<T, BuildError>;
