use canopy_types::Fingerprint;

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested fingerprint is absent from the store.
    #[error("object not found: {0}")]
    NotFound(Fingerprint),

    /// Two distinct payloads claim the same fingerprint. Fatal integrity
    /// fault: the conflicting write is refused.
    #[error("hash collision on {fingerprint}: distinct content for one fingerprint")]
    HashCollision { fingerprint: Fingerprint },

    /// The object data is malformed or cannot be decoded.
    #[error("corrupt object {fingerprint}: {reason}")]
    CorruptObject {
        fingerprint: Fingerprint,
        reason: String,
    },

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
