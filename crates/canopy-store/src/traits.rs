use canopy_hash::ContentHasher;
use canopy_types::Fingerprint;

use crate::error::{StoreError, StoreResult};
use crate::object::Tree;

/// Content-addressed object store.
///
/// All implementations must satisfy these invariants:
/// - Objects are immutable once written; the store is append-only.
/// - `put` is idempotent: rewriting content that already exists is a
///   no-op that still returns the fingerprint.
/// - The store never holds two different payloads under one fingerprint;
///   a conflicting write fails with [`StoreError::HashCollision`].
/// - Every write is atomic from the caller's perspective: a concurrent
///   reader never observes a partially written object.
/// - The store never interprets object contents: it is a pure key-value
///   store. Blobs and trees share one fingerprint namespace.
/// - All I/O errors are propagated, never silently ignored.
pub trait ObjectStore: Send + Sync {
    /// Write content and return its fingerprint.
    ///
    /// The fingerprint is computed over the normalized content; the stored
    /// payload is the original bytes, verbatim. If an object with this
    /// fingerprint already exists the write is skipped.
    fn put(&self, data: &[u8]) -> StoreResult<Fingerprint>;

    /// Read an object's payload by fingerprint.
    ///
    /// Fails with [`StoreError::NotFound`] if the object is absent.
    fn get(&self, fingerprint: &Fingerprint) -> StoreResult<Vec<u8>>;

    /// Check whether an object exists in the store.
    fn exists(&self, fingerprint: &Fingerprint) -> StoreResult<bool>;

    /// Write a tree object in its canonical serialization.
    fn put_tree(&self, tree: &Tree) -> StoreResult<Fingerprint> {
        self.put(&tree.to_bytes())
    }

    /// Read and decode a tree object.
    ///
    /// Fails with [`StoreError::CorruptObject`] if the payload is not a
    /// canonical tree serialization.
    fn get_tree(&self, fingerprint: &Fingerprint) -> StoreResult<Tree> {
        Tree::parse(&self.get(fingerprint)?)
    }
}

/// Collision check for deduplicating writes.
///
/// Payloads are compared in normalized form: raw variants that normalize
/// identically (CRLF vs LF renditions of the same text) are legitimate
/// duplicates and keep the first-stored bytes. Normalized-different
/// payloads under one fingerprint mean the digest has been broken or the
/// store tampered with, and the write must be refused.
pub(crate) fn check_collision(
    fingerprint: &Fingerprint,
    existing: &[u8],
    incoming: &[u8],
) -> StoreResult<()> {
    if ContentHasher::normalize(existing) != ContentHasher::normalize(incoming) {
        return Err(StoreError::HashCollision {
            fingerprint: *fingerprint,
        });
    }
    Ok(())
}
