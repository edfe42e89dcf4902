//! Content-addressed object storage for Canopy.
//!
//! This crate implements a fingerprint-keyed object store analogous to
//! git's `.git/objects/` directory. Every piece of data, file blobs and
//! directory trees alike, is stored as an immutable object identified by the
//! fingerprint of its (normalized) content.
//!
//! # Object Types
//!
//! - [`ObjectKind::Blob`] -- raw file content, stored verbatim
//! - [`ObjectKind::Tree`] -- a directory listing in its canonical line
//!   serialization ([`Tree`])
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsObjectStore`] -- flat directory of fingerprint-named files with
//!   atomic publication
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written; the store is append-only.
//! 2. `put` is idempotent and deduplicating: rewriting existing content is
//!    a no-op that still returns the fingerprint.
//! 3. Two different payloads under one fingerprint is store corruption
//!    ([`StoreError::HashCollision`]), never a silent overwrite.
//! 4. Concurrent reads are always safe (objects are immutable), and a
//!    reader never observes a partially written object.
//! 5. The store never interprets object contents -- it is a pure key-value
//!    store. Blobs and trees share one fingerprint namespace.
//! 6. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod fs;
pub mod memory;
pub mod object;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use fs::FsObjectStore;
pub use memory::InMemoryObjectStore;
pub use object::{ObjectKind, Tree, TreeEntry};
pub use traits::ObjectStore;
