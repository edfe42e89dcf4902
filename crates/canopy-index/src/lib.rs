//! Staging index for Canopy.
//!
//! The index is a flat mapping from working-tree path to the fingerprint
//! of the staged content. It carries no tree structure itself; all
//! hierarchy is reconstructed by the tree materializer from a snapshot of
//! this mapping.
//!
//! # Key Types
//!
//! - [`StagingIndex`] -- The in-memory staging area (BTreeMap-backed)
//! - [`IndexError`] -- Error taxonomy for index operations

pub mod error;
pub mod index;

pub use error::{IndexError, IndexResult};
pub use index::StagingIndex;
