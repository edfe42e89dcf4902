//! Tree materialization for Canopy.
//!
//! Collapses a flat set of `(path, fingerprint)` pairs (a snapshot of the
//! staging index) into a hierarchy of canonical tree objects, persisting
//! each level into the object store bottom-up. The returned root
//! fingerprint uniquely identifies the entire staged snapshot: it depends
//! only on the set of pairs, never on their input order.
//!
//! # Key Types
//!
//! - [`TreeBuilder`] -- recursive partition-by-first-segment materializer
//! - [`BuildError`] -- error taxonomy for materialization

pub mod builder;
pub mod error;

pub use builder::TreeBuilder;
pub use error::{BuildError, BuildResult};
