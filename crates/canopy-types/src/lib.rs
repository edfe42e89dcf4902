//! Foundation types for Canopy.
//!
//! This crate provides the core identity and path types used throughout the
//! Canopy object model. Every other Canopy crate depends on `canopy-types`.
//!
//! # Key Types
//!
//! - [`Fingerprint`] -- Content-addressed identifier (160-bit digest)
//! - [`TreePath`] -- Validated, segment-delimited relative path
//! - [`TypeError`] -- Validation and parsing failures

pub mod error;
pub mod fingerprint;
pub mod path;

pub use error::TypeError;
pub use fingerprint::Fingerprint;
pub use path::{TreePath, SEPARATOR};
