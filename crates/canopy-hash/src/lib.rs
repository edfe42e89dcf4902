//! Content hashing for Canopy.
//!
//! Provides the deterministic fingerprint function over byte content that
//! every object identity in the system derives from. Hashing wraps an
//! established digest implementation, no custom cryptography.
//!
//! Fingerprints are computed over *normalized* bytes: a single leading
//! byte-order-mark is stripped and all line terminators are rewritten to
//! `\n`. Normalization exists only in hash space: stored payloads keep
//! their original bytes. This makes logically identical text checked out
//! on different operating systems fingerprint identically.

pub mod hasher;

pub use hasher::ContentHasher;
