//! Validated tree paths.
//!
//! Every path in the staging index and tree materializer is a relative path
//! using the canonical `/` separator, regardless of the host filesystem.
//! Validation happens once, at construction; the rest of the system can
//! assume a `TreePath` is well-formed.

use std::fmt;

use crate::error::TypeError;

/// The canonical logical path separator.
///
/// Stored paths always use `/`. Callers staging files from a native
/// filesystem are responsible for converting native separators before
/// constructing a `TreePath`.
pub const SEPARATOR: char = '/';

/// A validated, segment-delimited relative path.
///
/// Invariants held by construction:
/// - non-empty, no leading or trailing separator
/// - no empty segments (`a//b` is rejected)
/// - no `.` or `..` segments
/// - no `\n` or `\r` inside segments (the canonical serializations are
///   line-oriented, so a newline in a name would forge extra entries)
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreePath {
    raw: String,
}

impl TreePath {
    /// Parse and validate a path string.
    pub fn parse(path: impl Into<String>) -> Result<Self, TypeError> {
        let raw = path.into();

        if raw.is_empty() {
            return Err(invalid(&raw, "path must not be empty"));
        }
        if raw.starts_with(SEPARATOR) || raw.ends_with(SEPARATOR) {
            return Err(invalid(&raw, "path must not start or end with '/'"));
        }

        for segment in raw.split(SEPARATOR) {
            validate_segment(&raw, segment)?;
        }

        Ok(Self { raw })
    }

    /// The path as a string, canonical separators included.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The path segments, in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.raw.split(SEPARATOR)
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Split into the first segment and the remainder, if any.
    ///
    /// A single-segment path returns `(segment, None)`.
    pub fn split_first(&self) -> (&str, Option<&str>) {
        match self.raw.split_once(SEPARATOR) {
            Some((first, rest)) => (first, Some(rest)),
            None => (self.raw.as_str(), None),
        }
    }

    /// The final segment (the entry name within its directory).
    pub fn file_name(&self) -> &str {
        self.raw
            .rsplit(SEPARATOR)
            .next()
            .unwrap_or(self.raw.as_str())
    }
}

fn validate_segment(path: &str, segment: &str) -> Result<(), TypeError> {
    if segment.is_empty() {
        return Err(invalid(path, "empty path segment"));
    }
    if segment == "." || segment == ".." {
        return Err(invalid(path, "'.' and '..' segments are not allowed"));
    }
    if segment.contains('\n') || segment.contains('\r') {
        return Err(invalid(path, "segment contains a line terminator"));
    }
    Ok(())
}

fn invalid(path: &str, reason: &str) -> TypeError {
    TypeError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

impl fmt::Debug for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TreePath({:?})", self.raw)
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl AsRef<str> for TreePath {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

// Ord on TreePath is the byte-wise order of the raw string, so str-keyed
// lookups in ordered maps are sound.
impl std::borrow::Borrow<str> for TreePath {
    fn borrow(&self) -> &str {
        &self.raw
    }
}

impl TryFrom<&str> for TreePath {
    type Error = TypeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}
