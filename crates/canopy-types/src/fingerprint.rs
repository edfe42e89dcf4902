use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Number of bytes in a content digest.
pub const DIGEST_LEN: usize = 20;

/// Number of hex characters in a rendered fingerprint.
pub const HEX_LEN: usize = 40;

/// Content-addressed identifier for any stored object.
///
/// A `Fingerprint` is the 160-bit digest of an object's (normalized)
/// content. Identical content always produces the same `Fingerprint`,
/// making objects deduplicatable and verifiable. Blobs and trees share a
/// single fingerprint namespace.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; DIGEST_LEN]);

impl Fingerprint {
    /// Create a `Fingerprint` from a pre-computed digest.
    pub const fn from_digest(digest: [u8; DIGEST_LEN]) -> Self {
        Self(digest)
    }

    /// The null fingerprint (all zeros). Represents "no object".
    pub const fn null() -> Self {
        Self([0u8; DIGEST_LEN])
    }

    /// Returns `true` if this is the null fingerprint.
    pub fn is_null(&self) -> bool {
        self.0 == [0u8; DIGEST_LEN]
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Hex-encoded string representation (40 lowercase characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a 40-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != DIGEST_LEN {
            return Err(TypeError::InvalidLength {
                expected: DIGEST_LEN,
                actual: bytes.len(),
            });
        }
        let mut digest = [0u8; DIGEST_LEN];
        digest.copy_from_slice(&bytes);
        Ok(Self(digest))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.short_hex())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; DIGEST_LEN]> for Fingerprint {
    fn from(digest: [u8; DIGEST_LEN]) -> Self {
        Self(digest)
    }
}

impl From<Fingerprint> for [u8; DIGEST_LEN] {
    fn from(fp: Fingerprint) -> Self {
        fp.0
    }
}

// Serialized as the 40-character hex string, matching the wire and
// persisted-index formats.
impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_all_zeros() {
        let null = Fingerprint::null();
        assert!(null.is_null());
        assert_eq!(null.as_bytes(), &[0u8; DIGEST_LEN]);
    }

    #[test]
    fn non_null_digest_is_not_null() {
        let fp = Fingerprint::from_digest([1u8; DIGEST_LEN]);
        assert!(!fp.is_null());
    }

    #[test]
    fn hex_roundtrip() {
        let fp = Fingerprint::from_digest([0xab; DIGEST_LEN]);
        let hex = fp.to_hex();
        assert_eq!(hex.len(), HEX_LEN);
        let parsed = Fingerprint::from_hex(&hex).unwrap();
        assert_eq!(fp, parsed);
    }

    #[test]
    fn from_hex_rejects_bad_length() {
        let err = Fingerprint::from_hex("abcd").unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: DIGEST_LEN,
                actual: 2
            }
        );
    }

    #[test]
    fn from_hex_rejects_non_hex() {
        let err = Fingerprint::from_hex(&"zz".repeat(20)).unwrap_err();
        assert!(matches!(err, TypeError::InvalidHex(_)));
    }

    #[test]
    fn short_hex_is_8_chars() {
        let fp = Fingerprint::from_digest([0x5a; DIGEST_LEN]);
        assert_eq!(fp.short_hex(), "5a5a5a5a");
    }

    #[test]
    fn display_is_full_hex() {
        let fp = Fingerprint::from_digest([0x01; DIGEST_LEN]);
        let display = format!("{fp}");
        assert_eq!(display.len(), HEX_LEN);
        assert_eq!(display, fp.to_hex());
    }

    #[test]
    fn serde_roundtrip_as_hex_string() {
        let fp = Fingerprint::from_digest([7u8; DIGEST_LEN]);
        let json = serde_json::to_string(&fp).unwrap();
        assert_eq!(json, format!("\"{}\"", fp.to_hex()));
        let parsed: Fingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(fp, parsed);
    }

    #[test]
    fn deserialize_rejects_bad_hex() {
        let result: Result<Fingerprint, _> = serde_json::from_str("\"nothex\"");
        assert!(result.is_err());
    }

    #[test]
    fn ordering_is_consistent() {
        let fp1 = Fingerprint::from_digest([0; DIGEST_LEN]);
        let fp2 = Fingerprint::from_digest([1; DIGEST_LEN]);
        assert!(fp1 < fp2);
    }
}
