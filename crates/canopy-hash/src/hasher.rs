use std::borrow::Cow;

use canopy_types::Fingerprint;
use sha1::{Digest, Sha1};

/// The UTF-8 byte-order-mark; stripped (once) before hashing.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Line-ending-neutral content hasher.
///
/// `fingerprint` is a pure function of the normalized content: the same
/// logical text always produces the same 160-bit digest regardless of the
/// platform's line-ending convention or a leading byte-order-mark.
pub struct ContentHasher;

impl ContentHasher {
    /// Compute the fingerprint of the given content.
    ///
    /// Total over all byte sequences; the empty sequence has a well-defined
    /// constant fingerprint.
    pub fn fingerprint(data: &[u8]) -> Fingerprint {
        let normalized = Self::normalize(data);
        let digest = Sha1::digest(normalized.as_ref());
        Fingerprint::from_digest(digest.into())
    }

    /// Normalize content for hashing: strip a single leading BOM and
    /// rewrite `\r\n` and lone `\r` to `\n`.
    ///
    /// Borrows the input when it is already normalized, so hashing clean
    /// content allocates nothing.
    pub fn normalize(data: &[u8]) -> Cow<'_, [u8]> {
        let stripped = match data.strip_prefix(UTF8_BOM) {
            Some(rest) => rest,
            None => data,
        };

        if !stripped.contains(&b'\r') {
            return Cow::Borrowed(stripped);
        }

        let mut out = Vec::with_capacity(stripped.len());
        let mut i = 0;
        while i < stripped.len() {
            match stripped[i] {
                b'\r' => {
                    out.push(b'\n');
                    // Swallow the '\n' of a '\r\n' pair.
                    if stripped.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                }
                b => out.push(b),
            }
            i += 1;
        }
        Cow::Owned(out)
    }

    /// Verify that content produces the expected fingerprint.
    pub fn verify(data: &[u8], expected: &Fingerprint) -> bool {
        Self::fingerprint(data) == *expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fingerprint_is_deterministic() {
        let data = b"hello world";
        let fp1 = ContentHasher::fingerprint(data);
        let fp2 = ContentHasher::fingerprint(data);
        assert_eq!(fp1, fp2);
    }

    #[test]
    fn different_content_produces_different_fingerprints() {
        let fp1 = ContentHasher::fingerprint(b"hello");
        let fp2 = ContentHasher::fingerprint(b"world");
        assert_ne!(fp1, fp2);
    }

    #[test]
    fn empty_content_has_constant_fingerprint() {
        // SHA-1 of the empty message.
        let fp = ContentHasher::fingerprint(b"");
        assert_eq!(fp.to_hex(), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }

    #[test]
    fn crlf_and_lf_fingerprint_identically() {
        let unix = ContentHasher::fingerprint(b"line one\nline two\n");
        let windows = ContentHasher::fingerprint(b"line one\r\nline two\r\n");
        assert_eq!(unix, windows);
    }

    #[test]
    fn lone_cr_fingerprints_as_lf() {
        let classic_mac = ContentHasher::fingerprint(b"line one\rline two\r");
        let unix = ContentHasher::fingerprint(b"line one\nline two\n");
        assert_eq!(classic_mac, unix);
    }

    #[test]
    fn bom_is_stripped_once() {
        let with_bom = ContentHasher::fingerprint(b"\xEF\xBB\xBFcontent");
        let without = ContentHasher::fingerprint(b"content");
        assert_eq!(with_bom, without);

        // A double BOM keeps the second one: only a single leading BOM is
        // stripped.
        let double = ContentHasher::fingerprint(b"\xEF\xBB\xBF\xEF\xBB\xBFcontent");
        assert_ne!(double, without);
    }

    #[test]
    fn normalize_borrows_clean_input() {
        let clean = b"no carriage returns here\n";
        assert!(matches!(
            ContentHasher::normalize(clean),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn normalize_rewrites_mixed_endings() {
        let mixed = b"a\r\nb\rc\n";
        assert_eq!(ContentHasher::normalize(mixed).as_ref(), b"a\nb\nc\n");
    }

    #[test]
    fn crlf_split_across_cr_then_lf_collapses() {
        // "\r\n" must become a single "\n", not two.
        assert_eq!(ContentHasher::normalize(b"\r\n").as_ref(), b"\n");
        assert_eq!(ContentHasher::normalize(b"\r\r\n").as_ref(), b"\n\n");
    }

    #[test]
    fn verify_correct_and_incorrect() {
        let fp = ContentHasher::fingerprint(b"original");
        assert!(ContentHasher::verify(b"original", &fp));
        assert!(!ContentHasher::verify(b"tampered", &fp));
    }

    #[test]
    fn binary_content_passes_through_untouched() {
        let binary = [0u8, 1, 2, 255, 254, 7];
        assert_eq!(ContentHasher::normalize(&binary).as_ref(), &binary[..]);
    }

    proptest! {
        #[test]
        fn fingerprint_is_pure(data: Vec<u8>) {
            prop_assert_eq!(
                ContentHasher::fingerprint(&data),
                ContentHasher::fingerprint(&data)
            );
        }

        #[test]
        fn normalized_output_contains_no_cr(data: Vec<u8>) {
            let normalized = ContentHasher::normalize(&data);
            prop_assert!(!normalized.contains(&b'\r'));
        }

        #[test]
        fn normalization_is_idempotent(data: Vec<u8>) {
            let once = ContentHasher::normalize(&data).into_owned();
            // Only a single leading BOM is stripped, so a stacked-BOM input
            // is the one place re-normalizing can differ. Everything else
            // must be a fixed point after one pass.
            prop_assume!(!once.starts_with(UTF8_BOM));
            let twice = ContentHasher::normalize(&once).into_owned();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn fingerprint_equals_fingerprint_of_normalized(data: Vec<u8>) {
            let normalized = ContentHasher::normalize(&data).into_owned();
            prop_assume!(!normalized.starts_with(UTF8_BOM));
            prop_assert_eq!(
                ContentHasher::fingerprint(&data),
                ContentHasher::fingerprint(&normalized)
            );
        }
    }
}
