use canopy_hash::ContentHasher;
use canopy_types::Fingerprint;

use crate::error::{StoreError, StoreResult};

/// The kind of object a tree entry references.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Raw file content.
    Blob,
    /// A directory listing.
    Tree,
}

impl ObjectKind {
    /// Parse from the canonical serialized token.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "blob" => Some(Self::Blob),
            "tree" => Some(Self::Tree),
            _ => None,
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blob => write!(f, "blob"),
            Self::Tree => write!(f, "tree"),
        }
    }
}

/// A single entry in a tree object: one named blob or subtree reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeEntry {
    /// Whether the entry references a blob or a subtree.
    pub kind: ObjectKind,
    /// Fingerprint of the referenced object.
    pub fingerprint: Fingerprint,
    /// Entry name: the final path segment, no separators.
    pub name: String,
}

impl TreeEntry {
    /// Create a new tree entry.
    pub fn new(kind: ObjectKind, fingerprint: Fingerprint, name: impl Into<String>) -> Self {
        Self {
            kind,
            fingerprint,
            name: name.into(),
        }
    }
}

impl PartialOrd for TreeEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TreeEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Byte-wise lexicographic on the name; names are unique within a
        // tree, so this is a total order in practice.
        self.name.as_bytes().cmp(other.name.as_bytes())
    }
}

/// Directory listing object.
///
/// A tree's identity is the fingerprint of its canonical serialization:
/// one `<kind> <fingerprint> <name>` line per entry, newline-joined with
/// no trailing newline, entries sorted by name. The same entry set always
/// serializes identically, which makes the fingerprint a pure function of
/// the member set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tree {
    /// Sorted entries in this directory.
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    /// Create a new tree with the given entries.
    ///
    /// Entries are sorted by name for deterministic serialization.
    pub fn new(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort();
        Self { entries }
    }

    /// Create an empty tree.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The canonical serialization: the exact bytes hashed and stored.
    pub fn to_bytes(&self) -> Vec<u8> {
        let lines: Vec<String> = self
            .entries
            .iter()
            .map(|e| format!("{} {} {}", e.kind, e.fingerprint, e.name))
            .collect();
        lines.join("\n").into_bytes()
    }

    /// The fingerprint of this tree's canonical serialization.
    pub fn fingerprint(&self) -> Fingerprint {
        ContentHasher::fingerprint(&self.to_bytes())
    }

    /// Decode a tree from its canonical serialization.
    ///
    /// Rejects malformed lines, unknown kinds, names containing
    /// separators, and entries that are unsorted or duplicated; a stored
    /// tree that is not in canonical form is corrupt, not fixable.
    pub fn parse(data: &[u8]) -> StoreResult<Self> {
        let corrupt = |reason: String| StoreError::CorruptObject {
            fingerprint: ContentHasher::fingerprint(data),
            reason,
        };

        let text = std::str::from_utf8(data)
            .map_err(|e| corrupt(format!("tree is not valid UTF-8: {e}")))?;

        if text.is_empty() {
            return Ok(Self::empty());
        }

        let mut entries = Vec::new();
        for line in text.split('\n') {
            let mut parts = line.splitn(3, ' ');
            let (kind, fingerprint, name) = match (parts.next(), parts.next(), parts.next()) {
                (Some(k), Some(f), Some(n)) => (k, f, n),
                _ => return Err(corrupt(format!("malformed tree entry line: {line:?}"))),
            };

            let kind = ObjectKind::parse(kind)
                .ok_or_else(|| corrupt(format!("unknown entry kind: {kind:?}")))?;
            let fingerprint = Fingerprint::from_hex(fingerprint)
                .map_err(|e| corrupt(format!("bad fingerprint in tree entry: {e}")))?;
            if name.is_empty() || name.contains('/') {
                return Err(corrupt(format!("invalid entry name: {name:?}")));
            }

            entries.push(TreeEntry::new(kind, fingerprint, name));
        }

        // Canonical form is strictly sorted; anything else is corruption.
        for pair in entries.windows(2) {
            if pair[0].name.as_bytes() >= pair[1].name.as_bytes() {
                return Err(corrupt(format!(
                    "entries out of order: {:?} before {:?}",
                    pair[0].name, pair[1].name
                )));
            }
        }

        Ok(Self { entries })
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fp(byte: u8) -> Fingerprint {
        Fingerprint::from_digest([byte; 20])
    }

    #[test]
    fn tree_entries_sorted_on_construction() {
        let tree = Tree::new(vec![
            TreeEntry::new(ObjectKind::Blob, fp(1), "zebra.txt"),
            TreeEntry::new(ObjectKind::Blob, fp(2), "alpha.txt"),
            TreeEntry::new(ObjectKind::Tree, fp(3), "middle"),
        ]);
        assert_eq!(tree.entries[0].name, "alpha.txt");
        assert_eq!(tree.entries[1].name, "middle");
        assert_eq!(tree.entries[2].name, "zebra.txt");
    }

    #[test]
    fn serialization_format_is_line_per_entry() {
        let tree = Tree::new(vec![
            TreeEntry::new(ObjectKind::Tree, fp(0xaa), "a"),
            TreeEntry::new(ObjectKind::Blob, fp(0xbb), "b.txt"),
        ]);
        let expected = format!("tree {} a\nblob {} b.txt", fp(0xaa), fp(0xbb));
        assert_eq!(tree.to_bytes(), expected.as_bytes());
    }

    #[test]
    fn serialization_has_no_trailing_newline() {
        let tree = Tree::new(vec![TreeEntry::new(ObjectKind::Blob, fp(1), "only.txt")]);
        let bytes = tree.to_bytes();
        assert_ne!(bytes.last(), Some(&b'\n'));
    }

    #[test]
    fn roundtrip_through_canonical_bytes() {
        let tree = Tree::new(vec![
            TreeEntry::new(ObjectKind::Blob, fp(1), "file with spaces.txt"),
            TreeEntry::new(ObjectKind::Tree, fp(2), "subdir"),
        ]);
        let parsed = Tree::parse(&tree.to_bytes()).unwrap();
        assert_eq!(parsed, tree);
    }

    #[test]
    fn empty_tree_roundtrip() {
        let tree = Tree::empty();
        assert!(tree.is_empty());
        let parsed = Tree::parse(&tree.to_bytes()).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn fingerprint_depends_only_on_entry_set() {
        let a = Tree::new(vec![
            TreeEntry::new(ObjectKind::Blob, fp(1), "x"),
            TreeEntry::new(ObjectKind::Blob, fp(2), "y"),
        ]);
        let b = Tree::new(vec![
            TreeEntry::new(ObjectKind::Blob, fp(2), "y"),
            TreeEntry::new(ObjectKind::Blob, fp(1), "x"),
        ]);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn fingerprint_changes_with_any_entry_field() {
        let base = Tree::new(vec![TreeEntry::new(ObjectKind::Blob, fp(1), "x")]);
        let renamed = Tree::new(vec![TreeEntry::new(ObjectKind::Blob, fp(1), "y")]);
        let rehashed = Tree::new(vec![TreeEntry::new(ObjectKind::Blob, fp(2), "x")]);
        let rekinded = Tree::new(vec![TreeEntry::new(ObjectKind::Tree, fp(1), "x")]);
        assert_ne!(base.fingerprint(), renamed.fingerprint());
        assert_ne!(base.fingerprint(), rehashed.fingerprint());
        assert_ne!(base.fingerprint(), rekinded.fingerprint());
    }

    #[test]
    fn parse_rejects_malformed_line() {
        let err = Tree::parse(b"blob only-two-fields").unwrap_err();
        assert!(matches!(err, StoreError::CorruptObject { .. }));
    }

    #[test]
    fn parse_rejects_unknown_kind() {
        let line = format!("commit {} name", fp(1));
        let err = Tree::parse(line.as_bytes()).unwrap_err();
        assert!(matches!(err, StoreError::CorruptObject { .. }));
    }

    #[test]
    fn parse_rejects_bad_fingerprint() {
        let err = Tree::parse(b"blob nothex name").unwrap_err();
        assert!(matches!(err, StoreError::CorruptObject { .. }));
    }

    #[test]
    fn parse_rejects_separator_in_name() {
        let line = format!("blob {} a/b", fp(1));
        let err = Tree::parse(line.as_bytes()).unwrap_err();
        assert!(matches!(err, StoreError::CorruptObject { .. }));
    }

    #[test]
    fn parse_rejects_unsorted_entries() {
        let data = format!("blob {} b\nblob {} a", fp(1), fp(2));
        let err = Tree::parse(data.as_bytes()).unwrap_err();
        assert!(matches!(err, StoreError::CorruptObject { .. }));
    }

    #[test]
    fn parse_rejects_duplicate_names() {
        let data = format!("blob {} same\ntree {} same", fp(1), fp(2));
        let err = Tree::parse(data.as_bytes()).unwrap_err();
        assert!(matches!(err, StoreError::CorruptObject { .. }));
    }

    #[test]
    fn get_entry_by_name() {
        let tree = Tree::new(vec![
            TreeEntry::new(ObjectKind::Blob, fp(1), "a.txt"),
            TreeEntry::new(ObjectKind::Tree, fp(2), "dir"),
        ]);
        assert_eq!(tree.get("dir").unwrap().kind, ObjectKind::Tree);
        assert!(tree.get("missing").is_none());
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn object_kind_display_and_parse() {
        assert_eq!(format!("{}", ObjectKind::Blob), "blob");
        assert_eq!(format!("{}", ObjectKind::Tree), "tree");
        assert_eq!(ObjectKind::parse("blob"), Some(ObjectKind::Blob));
        assert_eq!(ObjectKind::parse("tree"), Some(ObjectKind::Tree));
        assert_eq!(ObjectKind::parse("commit"), None);
    }
}
