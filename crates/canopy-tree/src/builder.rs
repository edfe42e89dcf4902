//! Recursive partition-by-prefix tree materialization.
//!
//! Each directory level groups its entries by first path segment: a
//! single-segment entry is a direct blob of the level, a multi-segment
//! entry joins the group of its leading segment, and each group is
//! recursed into exactly once. Children are persisted before the parent
//! tree that references them, so the store never holds a tree with
//! dangling entries.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;

use canopy_index::StagingIndex;
use canopy_store::{ObjectKind, ObjectStore, StoreError, Tree, TreeEntry};
use canopy_types::{Fingerprint, TreePath};
use tracing::{debug, trace};

use crate::error::{BuildError, BuildResult};

/// One resolved name at a directory level: either a staged blob or the
/// sub-entries that will become a subtree.
enum Node<'a> {
    Blob(Fingerprint),
    Dir(Vec<(&'a str, Fingerprint)>),
}

/// Materializes flat `(path, fingerprint)` snapshots into hash-linked
/// tree objects.
///
/// The builder holds an explicit store handle; it has no global state.
/// Building is a pure batch transform: the root fingerprint is a function
/// of the entry set alone.
pub struct TreeBuilder {
    store: Arc<dyn ObjectStore>,
}

impl TreeBuilder {
    /// Create a builder that persists tree objects into the given store.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Build the tree for a snapshot and return the root fingerprint.
    ///
    /// Every blob fingerprint must already exist in the store (staging
    /// put it there); a missing one surfaces as
    /// [`StoreError::NotFound`]. Paths must be unique and no path may be
    /// a directory prefix of another.
    ///
    /// Fails with [`BuildError::EmptyInput`] when `entries` is empty:
    /// nothing is staged, there is no root to build.
    pub fn build(&self, entries: &[(TreePath, Fingerprint)]) -> BuildResult<Fingerprint> {
        if entries.is_empty() {
            return Err(BuildError::EmptyInput);
        }

        let level: Vec<(&str, Fingerprint)> = entries
            .iter()
            .map(|(path, fp)| (path.as_str(), *fp))
            .collect();

        let root = self.build_level(&level, "")?;
        debug!(
            entries = entries.len(),
            root = %root.short_hex(),
            "snapshot materialized"
        );
        Ok(root)
    }

    /// Snapshot the given index and build its tree.
    pub fn build_index(&self, index: &StagingIndex) -> BuildResult<Fingerprint> {
        self.build(&index.snapshot())
    }

    /// Materialize one directory level.
    ///
    /// `entries` holds paths relative to this level; `dir` is the path of
    /// the level itself, used only for diagnostics. Returns the
    /// fingerprint of the persisted tree object.
    fn build_level(
        &self,
        entries: &[(&str, Fingerprint)],
        dir: &str,
    ) -> BuildResult<Fingerprint> {
        // Group by first segment. A validated TreePath has no empty
        // segments and no trailing separator, so the remainder after a
        // split is always a non-empty relative path.
        let mut nodes: BTreeMap<&str, Node> = BTreeMap::new();
        for &(rel, fp) in entries {
            match rel.split_once('/') {
                None => match nodes.entry(rel) {
                    Entry::Vacant(slot) => {
                        slot.insert(Node::Blob(fp));
                    }
                    Entry::Occupied(_) => {
                        return Err(BuildError::PathConflict {
                            path: join(dir, rel),
                        });
                    }
                },
                Some((first, rest)) => {
                    match nodes.entry(first).or_insert_with(|| Node::Dir(Vec::new())) {
                        Node::Dir(children) => children.push((rest, fp)),
                        Node::Blob(_) => {
                            return Err(BuildError::PathConflict {
                                path: join(dir, first),
                            });
                        }
                    }
                }
            }
        }

        // Resolve every group to a (kind, fingerprint, name) triple.
        // The map iterates in byte-wise name order, children persist
        // before this level's own tree object.
        let mut tree_entries = Vec::with_capacity(nodes.len());
        for (name, node) in nodes {
            let entry = match node {
                Node::Blob(fp) => {
                    if !self.store.exists(&fp)? {
                        return Err(StoreError::NotFound(fp).into());
                    }
                    TreeEntry::new(ObjectKind::Blob, fp, name)
                }
                Node::Dir(children) => {
                    let subtree = self.build_level(&children, &join(dir, name))?;
                    TreeEntry::new(ObjectKind::Tree, subtree, name)
                }
            };
            tree_entries.push(entry);
        }

        let tree = Tree::new(tree_entries);
        let fingerprint = self.store.put_tree(&tree)?;
        let level = if dir.is_empty() { "." } else { dir };
        trace!(
            dir = %level,
            entries = tree.len(),
            fingerprint = %fingerprint.short_hex(),
            "tree level persisted"
        );
        Ok(fingerprint)
    }

    /// Flatten a stored tree back into `(path, fingerprint)` pairs.
    ///
    /// The inverse of [`build`](Self::build). Pairs come back depth-first,
    /// name-ordered within each directory.
    pub fn read_entries(
        &self,
        root: &Fingerprint,
    ) -> BuildResult<Vec<(TreePath, Fingerprint)>> {
        let mut out = Vec::new();
        self.collect_entries(root, "", &mut out)?;
        Ok(out)
    }

    fn collect_entries(
        &self,
        fingerprint: &Fingerprint,
        prefix: &str,
        out: &mut Vec<(TreePath, Fingerprint)>,
    ) -> BuildResult<()> {
        let tree = self.store.get_tree(fingerprint)?;
        for entry in &tree.entries {
            let full = join(prefix, &entry.name);
            match entry.kind {
                ObjectKind::Blob => out.push((TreePath::parse(full)?, entry.fingerprint)),
                ObjectKind::Tree => self.collect_entries(&entry.fingerprint, &full, out)?,
            }
        }
        Ok(())
    }
}

fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}
