//! The core staging index structure.
//!
//! The [`StagingIndex`] manages a `BTreeMap<TreePath, Fingerprint>` as the
//! staging area. All operations are in-memory; discovering files on a
//! filesystem is the responsibility of the caller. The store handle is
//! used when staging raw content and is handed on to the tree
//! materializer.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use canopy_store::ObjectStore;
use canopy_types::{Fingerprint, TreePath};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{IndexError, IndexResult};

/// The staging index: a flat mapping from path to staged content
/// fingerprint.
///
/// Keys are unique on the full path; upserting an existing path replaces
/// the old fingerprint (last-write-wins). Entries are kept in byte-wise
/// lexicographic path order, so a snapshot is already sorted.
///
/// Mutation goes through `&mut self`; callers sharing an index across
/// threads wrap it in their own lock.
pub struct StagingIndex {
    entries: BTreeMap<TreePath, Fingerprint>,
    store: Arc<dyn ObjectStore>,
}

impl std::fmt::Debug for StagingIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StagingIndex")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl StagingIndex {
    /// Create a new empty index backed by the given store.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            entries: BTreeMap::new(),
            store,
        }
    }

    /// Number of entries in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the staged fingerprint for a path.
    pub fn get(&self, path: &str) -> Option<Fingerprint> {
        self.entries.get(path).copied()
    }

    /// The object store this index stages into.
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    // ---------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------

    /// Insert or replace the entry for a path (last-write-wins).
    ///
    /// The path is validated; the fingerprint is taken at face value and
    /// should already name an object in the store.
    pub fn upsert(&mut self, path: &str, fingerprint: Fingerprint) -> IndexResult<()> {
        let path = TreePath::parse(path)?;
        debug!(path = %path, fingerprint = %fingerprint.short_hex(), "index upsert");
        self.entries.insert(path, fingerprint);
        Ok(())
    }

    /// Stage raw content: hash it, store the blob, record the entry.
    ///
    /// Returns the content's fingerprint. Staging identical content twice
    /// stores one blob.
    pub fn stage_bytes(&mut self, path: &str, content: &[u8]) -> IndexResult<Fingerprint> {
        let fingerprint = self.store.put(content)?;
        self.upsert(path, fingerprint)?;
        Ok(fingerprint)
    }

    /// Remove the entry for a path, returning its fingerprint.
    pub fn remove(&mut self, path: &str) -> IndexResult<Fingerprint> {
        self.entries
            .remove(path)
            .ok_or_else(|| IndexError::PathNotFound(path.to_string()))
    }

    /// Clear the index (discard the staged snapshot).
    pub fn remove_all(&mut self) {
        debug!(discarded = self.entries.len(), "index cleared");
        self.entries.clear();
    }

    // ---------------------------------------------------------------
    // Snapshot
    // ---------------------------------------------------------------

    /// A consistent copy of all entries, sorted byte-wise by full path.
    ///
    /// This is the tree materializer's sole input; the copy does not
    /// change if the index is mutated mid-build.
    pub fn snapshot(&self) -> Vec<(TreePath, Fingerprint)> {
        self.entries
            .iter()
            .map(|(path, fp)| (path.clone(), *fp))
            .collect()
    }

    // ---------------------------------------------------------------
    // Durable form
    // ---------------------------------------------------------------

    /// Write the index to a file, one `<fingerprint> <path>` line per
    /// entry.
    ///
    /// The write is atomic: a temp file in the target directory is
    /// renamed into place.
    pub fn save(&self, path: &Path) -> IndexResult<()> {
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut tmp = match dir {
            Some(dir) => NamedTempFile::new_in(dir)?,
            None => NamedTempFile::new_in(".")?,
        };
        for (tree_path, fingerprint) in &self.entries {
            writeln!(tmp, "{fingerprint} {tree_path}")?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| IndexError::Io(e.error))?;
        debug!(entries = self.entries.len(), file = %path.display(), "index saved");
        Ok(())
    }

    /// Load an index from its persisted form.
    ///
    /// Line order on disk is irrelevant; entries land in the ordered map
    /// either way. Blank lines are skipped.
    pub fn load(store: Arc<dyn ObjectStore>, path: &Path) -> IndexResult<Self> {
        let text = fs::read_to_string(path)?;
        let mut index = Self::new(store);

        for (line_no, line) in text.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let (hex, raw_path) = line.split_once(' ').ok_or_else(|| IndexError::Parse {
                line_no: line_no + 1,
                reason: "expected '<fingerprint> <path>'".to_string(),
            })?;
            let fingerprint = Fingerprint::from_hex(hex).map_err(|e| IndexError::Parse {
                line_no: line_no + 1,
                reason: e.to_string(),
            })?;
            index.upsert(raw_path, fingerprint)?;
        }

        debug!(entries = index.len(), file = %path.display(), "index loaded");
        Ok(index)
    }
}
