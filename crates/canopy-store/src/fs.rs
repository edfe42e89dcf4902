use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use canopy_hash::ContentHasher;
use canopy_types::Fingerprint;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::{check_collision, ObjectStore};

/// Filesystem-backed object store.
///
/// Objects live in a single flat directory, one file per object, named by
/// the 40-character hex fingerprint. Writes go to a temporary file in the
/// same directory and are published with an atomic rename, so a reader
/// never observes a partially written object and two concurrent `put`
/// calls for the same content cannot tear each other.
///
/// The directory handle is explicit configuration: there is no well-known
/// global store location.
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Open a store rooted at the given directory, creating it if needed.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of objects currently stored.
    ///
    /// Counts files whose names parse as fingerprints; stray temp files
    /// from in-flight writes are not objects.
    pub fn len(&self) -> StoreResult<usize> {
        let mut count = 0;
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                if Fingerprint::from_hex(name).is_ok() {
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    /// Returns `true` if the store holds no objects.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    fn object_path(&self, fingerprint: &Fingerprint) -> PathBuf {
        self.root.join(fingerprint.to_hex())
    }
}

impl ObjectStore for FsObjectStore {
    fn put(&self, data: &[u8]) -> StoreResult<Fingerprint> {
        let fingerprint = ContentHasher::fingerprint(data);
        let path = self.object_path(&fingerprint);

        match fs::read(&path) {
            Ok(existing) => {
                // Dedup no-op, unless the existing payload disagrees.
                check_collision(&fingerprint, &existing, data)?;
                return Ok(fingerprint);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        // Write-then-rename: the object appears under its final name all
        // at once or not at all.
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;

        debug!(
            fingerprint = %fingerprint.short_hex(),
            size = data.len(),
            "object written"
        );
        Ok(fingerprint)
    }

    fn get(&self, fingerprint: &Fingerprint) -> StoreResult<Vec<u8>> {
        match fs::read(self.object_path(fingerprint)) {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(*fingerprint))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, fingerprint: &Fingerprint) -> StoreResult<bool> {
        match fs::metadata(self.object_path(fingerprint)) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

impl std::fmt::Debug for FsObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsObjectStore")
            .field("root", &self.root)
            .finish()
    }
}
