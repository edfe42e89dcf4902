use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::RwLock;

use canopy_hash::ContentHasher;
use canopy_types::Fingerprint;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::{check_collision, ObjectStore};

/// In-memory, HashMap-based object store.
///
/// Intended for tests and embedding. All objects are held in memory behind
/// a `RwLock` for safe concurrent access. Payloads are cloned on read.
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<Fingerprint, Vec<u8>>>,
}

impl InMemoryObjectStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all stored payloads.
    pub fn total_bytes(&self) -> u64 {
        self.objects
            .read()
            .expect("lock poisoned")
            .values()
            .map(|data| data.len() as u64)
            .sum()
    }

    /// Return a sorted list of all fingerprints in the store.
    pub fn all_fingerprints(&self) -> Vec<Fingerprint> {
        let map = self.objects.read().expect("lock poisoned");
        let mut ids: Vec<Fingerprint> = map.keys().copied().collect();
        ids.sort();
        ids
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn put(&self, data: &[u8]) -> StoreResult<Fingerprint> {
        let fingerprint = ContentHasher::fingerprint(data);
        let mut map = self.objects.write().expect("lock poisoned");
        match map.entry(fingerprint) {
            // Dedup no-op, unless the existing payload disagrees.
            Entry::Occupied(slot) => check_collision(&fingerprint, slot.get(), data)?,
            Entry::Vacant(slot) => {
                debug!(fingerprint = %fingerprint.short_hex(), size = data.len(), "object stored");
                slot.insert(data.to_vec());
            }
        }
        Ok(fingerprint)
    }

    fn get(&self, fingerprint: &Fingerprint) -> StoreResult<Vec<u8>> {
        let map = self.objects.read().expect("lock poisoned");
        map.get(fingerprint)
            .cloned()
            .ok_or(StoreError::NotFound(*fingerprint))
    }

    fn exists(&self, fingerprint: &Fingerprint) -> StoreResult<bool> {
        let map = self.objects.read().expect("lock poisoned");
        Ok(map.contains_key(fingerprint))
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("object_count", &self.len())
            .finish()
    }
}
