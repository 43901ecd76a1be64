use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Runtime metadata keyed by runtime (`spec_version`) version.
///
/// Append-only: the first blob stored for a version is kept for the life of
/// the cache and later `put`s for that version are no-ops. There is no
/// eviction; a session only ever sees a handful of runtime versions.
#[derive(Debug, Default)]
pub struct MetadataCache {
    entries: RwLock<HashMap<u32, Arc<[u8]>>>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, runtime_version: u32) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&runtime_version)
    }

    pub fn get(&self, runtime_version: u32) -> Option<Arc<[u8]>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&runtime_version)
            .cloned()
    }

    /// Inserts the blob unless the version is already cached.
    ///
    /// Returns `true` if this call stored it.
    pub fn put(&self, runtime_version: u32, metadata: impl Into<Arc<[u8]>>) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        if entries.contains_key(&runtime_version) {
            return false;
        }

        entries.insert(runtime_version, metadata.into());
        true
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached runtime versions in ascending order.
    pub fn versions(&self) -> Vec<u32> {
        let mut versions: Vec<u32> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect();
        versions.sort_unstable();
        versions
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
