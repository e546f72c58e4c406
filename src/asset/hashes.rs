//! Bundle hash table: `"{type}:{name}"` → cache-busting fingerprint.

use parking_lot::Mutex;
use std::collections::BTreeMap;

use crate::core::BundleKey;

/// Append-only table shared by bundle workers during one run.
///
/// Backed by a `BTreeMap` so the serialized form is ordered by key
/// regardless of which worker finished first.
#[derive(Debug, Default)]
pub struct BundleHashTable {
    entries: Mutex<BTreeMap<String, String>>,
}

impl BundleHashTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: &BundleKey, hash: impl Into<String>) {
        self.entries.lock().insert(key.to_string(), hash.into());
    }

    pub fn get(&self, key: &BundleKey) -> Option<String> {
        self.entries.lock().get(&key.to_string()).cloned()
    }

    /// Add entries not already present.
    pub fn extend_missing(&self, other: impl IntoIterator<Item = (String, String)>) {
        let mut entries = self.entries.lock();
        for (key, hash) in other {
            entries.entry(key).or_insert(hash);
        }
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
