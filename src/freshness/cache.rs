//! Run-scoped file fingerprint cache.
//!
//! Each build run owns one [`FileHasher`]. A path is read at most once per
//! run: later queries return the cached fingerprint even if the file has
//! changed on disk, and an unreadable file stays cached as `""`.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::debug;
use crate::utils::hash;
use crate::utils::path::normalize_lexical;

/// Memoized short fingerprints, safe to share across bundle workers.
#[derive(Debug, Default)]
pub struct FileHasher {
    hashes: DashMap<PathBuf, String>,
    missing: AtomicUsize,
}

impl FileHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fingerprint of `path`, or `""` if it cannot be read.
    pub fn fingerprint(&self, path: &Path) -> String {
        let key = normalize_lexical(path);
        if let Some(cached) = self.hashes.get(&key) {
            return cached.clone();
        }

        match self.hashes.entry(key) {
            Entry::Occupied(e) => e.get().clone(),
            Entry::Vacant(e) => {
                let fp = self.read_fingerprint(e.key());
                e.insert(fp).clone()
            }
        }
    }

    fn read_fingerprint(&self, path: &Path) -> String {
        match File::open(path).and_then(hash::fingerprint_reader) {
            Ok(fp) => fp,
            Err(_) => {
                self.missing.fetch_add(1, Ordering::Relaxed);
                debug!("hash"; " - could not find file {}", path.display());
                String::new()
            }
        }
    }

    /// Seed the cache with a fingerprint computed elsewhere.
    pub fn record(&self, path: &Path, fingerprint: &str) {
        self.hashes
            .insert(normalize_lexical(path), fingerprint.to_owned());
    }

    /// Number of unreadable files seen this run.
    pub fn missing_count(&self) -> usize {
        self.missing.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}
