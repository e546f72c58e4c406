//! Per-bundle outcomes and the run-level report folded from them.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::BundleKey;

/// Error that aborts a single bundle (never the run).
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("source file `{}` not found", path.display())]
    MissingSource { path: PathBuf },

    #[error("IO error on `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BundleError {
    /// Classify an IO error on `path`: not-found becomes `MissingSource`.
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Self::MissingSource { path }
        } else {
            Self::Io { path, source }
        }
    }
}

/// One recorded external tool failure (non-zero exit, spawn or parse failure).
#[derive(Debug, Clone)]
pub struct ToolFailure {
    pub tool: String,
    pub file: PathBuf,
    pub message: String,
}

/// Terminal state of one bundle.
#[derive(Debug)]
pub enum BundleOutcome {
    /// Content changed and the minifier was dispatched.
    Built,
    /// Concatenation unchanged, minification skipped.
    Skipped,
    /// Aborted before finalization.
    Failed(BundleError),
}

#[derive(Debug)]
pub struct BundleReport {
    pub key: BundleKey,
    pub outcome: BundleOutcome,
    pub tool_failures: Vec<ToolFailure>,
    /// Images referenced by the bundle that could not be fingerprinted.
    pub unresolved_images: usize,
    /// Cache-busting fingerprint, when the rewrite ran.
    pub hash: Option<String>,
}

impl BundleReport {
    pub fn new(key: BundleKey, outcome: BundleOutcome) -> Self {
        Self {
            key,
            outcome,
            tool_failures: Vec::new(),
            unresolved_images: 0,
            hash: None,
        }
    }

    pub fn is_missing_source(&self) -> bool {
        matches!(
            self.outcome,
            BundleOutcome::Failed(BundleError::MissingSource { .. })
        )
    }
}

/// Result of a full build run.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub bundles: Vec<BundleReport>,
    /// Files that could not be read by the fingerprinting cache.
    pub missing_files: usize,
}

impl BuildReport {
    pub fn built(&self) -> usize {
        self.count(|o| matches!(o, BundleOutcome::Built))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, BundleOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, BundleOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&BundleOutcome) -> bool) -> usize {
        self.bundles.iter().filter(|b| pred(&b.outcome)).count()
    }

    /// Missing files across the run: unreadable fingerprint targets plus
    /// bundles aborted on a missing source.
    pub fn total_missing(&self) -> usize {
        self.missing_files + self.bundles.iter().filter(|b| b.is_missing_source()).count()
    }

    pub fn tool_failures(&self) -> impl Iterator<Item = &ToolFailure> {
        self.bundles.iter().flat_map(|b| b.tool_failures.iter())
    }

    /// The run fails only on external tool failures.
    pub fn has_tool_failures(&self) -> bool {
        self.tool_failures().next().is_some()
    }

    pub fn get(&self, key: &BundleKey) -> Option<&BundleReport> {
        self.bundles.iter().find(|b| &b.key == key)
    }
}
