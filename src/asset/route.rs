//! Bundle route: bundle key → on-disk artifact paths.

use std::path::{Path, PathBuf};

use crate::core::BundleKey;

/// On-disk artifacts of one bundle.
///
/// ```text
/// <static_root>/css/site-all.css       concatenation
/// <static_root>/css/site-all.css.tmp   in-progress concatenation
/// <static_root>/css/site-min.css       minified output
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleRoute {
    pub concatted: PathBuf,
    pub compressed: PathBuf,
    pub tmp: PathBuf,
}

impl BundleRoute {
    pub fn new(static_root: &Path, key: &BundleKey) -> Self {
        let dir = static_root.join(key.kind.as_str());
        let ext = key.kind.ext();
        let concatted = dir.join(format!("{}-all.{ext}", key.name));
        let compressed = dir.join(format!("{}-min.{ext}", key.name));
        let mut tmp = concatted.clone().into_os_string();
        tmp.push(".tmp");

        Self {
            concatted,
            compressed,
            tmp: tmp.into(),
        }
    }

    /// Directory holding all three artifacts.
    pub fn dir(&self) -> &Path {
        self.concatted.parent().unwrap_or(Path::new("."))
    }
}
