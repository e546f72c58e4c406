//! `[paths]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [paths]
//! static_root = "static"      # Bundle sources and outputs (relative to project root)
//! manifest = "build.toml"     # Build id manifest (relative to project root)
//! images = "img"              # Image tree hashed into BUILD_ID_IMG (relative to static root)
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Base directory every bundle source reference resolves against.
    pub static_root: PathBuf,

    /// Manifest output file.
    pub manifest: PathBuf,

    /// Image directory, relative to the static root.
    pub images: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            static_root: "static".into(),
            manifest: "build.toml".into(),
            images: "img".into(),
        }
    }
}

impl PathsConfig {
    /// Make `static_root` and `manifest` absolute against the project root.
    pub fn normalize(&mut self, root: &Path) {
        self.static_root = crate::utils::path::normalize_path(&root.join(&self.static_root));
        self.manifest = crate::utils::path::normalize_lexical(&root.join(&self.manifest));
    }

    /// Image directory (absolute once normalized).
    pub fn image_dir(&self) -> PathBuf {
        self.static_root.join(&self.images)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.static_root.is_dir() {
            diag.error_with_hint(
                FieldPath::new("paths.static_root"),
                format!("directory `{}` does not exist", self.static_root.display()),
                "static_root is resolved relative to the directory containing bundlekit.toml",
            );
        }
        if self.images.is_absolute() {
            diag.error(
                FieldPath::new("paths.images"),
                "must be relative to the static root",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let paths = PathsConfig::default();
        assert_eq!(paths.static_root, PathBuf::from("static"));
        assert_eq!(paths.manifest, PathBuf::from("build.toml"));
        assert_eq!(paths.images, PathBuf::from("img"));
    }

    #[test]
    fn test_missing_static_root_is_error() {
        let mut paths = PathsConfig::default();
        paths.static_root = "/definitely/not/here/static".into();
        let mut diag = ConfigDiagnostics::new();
        paths.validate(&mut diag);
        assert!(diag.has_errors());
    }
}
