//! Build id manifest.
//!
//! ```toml
//! BUILD_ID_CSS = "<64 hex>"
//! BUILD_ID_JS = "<64 hex>"
//! BUILD_ID_IMG = "<64 hex>"
//!
//! [BUNDLE_HASHES]
//! "css:main" = "abc1234"
//! ```
//!
//! The only artifact downstream cache invalidation reads.

use anyhow::{Context, Result};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::config::ProjectConfig;
use crate::core::AssetType;
use crate::freshness::checksum_paths;
use crate::utils::path::resolve_static;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildManifest {
    #[serde(rename = "BUILD_ID_CSS")]
    pub css: String,

    #[serde(rename = "BUILD_ID_JS")]
    pub js: String,

    #[serde(rename = "BUILD_ID_IMG")]
    pub img: String,

    #[serde(rename = "BUNDLE_HASHES", default)]
    pub bundle_hashes: BTreeMap<String, String>,
}

impl BuildManifest {
    /// Checksum every configured source, per asset type, plus the image tree.
    ///
    /// Sources are the configured references, not their compiled `.less.css`
    /// siblings.
    pub fn compute(config: &ProjectConfig, bundle_hashes: BTreeMap<String, String>) -> Self {
        let sources = |kind: AssetType| {
            config
                .bundles
                .files_of(kind)
                .map(|file| resolve_static(config.static_root(), file))
                .collect::<Vec<_>>()
        };

        Self {
            css: checksum_paths(sources(AssetType::Css)).to_hex(),
            js: checksum_paths(sources(AssetType::Js)).to_hex(),
            img: checksum_paths([config.paths.image_dir()]).to_hex(),
            bundle_hashes,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse manifest {}", path.display()))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize manifest")
    }

    /// Write through a temp sibling and rename, so readers never see a
    /// partial manifest.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = Path::new(&tmp);

        fs::write(tmp, self.to_toml()?)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(tmp, path)
            .with_context(|| format!("Failed to write manifest to {}", path.display()))
    }
}

/// Entries of a previous manifest for bundles that are still configured.
pub fn carried_over_hashes(config: &ProjectConfig) -> BTreeMap<String, String> {
    let path = &config.paths.manifest;
    if !path.exists() {
        return BTreeMap::new();
    }

    let previous = match BuildManifest::load(path) {
        Ok(manifest) => manifest,
        Err(e) => {
            crate::log!("warning"; "ignoring previous manifest: {:#}", e);
            return BTreeMap::new();
        }
    };

    let configured: FxHashSet<String> = config
        .bundles
        .bundles()
        .iter()
        .map(|b| b.key.to_string())
        .collect();

    previous
        .bundle_hashes
        .into_iter()
        .filter(|(key, _)| configured.contains(key))
        .collect()
}
