//! `[bundles]` section configuration.
//!
//! One table per asset type, mapping bundle name to its ordered source
//! files. Sources are relative to `paths.static_root`; concatenation
//! follows the listed order.
//!
//! # Example
//!
//! ```toml
//! [bundles.css]
//! common = ["css/reset.css", "css/site.less"]
//!
//! [bundles.js]
//! app = ["js/lib/jquery.js", "js/app.js"]
//! ```
//!
//! Outputs land in `<static_root>/<type>/<name>-all.<type>` and
//! `<static_root>/<type>/<name>-min.<type>`.

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::core::{AssetType, BundleKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Extension that triggers LESS preprocessing.
pub const LESS_EXT: &str = ".less";

/// One configured bundle: identity plus ordered source references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleConfig {
    pub key: BundleKey,
    pub files: Vec<String>,
}

impl BundleConfig {
    pub fn new<S: Into<String>>(
        kind: AssetType,
        name: impl Into<String>,
        files: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            key: BundleKey::new(kind, name),
            files: files.into_iter().map(Into::into).collect(),
        }
    }

    pub fn kind(&self) -> AssetType {
        self.key.kind
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }
}

/// `asset type → bundle name → files`, kept as raw strings so unknown
/// asset types surface as validation errors instead of parse errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BundlesConfig(BTreeMap<String, BTreeMap<String, Vec<String>>>);

impl BundlesConfig {
    /// Add or replace a bundle.
    pub fn insert<S: Into<String>>(
        &mut self,
        kind: AssetType,
        name: &str,
        files: impl IntoIterator<Item = S>,
    ) {
        self.0
            .entry(kind.as_str().to_owned())
            .or_default()
            .insert(name.to_owned(), files.into_iter().map(Into::into).collect());
    }

    /// All bundles in build order: css before js, names ascending.
    pub fn bundles(&self) -> Vec<BundleConfig> {
        AssetType::ALL
            .into_iter()
            .flat_map(|kind| {
                self.0
                    .get(kind.as_str())
                    .into_iter()
                    .flatten()
                    .map(move |(name, files)| BundleConfig::new(kind, name.as_str(), files.iter().cloned()))
            })
            .collect()
    }

    /// Every source reference of one asset type, across all its bundles.
    pub fn files_of(&self, kind: AssetType) -> impl Iterator<Item = &str> {
        self.0
            .get(kind.as_str())
            .into_iter()
            .flat_map(|bundles| bundles.values().flatten())
            .map(String::as_str)
    }

    pub fn has_less(&self) -> bool {
        self.files_of(AssetType::Css)
            .chain(self.files_of(AssetType::Js))
            .any(|f| f.ends_with(LESS_EXT))
    }

    pub fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let field = FieldPath::new("bundles");

        if self.is_empty() {
            diag.error_with_hint(
                field,
                "no bundles configured",
                "add a [bundles.css] or [bundles.js] table",
            );
        }

        for (kind, bundles) in &self.0 {
            if let Err(e) = kind.parse::<AssetType>() {
                diag.error(field, format!("[bundles.{kind}] {e}"));
                continue;
            }
            for (name, files) in bundles {
                if name.is_empty() || name.contains(['/', '\\']) {
                    diag.error(
                        field,
                        format!("[bundles.{kind}] invalid bundle name `{name}`"),
                    );
                }
                if files.is_empty() {
                    diag.error(field, format!("[bundles.{kind}] `{name}` lists no files"));
                }
                if files.iter().any(|f| f.trim().is_empty()) {
                    diag.error(field, format!("[bundles.{kind}] `{name}` has an empty file entry"));
                }
            }
        }
    }
}
