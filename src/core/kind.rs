//! Asset type and bundle identity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of bundle output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Css,
    Js,
}

impl AssetType {
    /// All asset types, in build order.
    pub const ALL: [Self; 2] = [Self::Css, Self::Js];

    /// Lowercase name, also used as the output subdirectory and file extension.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::Js => "js",
        }
    }

    pub const fn ext(self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "css" => Ok(Self::Css),
            "js" => Ok(Self::Js),
            other => Err(format!("unknown asset type `{other}` (expected `css` or `js`)")),
        }
    }
}

/// Identity of one bundle: `(asset type, name)`.
///
/// Displays as `"{type}:{name}"`, the key used in the bundle hash table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BundleKey {
    pub kind: AssetType,
    pub name: String,
}

impl BundleKey {
    pub fn new(kind: AssetType, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

impl fmt::Display for BundleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.name)
    }
}
