//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! cachebust_images = true     # Append ?<fingerprint> to url(...) references in CSS bundles
//! parallel = true             # Build bundles on the rayon thread pool
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Rewrite image URLs in CSS bundles to content-addressed URLs.
    pub cachebust_images: bool,

    /// Process bundles in parallel.
    pub parallel: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            cachebust_images: false,
            parallel: true,
        }
    }
}
