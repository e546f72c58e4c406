//! Configuration section definitions.
//!
//! Each module corresponds to a section in `bundlekit.toml`:
//!
//! | Module    | TOML Section   | Purpose                                   |
//! |-----------|----------------|-------------------------------------------|
//! | `paths`   | `[paths]`      | Static root, manifest, image directory    |
//! | `build`   | `[build]`      | Cache busting, parallelism                |
//! | `tools`   | `[tools]`      | LESS compiler and minifier backends       |
//! | `bundles` | `[bundles.*]`  | Bundle name → ordered source files        |

mod build;
mod bundles;
mod paths;
mod tools;

pub use build::BuildConfig;
pub use bundles::{BundleConfig, BundlesConfig, LESS_EXT};
pub use paths::PathsConfig;
pub use tools::{CommandSpec, ToolsConfig};
