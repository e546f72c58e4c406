//! Bundle assembly: concatenation, cache busting, change detection and
//! minifier dispatch for one bundle at a time.
//!
//! # Module Structure
//!
//! ```text
//! asset/
//! ├── route.rs      # bundle key → -all / -min / .tmp paths
//! ├── concat.rs     # ordered byte concatenation into the temp artifact
//! ├── cachebust.rs  # url(...) rewriting with image fingerprints
//! ├── change.rs     # previous vs. candidate comparison
//! ├── hashes.rs     # BundleHashTable
//! └── bundle.rs     # per-bundle state machine
//! ```

mod bundle;
mod cachebust;
mod change;
mod concat;
mod hashes;
mod route;

pub use bundle::{BuildContext, build_bundle};
pub use hashes::BundleHashTable;
