//! Build artifacts generated after every bundle has been processed.

mod manifest;

pub use manifest::{BuildManifest, carried_over_hashes};
