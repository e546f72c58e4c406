//! Core types - pure abstractions shared across the codebase.

mod kind;
mod outcome;

pub use kind::{AssetType, BundleKey};
pub use outcome::{BuildReport, BundleError, BundleOutcome, BundleReport, ToolFailure};
