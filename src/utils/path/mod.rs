//! Path utilities.
//!
//! Pure functions for path manipulation. No side effects beyond
//! `canonicalize` in [`normalize_path`].

pub mod fs;

pub use fs::{normalize_lexical, normalize_path, resolve_static};
