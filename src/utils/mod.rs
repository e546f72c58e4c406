//! Shared helpers: process execution, hashing, paths, pluralization.

pub mod exec;
pub mod hash;
pub mod path;
mod plural;

pub use plural::plural_count;
