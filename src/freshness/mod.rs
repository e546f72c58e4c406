//! Content hashing: aggregate build checksums and run-scoped fingerprints.
//!
//! The two never share state: [`checksum_paths`] always reads from disk,
//! while [`FileHasher`] memoizes per run.

mod cache;
mod checksum;

pub use cache::FileHasher;
pub use checksum::checksum_paths;
