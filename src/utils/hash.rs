//! Short content fingerprints using blake3.
//!
//! Fingerprints are cache keys, not integrity digests: the first
//! [`FINGERPRINT_LEN`] hex characters of the blake3 digest.
//!
//! # Usage
//!
//! ```ignore
//! use crate::utils::hash;
//!
//! let fp = hash::fingerprint("body { color: red }"); // -> "a1b2c3d"
//! ```

use std::io::{self, Read};

/// Length of a fingerprint in hex characters.
pub const FINGERPRINT_LEN: usize = 7;

/// Compute a short hex fingerprint from byte data.
#[inline]
pub fn fingerprint<T: AsRef<[u8]> + ?Sized>(data: &T) -> String {
    let digest = blake3::hash(data.as_ref());
    truncate(&digest)
}

/// Compute a fingerprint from a reader (streaming, for large files).
pub fn fingerprint_reader(mut reader: impl Read) -> io::Result<String> {
    let mut hasher = blake3::Hasher::new();
    let mut buffer = [0u8; 8192];
    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(truncate(&hasher.finalize()))
}

#[inline]
fn truncate(digest: &blake3::Hash) -> String {
    digest.to_hex()[..FINGERPRINT_LEN].to_string()
}
