//! Aggregate build checksums over files and directory trees.
//!
//! Every file contributes `"blob {size}\0"` followed by its bytes to one
//! cumulative blake3 hasher. Inputs are normalized and sorted, and each
//! directory is walked into a sorted file list, so the digest only depends
//! on relative structure and content, never on filesystem iteration order.

use jwalk::WalkDir;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::log;
use crate::utils::path::normalize_lexical;

/// Read size when streaming file contents into the hasher.
const CHUNK_SIZE: usize = 4096;

/// A 256-bit build checksum (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BuildChecksum([u8; 32]);

impl BuildChecksum {
    /// Lowercase hex, 64 characters.
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for BuildChecksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Checksum a set of files and/or directories.
///
/// Paths that do not exist are skipped with a warning. Files listed twice
/// contribute twice.
pub fn checksum_paths<I, P>(paths: I) -> BuildChecksum
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut sorted: Vec<PathBuf> = paths
        .into_iter()
        .map(|p| normalize_lexical(p.as_ref()))
        .collect();
    sorted.sort();

    let mut hasher = blake3::Hasher::new();
    for path in &sorted {
        if path.is_dir() {
            for file in sorted_files(path) {
                feed_file(&mut hasher, &file);
            }
        } else if path.is_file() {
            feed_file(&mut hasher, path);
        } else {
            log!("warning"; "can't checksum `{}`: path doesn't exist", path.display());
        }
    }

    BuildChecksum(*hasher.finalize().as_bytes())
}

/// All regular files below `dir` (hidden files included), sorted.
fn sorted_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<_> = WalkDir::new(dir)
        .skip_hidden(false)
        .into_iter()
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    files
}

fn feed_file(hasher: &mut blake3::Hasher, path: &Path) {
    if let Err(e) = try_feed_file(hasher, path) {
        log!("warning"; "can't checksum `{}`: {}", path.display(), e);
    }
}

fn try_feed_file(hasher: &mut blake3::Hasher, path: &Path) -> io::Result<()> {
    let mut file = File::open(path)?;
    let size = file.metadata()?.len();
    hasher.update(format!("blob {size}\0").as_bytes());

    let mut buffer = [0u8; CHUNK_SIZE];
    loop {
        match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => {
                hasher.update(&buffer[..n]);
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_single_file_matches_blob_format() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.css");
        write(&file, "AB");

        let mut expected = blake3::Hasher::new();
        expected.update(b"blob 2\0");
        expected.update(b"AB");

        assert_eq!(
            checksum_paths([&file]).to_hex(),
            expected.finalize().to_hex().as_str()
        );
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.js");
        let b = dir.path().join("b.js");
        write(&a, "a");
        write(&b, "b");

        assert_eq!(checksum_paths([&a, &b]), checksum_paths([&b, &a]));
    }

    #[test]
    fn test_directory_creation_order_does_not_matter() {
        let one = TempDir::new().unwrap();
        let two = TempDir::new().unwrap();

        for name in ["x/2.png", "a.png", "x/1.png", ".hidden"] {
            write(&one.path().join(name), name);
        }
        for name in [".hidden", "x/1.png", "a.png", "x/2.png"] {
            write(&two.path().join(name), name);
        }

        assert_eq!(checksum_paths([one.path()]), checksum_paths([two.path()]));
    }

    #[test]
    fn test_content_change_changes_checksum() {
        let dir = TempDir::new().unwrap();
        let img = dir.path().join("img");
        write(&img.join("a.png"), "one");
        let before = checksum_paths([&img]);

        write(&img.join("a.png"), "two");
        assert_ne!(before, checksum_paths([&img]));
    }

    #[test]
    fn test_blob_header_separates_files() {
        let dir = TempDir::new().unwrap();
        let joined = dir.path().join("joined/ab");
        write(&joined, "ab");
        let split = dir.path().join("split");
        write(&split.join("a"), "a");
        write(&split.join("b"), "b");

        assert_ne!(checksum_paths([&joined]), checksum_paths([&split]));
    }

    #[test]
    fn test_missing_paths_are_skipped() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.css");
        write(&a, "a");
        let missing = dir.path().join("missing.css");

        assert_eq!(checksum_paths([&a, &missing]), checksum_paths([&a]));
    }

    #[test]
    fn test_unnormalized_paths_hash_the_same() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("css/a.css");
        write(&a, "a");
        let dotted = dir.path().join("css/../css/./a.css");

        assert_eq!(checksum_paths([&a]), checksum_paths([&dotted]));
    }
}
