//! Path normalization utilities.
//!
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `normalize_lexical` - fold `.` and `..` without touching the filesystem
//! - `resolve_static` - resolve a bundle source reference against the static root

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Fold `.` and `..` components purely lexically.
///
/// Unlike [`normalize_path`], this never consults the filesystem, so the
/// result is stable for paths that do not exist yet. Leading `..` on a
/// relative path are preserved.
///
/// # Example
/// ```ignore
/// assert_eq!(normalize_lexical(Path::new("a/./b/../c")), PathBuf::from("a/c"));
/// ```
pub fn normalize_lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Resolve a configured source reference against the static root.
///
/// References are always static-root relative; a leading `/` is ignored
/// (`/css/site.css` and `css/site.css` name the same file).
#[inline]
pub fn resolve_static(static_root: &Path, reference: &str) -> PathBuf {
    static_root.join(reference.trim_start_matches('/'))
}
