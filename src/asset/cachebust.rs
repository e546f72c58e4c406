//! Image cache busting for CSS bundles.
//!
//! Grammar: every `url(<ref>)` where `<ref>` is the shortest run of
//! non-`)` characters. For each match:
//!
//! 1. surrounding whitespace and quotes (`"` / `'`) are stripped from `<ref>`
//! 2. `data:` and `http` references are left untouched (whole match kept)
//! 3. an existing `?query` is dropped
//! 4. the reference is resolved against the bundle file's directory
//!    (a leading `/` resolves against the static root instead)
//! 5. the match becomes `url(<ref>?<fingerprint>)`; an unreadable image
//!    yields `url(<ref>?)`
//!
//! The bundle fingerprint is the fingerprint of the whole rewritten text.

use regex::bytes::{Captures, Regex};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::LazyLock;

use crate::freshness::FileHasher;
use crate::utils::hash;
use crate::utils::path::{normalize_lexical, resolve_static};

// Byte-oriented so bundles that are not valid UTF-8 still get rewritten.
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u)url\(([^)]*?)\)").unwrap());

/// Result of rewriting one CSS payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheBust {
    pub css: Vec<u8>,
    /// Fingerprint of `css`.
    pub hash: String,
    /// References whose image could not be fingerprinted.
    pub unresolved: usize,
}

/// Rewrites `url(...)` references using a run's fingerprint cache.
pub struct CacheBuster<'a> {
    hasher: &'a FileHasher,
    static_root: &'a Path,
}

impl<'a> CacheBuster<'a> {
    pub fn new(hasher: &'a FileHasher, static_root: &'a Path) -> Self {
        Self {
            hasher,
            static_root,
        }
    }

    /// Rewrite `css`, resolving relative references against `bundle_file`'s directory.
    pub fn rewrite(&self, css: &[u8], bundle_file: &Path) -> CacheBust {
        let base = bundle_file.parent().unwrap_or(Path::new(""));
        let mut unresolved = 0;

        let rewritten = URL_RE.replace_all(css, |caps: &Captures<'_>| {
            let reference = strip_quotes(caps[1].trim_ascii());
            if is_remote(reference) {
                return caps[0].to_vec();
            }

            let reference = reference
                .split(|&b| b == b'?')
                .next()
                .unwrap_or_default();
            // Non-UTF-8 names resolve to a path that does not exist and count as unresolved.
            let name = String::from_utf8_lossy(reference);
            let image = if name.starts_with('/') {
                resolve_static(self.static_root, &name)
            } else {
                base.join(name.as_ref())
            };

            let fp = self.hasher.fingerprint(&normalize_lexical(&image));
            if fp.is_empty() {
                unresolved += 1;
            }

            let mut out = Vec::with_capacity(reference.len() + fp.len() + 6);
            out.extend_from_slice(b"url(");
            out.extend_from_slice(reference);
            out.push(b'?');
            out.extend_from_slice(fp.as_bytes());
            out.push(b')');
            out
        });

        let css = rewritten.into_owned();
        CacheBust {
            hash: hash::fingerprint(&css),
            css,
            unresolved,
        }
    }

    /// Rewrite a file in place and prime the cache with its new fingerprint.
    pub fn rewrite_file(&self, path: &Path, bundle_file: &Path) -> io::Result<CacheBust> {
        let css = fs::read(path)?;
        let result = self.rewrite(&css, bundle_file);
        fs::write(path, &result.css)?;
        self.hasher.record(path, &result.hash);
        Ok(result)
    }
}

fn strip_quotes(reference: &[u8]) -> &[u8] {
    let start = reference
        .iter()
        .position(|b| !matches!(b, b'"' | b'\''))
        .unwrap_or(reference.len());
    let end = reference
        .iter()
        .rposition(|b| !matches!(b, b'"' | b'\''))
        .map_or(start, |i| i + 1);
    &reference[start..end]
}

/// Inline and remote references are never cache-busted.
fn is_remote(reference: &[u8]) -> bool {
    reference.starts_with(b"data:") || reference.starts_with(b"http")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        root: PathBuf,
        bundle: PathBuf,
    }

    /// `<root>/css/site-all.css` with `<root>/css/img/a.png` and `<root>/img/b.png`.
    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_path_buf();
        fs::create_dir_all(root.join("css/img")).unwrap();
        fs::create_dir_all(root.join("img")).unwrap();
        fs::write(root.join("css/img/a.png"), "image a").unwrap();
        fs::write(root.join("img/b.png"), "image b").unwrap();
        Fixture {
            bundle: root.join("css/site-all.css"),
            root,
            _dir: dir,
        }
    }

    #[test]
    fn test_relative_reference_gets_fingerprint() {
        let fx = fixture();
        let hasher = FileHasher::new();
        let out = CacheBuster::new(&hasher, &fx.root).rewrite(b"a{background:url(img/a.png)}", &fx.bundle);

        let fp = hash::fingerprint("image a");
        assert_eq!(out.css, format!("a{{background:url(img/a.png?{fp})}}").into_bytes());
        assert_eq!(out.unresolved, 0);
    }

    #[test]
    fn test_remote_and_inline_untouched() {
        let fx = fixture();
        let hasher = FileHasher::new();
        let css = "a{b:url(data:image/png;base64,xxx)}c{d:url(http://cdn/x.png)}e{f:url('https://cdn/y.png')}";
        let out = CacheBuster::new(&hasher, &fx.root).rewrite(css.as_bytes(), &fx.bundle);

        assert_eq!(out.css, css.as_bytes());
        assert!(hasher.is_empty());
    }

    #[test]
    fn test_quotes_and_query_stripped() {
        let fx = fixture();
        let hasher = FileHasher::new();
        let out = CacheBuster::new(&hasher, &fx.root)
            .rewrite(br#"a{b:url('img/a.png?old=1')} c{d:url( "img/a.png" )}"#, &fx.bundle);

        let fp = hash::fingerprint("image a");
        assert_eq!(
            out.css,
            format!("a{{b:url(img/a.png?{fp})}} c{{d:url(img/a.png?{fp})}}").into_bytes()
        );
    }

    #[test]
    fn test_parent_and_root_relative_references() {
        let fx = fixture();
        let hasher = FileHasher::new();
        let out = CacheBuster::new(&hasher, &fx.root)
            .rewrite(b"a{b:url(../img/b.png)} c{d:url(/img/b.png)}", &fx.bundle);

        let fp = hash::fingerprint("image b");
        assert_eq!(
            out.css,
            format!("a{{b:url(../img/b.png?{fp})}} c{{d:url(/img/b.png?{fp})}}").into_bytes()
        );
        // both spellings resolve to the same cached file
        assert_eq!(hasher.len(), 1);
    }

    #[test]
    fn test_missing_image_degrades() {
        let fx = fixture();
        let hasher = FileHasher::new();
        let out = CacheBuster::new(&hasher, &fx.root).rewrite(b"a{b:url(img/nope.png)}", &fx.bundle);

        assert_eq!(out.css, b"a{b:url(img/nope.png?)}");
        assert_eq!(out.unresolved, 1);
        assert_eq!(hasher.missing_count(), 1);
    }

    #[test]
    fn test_bundle_hash_covers_rewritten_text() {
        let fx = fixture();
        let hasher = FileHasher::new();
        let out = CacheBuster::new(&hasher, &fx.root).rewrite(b"a{b:url(img/a.png)}", &fx.bundle);

        assert_eq!(out.hash, hash::fingerprint(&out.css));
        assert_eq!(out.hash.len(), hash::FINGERPRINT_LEN);
    }

    #[test]
    fn test_rewrite_file_in_place_primes_cache() {
        let fx = fixture();
        let tmp = fx.root.join("css/site-all.css.tmp");
        fs::write(&tmp, "a{b:url(img/a.png)}").unwrap();

        let hasher = FileHasher::new();
        let out = CacheBuster::new(&hasher, &fx.root)
            .rewrite_file(&tmp, &fx.bundle)
            .unwrap();

        assert_eq!(fs::read(&tmp).unwrap(), out.css);
        assert_eq!(hasher.fingerprint(&tmp), out.hash);
        assert_eq!(hash::fingerprint(&fs::read(&tmp).unwrap()), out.hash);
    }

    #[test]
    fn test_rewrite_file_accepts_non_utf8_bundle() {
        let fx = fixture();
        let tmp = fx.root.join("css/site-all.css.tmp");
        fs::write(&tmp, b"/* caf\xe9 */ a{b:url(img/a.png)}\n").unwrap();

        let hasher = FileHasher::new();
        let out = CacheBuster::new(&hasher, &fx.root)
            .rewrite_file(&tmp, &fx.bundle)
            .unwrap();

        let fp = hash::fingerprint("image a");
        let mut expected = b"/* caf\xe9 */ a{b:url(img/a.png?".to_vec();
        expected.extend_from_slice(fp.as_bytes());
        expected.extend_from_slice(b")}\n");
        assert_eq!(out.css, expected);
        assert_eq!(fs::read(&tmp).unwrap(), expected);
        assert_eq!(out.hash, hash::fingerprint(&expected));
        assert_eq!(out.unresolved, 0);
    }
}
