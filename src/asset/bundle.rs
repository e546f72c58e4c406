//! Per-bundle build state machine.
//!
//! ```text
//! Preprocess → Concatenate(tmp) → [CacheBust] → ChangeCheck → Finalize → Minify | Skip
//! ```
//!
//! Finalization (old concatenation removed, tmp renamed over it) happens
//! whether or not the content changed, so `<name>-all.<ext>` is always
//! current. Only the minifier is skipped for unchanged bundles.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::cachebust::CacheBuster;
use super::change::has_changed;
use super::concat::concat_files;
use super::hashes::BundleHashTable;
use super::route::BundleRoute;
use crate::config::section::LESS_EXT;
use crate::config::{BundleConfig, ProjectConfig};
use crate::core::{AssetType, BundleError, BundleOutcome, BundleReport, ToolFailure};
use crate::freshness::FileHasher;
use crate::tools::{ToolSet, less_output};
use crate::utils::path::resolve_static;
use crate::utils::plural_count;
use crate::{debug, log};

/// Run-scoped state every bundle reads from or appends to.
pub struct BuildContext<'a> {
    pub config: &'a ProjectConfig,
    pub tools: &'a ToolSet,
    pub hasher: &'a FileHasher,
    pub hashes: &'a BundleHashTable,
}

/// Build one bundle. Never panics or propagates: every failure is folded
/// into the returned report.
pub fn build_bundle(bundle: &BundleConfig, cx: &BuildContext<'_>) -> BundleReport {
    let mut report = BundleReport::new(bundle.key.clone(), BundleOutcome::Skipped);
    let route = BundleRoute::new(cx.config.static_root(), &bundle.key);

    if let Err(err) = run(bundle, cx, &route, &mut report) {
        log!("error"; "{}: {}", bundle.key, err);
        let _ = fs::remove_file(&route.tmp);
        report.outcome = BundleOutcome::Failed(err);
    }
    report
}

fn run(
    bundle: &BundleConfig,
    cx: &BuildContext<'_>,
    route: &BundleRoute,
    report: &mut BundleReport,
) -> Result<(), BundleError> {
    let sources = preprocess(bundle, cx, &mut report.tool_failures);

    fs::create_dir_all(route.dir()).map_err(|e| BundleError::from_io(route.dir(), e))?;
    concat_files(&sources, &route.tmp)?;

    if bundle.kind() == AssetType::Css && cx.config.build.cachebust_images {
        cachebust(bundle, cx, route, report)?;
    }

    let changed = has_changed(&route.concatted, &route.tmp, cx.hasher);
    finalize(route)?;

    if changed {
        minify(bundle, cx, route, report);
        report.outcome = BundleOutcome::Built;
    } else {
        debug!(
            "minify";
            "File unchanged, skipping minification of {}",
            display(cx.config, &route.concatted)
        );
        report.outcome = BundleOutcome::Skipped;
    }
    Ok(())
}

/// Resolve sources, compiling `.less` files to their CSS siblings.
///
/// A failed compile is recorded and the sibling is still concatenated,
/// whatever the compiler left behind.
fn preprocess(
    bundle: &BundleConfig,
    cx: &BuildContext<'_>,
    failures: &mut Vec<ToolFailure>,
) -> Vec<PathBuf> {
    let static_root = cx.config.static_root();

    bundle
        .files
        .iter()
        .map(|file| {
            let source = resolve_static(static_root, file);
            if !file.ends_with(LESS_EXT) {
                return source;
            }

            let output = less_output(&source);
            if let Some(less) = cx.tools.preprocessor() {
                debug!("less"; "{} -> {}", file, output.display());
                if let Err(e) = less.compile(&source, &output) {
                    log!("error"; "{}: {:#}", less.name(), e);
                    failures.push(ToolFailure {
                        tool: less.name().to_owned(),
                        file: source.clone(),
                        message: format!("{e:#}"),
                    });
                }
            }
            output
        })
        .collect()
}

fn cachebust(
    bundle: &BundleConfig,
    cx: &BuildContext<'_>,
    route: &BundleRoute,
    report: &mut BundleReport,
) -> Result<(), BundleError> {
    debug!(
        "cachebust";
        "Cache busting images in {}",
        display(cx.config, &route.concatted)
    );

    let buster = CacheBuster::new(cx.hasher, cx.config.static_root());
    let result = buster
        .rewrite_file(&route.tmp, &route.concatted)
        .map_err(|e| BundleError::from_io(&route.tmp, e))?;

    if result.unresolved > 0 && !crate::logger::is_verbose() {
        log!(
            "cachebust";
            " - error finding {} (-V for info)",
            plural_count(result.unresolved, "image")
        );
    }

    cx.hashes.insert(&bundle.key, &result.hash);
    report.unresolved_images = result.unresolved;
    report.hash = Some(result.hash);
    Ok(())
}

/// Replace the previous concatenation with the temp artifact.
fn finalize(route: &BundleRoute) -> Result<(), BundleError> {
    match fs::remove_file(&route.concatted) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => {
            return Err(BundleError::from_io(&route.concatted, e));
        }
        _ => {}
    }
    fs::rename(&route.tmp, &route.concatted).map_err(|e| BundleError::from_io(&route.tmp, e))
}

fn minify(bundle: &BundleConfig, cx: &BuildContext<'_>, route: &BundleRoute, report: &mut BundleReport) {
    let minifier = cx.tools.minifier_for(bundle.kind());
    log!(
        "minify";
        "Minifying {} (using {})",
        display(cx.config, &route.compressed),
        minifier.name()
    );

    if let Err(e) = minifier.minify(bundle.kind(), &route.concatted, &route.compressed) {
        log!("error"; "{}: {:#}", minifier.name(), e);
        report.tool_failures.push(ToolFailure {
            tool: minifier.name().to_owned(),
            file: route.compressed.clone(),
            message: format!("{e:#}"),
        });
    }
}

fn display(config: &ProjectConfig, path: &Path) -> String {
    config.root_relative(path).display().to_string()
}
