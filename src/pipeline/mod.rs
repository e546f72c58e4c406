//! Build run orchestration.
//!
//! ```text
//! ProjectConfig ──► BuildRun ──► build_bundle (per bundle, rayon) ──► BuildReport
//!                      │                 │
//!                      │                 └─ FileHasher / BundleHashTable (shared)
//!                      └──► BuildManifest (after every bundle)
//! ```
//!
//! All run-scoped state lives in [`BuildRun`]: a new run starts with an
//! empty fingerprint cache and an empty hash table.

use anyhow::Result;
use rayon::prelude::*;
use rustc_hash::FxHashSet;

use crate::asset::{BuildContext, BundleHashTable, build_bundle};
use crate::config::{BundleConfig, ProjectConfig};
use crate::core::{AssetType, BuildReport, BundleOutcome, BundleReport};
use crate::freshness::FileHasher;
use crate::generator::{BuildManifest, carried_over_hashes};
use crate::logger::ProgressLine;
use crate::tools::ToolSet;
use crate::log;

/// Run mode selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Rebuild every bundle, then write the manifest.
    #[default]
    Full,
    /// Only rewrite the manifest.
    UpdateOnly,
}

/// State owned by one build invocation.
pub struct BuildRun<'a> {
    config: &'a ProjectConfig,
    tools: &'a ToolSet,
    hasher: FileHasher,
    hashes: BundleHashTable,
    progress: bool,
}

impl<'a> BuildRun<'a> {
    pub fn new(config: &'a ProjectConfig, tools: &'a ToolSet) -> Self {
        Self {
            config,
            tools,
            hasher: FileHasher::new(),
            hashes: BundleHashTable::new(),
            progress: false,
        }
    }

    /// Show a `css(n/N) js(n/N)` line while bundles build.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Build every configured bundle. Reports come back in configuration
    /// order whatever order the workers finished in.
    pub fn build_bundles(&self) -> BuildReport {
        let bundles = self.config.bundles.bundles();
        let progress = self.progress.then(|| {
            let count = |kind| bundles.iter().filter(|b| b.kind() == kind).count();
            ProgressLine::new(&[("css", count(AssetType::Css)), ("js", count(AssetType::Js))])
        });

        let cx = BuildContext {
            config: self.config,
            tools: self.tools,
            hasher: &self.hasher,
            hashes: &self.hashes,
        };
        let build = |bundle: &BundleConfig| -> BundleReport {
            let report = build_bundle(bundle, &cx);
            if let Some(progress) = &progress {
                progress.inc(bundle.kind().as_str());
            }
            report
        };

        let reports: Vec<_> = if self.config.build.parallel {
            bundles.par_iter().map(build).collect()
        } else {
            bundles.iter().map(build).collect()
        };

        if let Some(progress) = progress {
            progress.finish();
        }

        BuildReport {
            bundles: reports,
            missing_files: self.hasher.missing_count(),
        }
    }

    /// Compute and write the manifest from this run's hash table.
    pub fn write_manifest(&self) -> Result<BuildManifest> {
        let manifest = BuildManifest::compute(self.config, self.hashes.snapshot());
        manifest.write(&self.config.paths.manifest)?;
        log!(
            "manifest";
            "{}",
            self.config.root_relative(&self.config.paths.manifest).display()
        );
        Ok(manifest)
    }

    /// Bundles that failed this run keep the previous manifest's hash: their
    /// last finalized output is still on disk.
    fn carry_over_failed(&self, report: &BuildReport) {
        let failed: FxHashSet<String> = report
            .bundles
            .iter()
            .filter(|b| matches!(b.outcome, BundleOutcome::Failed(_)))
            .map(|b| b.key.to_string())
            .collect();
        if failed.is_empty() {
            return;
        }

        self.hashes.extend_missing(
            carried_over_hashes(self.config)
                .into_iter()
                .filter(|(key, _)| failed.contains(key)),
        );
    }

    /// Execute the run: bundles (unless update-only), then the manifest.
    pub fn execute(self, mode: RunMode) -> Result<BuildReport> {
        let report = match mode {
            RunMode::Full => {
                let report = self.build_bundles();
                self.carry_over_failed(&report);
                report
            }
            RunMode::UpdateOnly => {
                // nothing was rewritten, keep the previous cache keys
                self.hashes.extend_missing(carried_over_hashes(self.config));
                BuildReport::default()
            }
        };

        self.write_manifest()?;
        Ok(report)
    }

    pub fn hashes(&self) -> &BundleHashTable {
        &self.hashes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use crate::tools::fake::{FakeMinifier, fake_tools};
    use crate::utils::hash;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn project(dir: &TempDir, src: &str) -> ProjectConfig {
        fs::create_dir_all(dir.path().join("static/img")).unwrap();
        test_parse_config(dir.path(), src)
    }

    const TWO_BUNDLES: &str = r#"
        [build]
        cachebust_images = true

        [bundles.css]
        main = ["css/a.css", "css/b.css"]

        [bundles.js]
        app = ["js/a.js"]
    "#;

    fn two_bundles(dir: &TempDir) -> ProjectConfig {
        let config = project(dir, TWO_BUNDLES);
        let root = config.static_root().to_path_buf();
        write(&root, "css/a.css", "A");
        write(&root, "css/b.css", "B");
        write(&root, "js/a.js", "var a;");
        config
    }

    #[test]
    fn test_second_run_skips_unchanged() {
        let dir = TempDir::new().unwrap();
        let config = two_bundles(&dir);
        let tools = fake_tools();

        let first = BuildRun::new(&config, &tools).execute(RunMode::Full).unwrap();
        assert_eq!(first.built(), 2);
        assert_eq!(
            fs::read_to_string(config.static_root().join("css/main-all.css")).unwrap(),
            "AB"
        );

        let second = BuildRun::new(&config, &tools).execute(RunMode::Full).unwrap();
        assert_eq!(second.built(), 0);
        assert_eq!(second.skipped(), 2);
    }

    #[test]
    fn test_cachebust_hash_table_single_entry() {
        let dir = TempDir::new().unwrap();
        let config = two_bundles(&dir);
        write(config.static_root(), "css/img/x.png", "png");
        write(config.static_root(), "css/b.css", "b{c:url(img/x.png)}");
        let tools = fake_tools();

        let run = BuildRun::new(&config, &tools);
        run.build_bundles();
        let snapshot = run.hashes().snapshot();

        let final_css = fs::read_to_string(config.static_root().join("css/main-all.css")).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot["css:main"], hash::fingerprint(&final_css));
        assert_eq!(snapshot["css:main"].len(), 7);
    }

    #[test]
    fn test_missing_source_does_not_stop_others() {
        let dir = TempDir::new().unwrap();
        let config = project(
            &dir,
            r#"
            [bundles.css]
            broken = ["css/gone.css"]
            main = ["css/a.css"]

            [bundles.js]
            app = ["js/a.js"]
            "#,
        );
        write(config.static_root(), "css/a.css", "A");
        write(config.static_root(), "js/a.js", "var a;");
        let tools = fake_tools();

        let report = BuildRun::new(&config, &tools).execute(RunMode::Full).unwrap();
        assert_eq!(report.failed(), 1);
        assert_eq!(report.built(), 2);
        assert!(report.total_missing() >= 1);
        assert!(!report.has_tool_failures());
        assert!(config.paths.manifest.exists());
    }

    #[test]
    fn test_reports_in_configuration_order() {
        let dir = TempDir::new().unwrap();
        let config = two_bundles(&dir);
        let tools = fake_tools();

        let report = BuildRun::new(&config, &tools).build_bundles();
        let keys: Vec<_> = report.bundles.iter().map(|b| b.key.to_string()).collect();
        assert_eq!(keys, ["css:main", "js:app"]);
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let dir = TempDir::new().unwrap();
        let mut config = two_bundles(&dir);
        let tools = fake_tools();

        let parallel = BuildRun::new(&config, &tools).execute(RunMode::Full).unwrap();
        let concat = fs::read_to_string(config.static_root().join("css/main-all.css")).unwrap();

        config.build.parallel = false;
        fs::remove_file(config.static_root().join("css/main-all.css")).unwrap();
        let sequential = BuildRun::new(&config, &tools).execute(RunMode::Full).unwrap();

        assert_eq!(parallel.built(), 2);
        assert_eq!(sequential.built(), 1);
        assert_eq!(
            fs::read_to_string(config.static_root().join("css/main-all.css")).unwrap(),
            concat
        );
    }

    #[test]
    fn test_idempotent_artifacts_and_manifest() {
        let dir = TempDir::new().unwrap();
        let config = two_bundles(&dir);
        write(config.static_root(), "img/logo.png", "png");
        let tools = fake_tools();

        BuildRun::new(&config, &tools).execute(RunMode::Full).unwrap();
        let manifest = fs::read_to_string(&config.paths.manifest).unwrap();
        let concat = fs::read(config.static_root().join("css/main-all.css")).unwrap();

        BuildRun::new(&config, &tools).execute(RunMode::Full).unwrap();
        assert_eq!(fs::read_to_string(&config.paths.manifest).unwrap(), manifest);
        assert_eq!(fs::read(config.static_root().join("css/main-all.css")).unwrap(), concat);
    }

    #[test]
    fn test_tool_failure_surfaces_in_report() {
        let dir = TempDir::new().unwrap();
        let config = two_bundles(&dir);
        let tools = ToolSet::new(
            None,
            Box::new(FakeMinifier::default()),
            Box::new(FakeMinifier { fail: true }),
        );

        let report = BuildRun::new(&config, &tools).execute(RunMode::Full).unwrap();
        assert!(report.has_tool_failures());
        assert_eq!(report.tool_failures().count(), 1);
        assert!(matches!(
            report.get(&crate::core::BundleKey::new(AssetType::Css, "main")).unwrap().outcome,
            BundleOutcome::Built
        ));
    }

    #[test]
    fn test_update_only_keeps_bundle_hashes() {
        let dir = TempDir::new().unwrap();
        let config = two_bundles(&dir);
        let tools = fake_tools();

        let full = BuildRun::new(&config, &tools);
        full.build_bundles();
        let written = full.write_manifest().unwrap();
        assert_eq!(written.bundle_hashes.len(), 1);

        write(config.static_root(), "js/a.js", "var changed;");
        let report = BuildRun::new(&config, &tools)
            .execute(RunMode::UpdateOnly)
            .unwrap();
        assert!(report.bundles.is_empty());

        let updated = BuildManifest::load(&config.paths.manifest).unwrap();
        assert_eq!(updated.bundle_hashes, written.bundle_hashes);
        assert_eq!(updated.css, written.css);
        assert_ne!(updated.js, written.js);
        // bundles were not rebuilt
        assert_eq!(
            fs::read_to_string(config.static_root().join("js/app-all.js")).unwrap(),
            "var a;"
        );
    }

    #[test]
    fn test_failed_bundle_keeps_previous_hash() {
        let dir = TempDir::new().unwrap();
        let config = two_bundles(&dir);
        write(config.static_root(), "css/img/x.png", "png");
        write(config.static_root(), "css/b.css", "b{c:url(img/x.png)}");
        let tools = fake_tools();

        BuildRun::new(&config, &tools).execute(RunMode::Full).unwrap();
        let first = BuildManifest::load(&config.paths.manifest).unwrap();
        let previous = first.bundle_hashes["css:main"].clone();

        fs::remove_file(config.static_root().join("css/a.css")).unwrap();
        let report = BuildRun::new(&config, &tools).execute(RunMode::Full).unwrap();
        assert_eq!(report.failed(), 1);

        let second = BuildManifest::load(&config.paths.manifest).unwrap();
        assert_eq!(second.bundle_hashes["css:main"], previous);
        assert_eq!(second.bundle_hashes.len(), 1);
    }
}
