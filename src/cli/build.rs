//! `bundlekit` build command.
//!
//! Phases:
//! - **Tools** - select minifier backends, warn about missing programs
//! - **Bundles** - build every bundle (skipped with `--update-only`)
//! - **Manifest** - write build ids and bundle hashes
//! - **Summary** - counts, missing files, hints

use anyhow::Result;

use crate::config::ProjectConfig;
use crate::core::BuildReport;
use crate::log;
use crate::pipeline::{BuildRun, RunMode};
use crate::tools::ToolSet;
use crate::utils::plural_count;

/// Run one build and print its summary.
///
/// Tool failures are left in the report for the caller to turn into an
/// exit status; only configuration and manifest errors are returned here.
pub fn run_build(config: &ProjectConfig, mode: RunMode) -> Result<BuildReport> {
    let tools = ToolSet::from_config(config);

    if mode == RunMode::Full {
        log!(
            "build";
            "building {}",
            plural_count(config.bundles.len(), "bundle")
        );
    }

    let report = BuildRun::new(config, &tools)
        .with_progress(!config.verbose)
        .execute(mode)?;

    if mode == RunMode::Full {
        log_summary(&report);
    }
    if !config.build.cachebust_images {
        log!("cachebust"; "set build.cachebust_images = true to enable image cache busting");
    }

    Ok(report)
}

fn log_summary(report: &BuildReport) {
    log!(
        "build";
        "{} built, {} skipped, {} failed",
        report.built(),
        report.skipped(),
        report.failed()
    );

    if report.skipped() > 0 && !crate::logger::is_verbose() {
        log!(
            "minify";
            "{} skipped minification (-V for info)",
            plural_count(report.skipped(), "unchanged bundle")
        );
    }

    let missing = report.total_missing();
    if missing > 0 {
        log!("warning"; "{}", plural_count(missing, "missing file"));
    }
}
