//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Incremental CSS/JS bundle builder
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: bundlekit.toml)
    #[arg(short = 'C', long, default_value = "bundlekit.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Show per-file diagnostics and external command lines
    #[arg(short = 'V', long)]
    pub verbose: bool,

    /// Only rewrite the build id manifest, skip rebuilding bundles
    #[arg(short, long)]
    pub update_only: bool,
}

impl Cli {
    pub const fn mode(&self) -> crate::pipeline::RunMode {
        if self.update_only {
            crate::pipeline::RunMode::UpdateOnly
        } else {
            crate::pipeline::RunMode::Full
        }
    }
}
