//! bundlekit - incremental CSS/JS bundle builder.

mod asset;
mod cli;
mod config;
mod core;
mod freshness;
mod generator;
mod logger;
mod pipeline;
mod tools;
mod utils;

use anyhow::{Result, bail};
use clap::{ColorChoice, Parser};
use cli::{Cli, build::run_build};
use config::ProjectConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = ProjectConfig::load(&cli)?;
    let report = run_build(&config, cli.mode())?;

    if report.has_tool_failures() {
        bail!("one or more minify commands exited with a non-zero status. See output above for errors.");
    }
    Ok(())
}
