//! Minifiers running as external processes.

use anyhow::Result;
use std::path::{Path, PathBuf};

use super::Minifier;
use crate::core::AssetType;
use crate::utils::exec::{Cmd, JAVA_FILTER};

fn verbose_flag(verbose: bool) -> &'static str {
    if verbose { "-v" } else { "" }
}

/// `<uglify...> -o <out> <in>`
pub struct Uglify {
    argv: Vec<String>,
    cwd: PathBuf,
    verbose: bool,
}

impl Uglify {
    pub fn new(argv: Vec<String>, cwd: &Path, verbose: bool) -> Self {
        Self {
            argv,
            cwd: cwd.to_path_buf(),
            verbose,
        }
    }
}

impl Minifier for Uglify {
    fn name(&self) -> &str {
        "UglifyJS"
    }

    fn minify(&self, _kind: AssetType, input: &Path, output: &Path) -> Result<()> {
        Cmd::from_slice(&self.argv)
            .arg(verbose_flag(self.verbose))
            .arg("-o")
            .arg(output)
            .arg(input)
            .cwd(&self.cwd)
            .run()?;
        Ok(())
    }
}

/// `<cleancss...> -o <out> <in>`
pub struct CleanCss {
    argv: Vec<String>,
    cwd: PathBuf,
}

impl CleanCss {
    pub fn new(argv: Vec<String>, cwd: &Path) -> Self {
        Self {
            argv,
            cwd: cwd.to_path_buf(),
        }
    }
}

impl Minifier for CleanCss {
    fn name(&self) -> &str {
        "clean-css"
    }

    fn minify(&self, _kind: AssetType, input: &Path, output: &Path) -> Result<()> {
        Cmd::from_slice(&self.argv)
            .arg("-o")
            .arg(output)
            .arg(input)
            .cwd(&self.cwd)
            .run()?;
        Ok(())
    }
}

/// `<java...> -jar <jar> [-v] <in> -o <out>`
///
/// YUI picks the syntax from the input extension.
pub struct YuiCompressor {
    java: Vec<String>,
    jar: PathBuf,
    cwd: PathBuf,
    verbose: bool,
}

impl YuiCompressor {
    pub fn new(java: Vec<String>, jar: &Path, cwd: &Path, verbose: bool) -> Self {
        Self {
            java,
            jar: jar.to_path_buf(),
            cwd: cwd.to_path_buf(),
            verbose,
        }
    }
}

impl Minifier for YuiCompressor {
    fn name(&self) -> &str {
        "YUI Compressor"
    }

    fn minify(&self, _kind: AssetType, input: &Path, output: &Path) -> Result<()> {
        Cmd::from_slice(&self.java)
            .arg("-jar")
            .arg(&self.jar)
            .arg(verbose_flag(self.verbose))
            .arg(input)
            .arg("-o")
            .arg(output)
            .cwd(&self.cwd)
            .filter(&JAVA_FILTER)
            .run()?;
        Ok(())
    }
}
