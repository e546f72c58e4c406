//! Recording stand-ins for external tools.

use anyhow::{Result, bail};
use std::fs;
use std::path::Path;

use super::{Minifier, Preprocessor, ToolSet};
use crate::core::AssetType;

/// Writes `min(<input>)` to the output.
#[derive(Default)]
pub struct FakeMinifier {
    pub fail: bool,
}

impl Minifier for FakeMinifier {
    fn name(&self) -> &str {
        "fake"
    }

    fn minify(&self, _kind: AssetType, input: &Path, output: &Path) -> Result<()> {
        if self.fail {
            bail!("fake minifier exited with status 1");
        }
        let content = fs::read_to_string(input)?;
        fs::write(output, format!("min({content})"))?;
        Ok(())
    }
}

/// Copies the source verbatim, or fails without writing anything.
#[derive(Default)]
pub struct FakePreprocessor {
    pub fail: bool,
}

impl Preprocessor for FakePreprocessor {
    fn name(&self) -> &str {
        "fakeless"
    }

    fn compile(&self, source: &Path, output: &Path) -> Result<()> {
        if self.fail {
            bail!("fakeless: parse error in {}", source.display());
        }
        fs::copy(source, output)?;
        Ok(())
    }
}

/// Fake minifiers for both types plus a working preprocessor.
pub fn fake_tools() -> ToolSet {
    ToolSet::new(
        Some(Box::new(FakePreprocessor::default())),
        Box::new(FakeMinifier::default()),
        Box::new(FakeMinifier::default()),
    )
}
