//! LESS preprocessing through an external compiler.

use anyhow::Result;
use std::path::{Path, PathBuf};

use super::Preprocessor;
use crate::utils::exec::Cmd;

/// CSS sibling a `.less` source compiles to: `site.less` → `site.less.css`.
pub fn less_output(source: &Path) -> PathBuf {
    let mut output = source.as_os_str().to_owned();
    output.push(".css");
    output.into()
}

/// `<less...> <in.less> <in.less.css>`
pub struct LessCompiler {
    argv: Vec<String>,
    cwd: PathBuf,
}

impl LessCompiler {
    pub fn new(argv: Vec<String>, cwd: &Path) -> Self {
        Self {
            argv,
            cwd: cwd.to_path_buf(),
        }
    }
}

impl Preprocessor for LessCompiler {
    fn name(&self) -> &str {
        "LESS"
    }

    fn compile(&self, source: &Path, output: &Path) -> Result<()> {
        Cmd::from_slice(&self.argv)
            .arg(source)
            .arg(output)
            .cwd(&self.cwd)
            .run()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_less_output_is_sibling() {
        assert_eq!(
            less_output(Path::new("/s/css/site.less")),
            PathBuf::from("/s/css/site.less.css")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_compile_runs_command() {
        let dir = tempfile::TempDir::new().unwrap();
        let source = dir.path().join("a.less");
        std::fs::write(&source, "@c: red;").unwrap();
        let output = less_output(&source);

        // `cp in out` stands in for lessc
        let less = LessCompiler::new(vec!["cp".into()], dir.path());
        less.compile(&source, &output).unwrap();
        assert_eq!(std::fs::read_to_string(output).unwrap(), "@c: red;");
    }

    #[cfg(unix)]
    #[test]
    fn test_compile_failure_is_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let less = LessCompiler::new(vec!["false".into()], dir.path());
        assert!(less.compile(Path::new("a.less"), Path::new("a.less.css")).is_err());
    }
}
