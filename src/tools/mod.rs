//! External capabilities: the LESS preprocessor and the minifier backends.
//!
//! The build core only sees two traits:
//!
//! - [`Preprocessor`]: `compile(in.less, in.less.css)`, best effort
//! - [`Minifier`]: `minify(kind, in, out)`
//!
//! [`ToolSet`] picks one backend per asset type from `[tools]`:
//!
//! | type | priority                                   |
//! |------|--------------------------------------------|
//! | js   | `uglify` → YUI Compressor → built-in (oxc) |
//! | css  | `cleancss` → YUI Compressor → built-in (lightningcss) |

mod builtin;
mod external;
mod less;

#[cfg(test)]
pub mod fake;

pub use builtin::BuiltinMinifier;
pub use external::{CleanCss, Uglify, YuiCompressor};
pub use less::{LessCompiler, less_output};

use anyhow::Result;
use std::path::Path;

use crate::config::{CommandSpec, ProjectConfig};
use crate::core::AssetType;
use crate::log;

/// Turns one preprocessable source into a CSS sibling.
pub trait Preprocessor: Send + Sync {
    fn name(&self) -> &str;

    fn compile(&self, source: &Path, output: &Path) -> Result<()>;
}

/// Writes a minified copy of `input` to `output`.
pub trait Minifier: Send + Sync {
    /// Shown in "Minifying X (using Y)".
    fn name(&self) -> &str;

    fn minify(&self, kind: AssetType, input: &Path, output: &Path) -> Result<()>;
}

/// Backends selected for one run, shared read-only by every bundle.
pub struct ToolSet {
    preprocessor: Option<Box<dyn Preprocessor>>,
    css: Box<dyn Minifier>,
    js: Box<dyn Minifier>,
}

impl ToolSet {
    pub fn new(
        preprocessor: Option<Box<dyn Preprocessor>>,
        css: Box<dyn Minifier>,
        js: Box<dyn Minifier>,
    ) -> Self {
        Self {
            preprocessor,
            css,
            js,
        }
    }

    /// Select backends from `[tools]`, warning about programs not on `PATH`.
    pub fn from_config(config: &ProjectConfig) -> Self {
        let tools = &config.tools;
        let root = config.get_root();

        for spec in [&tools.less, &tools.uglify, &tools.cleancss, &tools.java]
            .into_iter()
            .flatten()
        {
            warn_if_missing(spec, root);
        }

        let preprocessor = tools
            .less
            .as_ref()
            .map(|spec| Box::new(LessCompiler::new(spec.argv(), root)) as Box<dyn Preprocessor>);

        Self {
            preprocessor,
            css: select_minifier(AssetType::Css, config),
            js: select_minifier(AssetType::Js, config),
        }
    }

    pub fn preprocessor(&self) -> Option<&dyn Preprocessor> {
        self.preprocessor.as_deref()
    }

    pub fn minifier_for(&self, kind: AssetType) -> &dyn Minifier {
        match kind {
            AssetType::Css => self.css.as_ref(),
            AssetType::Js => self.js.as_ref(),
        }
    }
}

fn select_minifier(kind: AssetType, config: &ProjectConfig) -> Box<dyn Minifier> {
    let tools = &config.tools;
    let root = config.get_root();
    let verbose = config.verbose;

    let fast = match kind {
        AssetType::Js => tools
            .uglify
            .as_ref()
            .map(|spec| Box::new(Uglify::new(spec.argv(), root, verbose)) as Box<dyn Minifier>),
        AssetType::Css => tools
            .cleancss
            .as_ref()
            .map(|spec| Box::new(CleanCss::new(spec.argv(), root)) as Box<dyn Minifier>),
    };
    if let Some(minifier) = fast {
        return minifier;
    }

    if let (Some(java), Some(jar)) = (&tools.java, &tools.yui_jar) {
        return Box::new(YuiCompressor::new(java.argv(), jar, root, verbose));
    }

    Box::new(BuiltinMinifier)
}

fn warn_if_missing(spec: &CommandSpec, root: &Path) {
    let program = spec.program();
    if which::which_in(&program, std::env::var_os("PATH"), root).is_err() {
        log!("warning"; "`{}` not found, commands using it will fail", program);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use tempfile::TempDir;

    fn names(src: &str) -> (String, String, bool) {
        let dir = TempDir::new().unwrap();
        let config = test_parse_config(dir.path(), src);
        let tools = ToolSet::from_config(&config);
        (
            tools.minifier_for(AssetType::Css).name().to_owned(),
            tools.minifier_for(AssetType::Js).name().to_owned(),
            tools.preprocessor().is_some(),
        )
    }

    #[test]
    fn test_builtin_when_nothing_configured() {
        assert_eq!(names(""), ("builtin".into(), "builtin".into(), false));
    }

    #[test]
    fn test_fast_minifiers_take_priority() {
        let src = r#"
            [tools]
            uglify = "uglifyjs"
            cleancss = "cleancss"
            java = "java"
            yui_jar = "yui.jar"
        "#;
        assert_eq!(names(src), ("clean-css".into(), "UglifyJS".into(), false));
    }

    #[test]
    fn test_yui_fallback_per_type() {
        let src = r#"
            [tools]
            uglify = ["npx", "uglifyjs"]
            java = "java"
            yui_jar = "yui.jar"
            less = "lessc"
        "#;
        assert_eq!(names(src), ("YUI Compressor".into(), "UglifyJS".into(), true));
    }
}
