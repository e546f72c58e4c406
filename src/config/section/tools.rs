//! `[tools]` section configuration.
//!
//! Every tool is optional. Commands are either a single string (split on
//! whitespace) or an argument vector; a leading `~` is expanded.
//!
//! # Example
//!
//! ```toml
//! [tools]
//! less = "lessc"                          # LESS → CSS compiler
//! uglify = ["npx", "uglifyjs"]            # fast JS minifier
//! cleancss = "~/node_modules/.bin/cleancss"
//! java = "java"                           # YUI Compressor fallback
//! yui_jar = "bin/yuicompressor-2.4.7.jar"
//! ```
//!
//! Without `uglify`/`cleancss`/YUI the built-in minifier is used.

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::config::util::expand_tilde;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A configured external command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandSpec {
    Line(String),
    Argv(Vec<String>),
}

impl CommandSpec {
    /// Program followed by its fixed arguments.
    pub fn argv(&self) -> Vec<String> {
        let mut argv: Vec<String> = match self {
            Self::Line(line) => line.split_whitespace().map(str::to_owned).collect(),
            Self::Argv(args) => args.iter().filter(|a| !a.is_empty()).cloned().collect(),
        };
        if let Some(program) = argv.first_mut() {
            *program = expand_tilde(program);
        }
        argv
    }

    pub fn is_empty(&self) -> bool {
        self.argv().is_empty()
    }

    /// Program name, for log lines.
    pub fn program(&self) -> String {
        self.argv().into_iter().next().unwrap_or_default()
    }
}

impl From<&str> for CommandSpec {
    fn from(value: &str) -> Self {
        Self::Line(value.to_owned())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// LESS compiler, invoked as `<less> <in.less> <in.less.css>`.
    pub less: Option<CommandSpec>,

    /// JS minifier, invoked as `<uglify> -o <out> <in>`.
    pub uglify: Option<CommandSpec>,

    /// CSS minifier, invoked as `<cleancss> -o <out> <in>`.
    pub cleancss: Option<CommandSpec>,

    /// Java runtime for the YUI Compressor fallback.
    pub java: Option<CommandSpec>,

    /// YUI Compressor jar (relative to project root).
    pub yui_jar: Option<PathBuf>,
}

impl ToolsConfig {
    pub fn normalize(&mut self, root: &Path) {
        if let Some(jar) = self.yui_jar.take() {
            let expanded = PathBuf::from(expand_tilde(&jar.to_string_lossy()));
            self.yui_jar = Some(crate::utils::path::normalize_lexical(&root.join(expanded)));
        }
    }

    /// Both halves of the YUI fallback are configured.
    pub fn has_yui(&self) -> bool {
        self.java.is_some() && self.yui_jar.is_some()
    }

    pub fn validate(&self, needs_less: bool, diag: &mut ConfigDiagnostics) {
        let commands = [
            (FieldPath::new("tools.less"), &self.less),
            (FieldPath::new("tools.uglify"), &self.uglify),
            (FieldPath::new("tools.cleancss"), &self.cleancss),
            (FieldPath::new("tools.java"), &self.java),
        ];
        for (field, spec) in commands {
            if spec.as_ref().is_some_and(CommandSpec::is_empty) {
                diag.error(field, "command must not be empty");
            }
        }

        if needs_less && self.less.is_none() {
            diag.error_with_hint(
                FieldPath::new("tools.less"),
                "bundles reference .less files but no LESS compiler is configured",
                "set tools.less = \"lessc\"",
            );
        }

        match (&self.java, &self.yui_jar) {
            (Some(_), None) => diag.error(
                FieldPath::new("tools.yui_jar"),
                "`tools.java` is set but `tools.yui_jar` is missing",
            ),
            (None, Some(_)) => diag.error(
                FieldPath::new("tools.java"),
                "`tools.yui_jar` is set but `tools.java` is missing",
            ),
            (Some(_), Some(jar)) if !jar.is_file() => diag.error(
                FieldPath::new("tools.yui_jar"),
                format!("jar `{}` does not exist", jar.display()),
            ),
            _ => {}
        }
    }
}
