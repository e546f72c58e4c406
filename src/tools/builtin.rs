//! In-process fallback minifier: oxc for JavaScript, lightningcss for CSS.

use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::Path;

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{
    CompressOptions, CompressOptionsUnused, Minifier as OxcMinifier, MinifierOptions,
};
use oxc::parser::Parser;
use oxc::span::SourceType;

use super::Minifier;
use crate::core::AssetType;

/// Used when no external minifier is configured for an asset type.
pub struct BuiltinMinifier;

impl Minifier for BuiltinMinifier {
    fn name(&self) -> &str {
        "builtin"
    }

    fn minify(&self, kind: AssetType, input: &Path, output: &Path) -> Result<()> {
        let source = fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;

        let minified = match kind {
            AssetType::Js => minify_js(&source),
            AssetType::Css => minify_css(&source),
        }
        .map_err(|e| anyhow!("{}: {e}", input.display()))?;

        fs::write(output, minified)
            .with_context(|| format!("Failed to write {}", output.display()))
    }
}

/// Minify a concatenation of classic scripts.
///
/// Parsed as a script, not a module. Top-level declarations are neither
/// renamed nor dropped: later files in the page use them as globals.
pub fn minify_js(source: &str) -> Result<String, String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::script()).parse();
    if !ret.errors.is_empty() {
        return Err(format!("{} syntax error(s)", ret.errors.len()));
    }

    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions {
            top_level: Some(false),
            ..MangleOptions::default()
        }),
        compress: Some(CompressOptions {
            unused: CompressOptionsUnused::Keep,
            ..CompressOptions::smallest()
        }),
    };
    let ret = OxcMinifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}

pub fn minify_css(source: &str) -> Result<String, String> {
    let stylesheet =
        StyleSheet::parse(source, ParserOptions::default()).map_err(|e| e.to_string())?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| e.to_string())?;
    Ok(result.code)
}
