//! JavaScript transpilation and minification via oxc.

use std::path::Path;

use anyhow::{Result, anyhow};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::semantic::SemanticBuilder;
use oxc::span::SourceType;
use oxc::transformer::{TransformOptions, Transformer};

/// Result of a transpilation pass.
pub struct JsOutput {
    pub code: String,
    /// Source map JSON, present when requested.
    pub map: Option<String>,
}

/// Down-level a script to the given ECMAScript target (e.g. "es2015").
///
/// `path` names the source in diagnostics and the emitted source map.
pub fn transpile_js(source: &str, path: &Path, target: &str, source_map: bool) -> Result<JsOutput> {
    let allocator = Allocator::default();
    let source_type = SourceType::from_path(path).unwrap_or_else(|_| SourceType::mjs());

    let ret = Parser::new(&allocator, source, source_type).parse();
    if !ret.errors.is_empty() {
        return Err(anyhow!(
            "{}: {}",
            path.display(),
            join_errors(&ret.errors)
        ));
    }
    let mut program = ret.program;

    let scoping = SemanticBuilder::new()
        .build(&program)
        .semantic
        .into_scoping();

    let options = TransformOptions::from_target(target)
        .map_err(|err| anyhow!("invalid transpile target '{target}': {err}"))?;
    let ret = Transformer::new(&allocator, path, &options).build_with_scoping(scoping, &mut program);
    if !ret.errors.is_empty() {
        return Err(anyhow!(
            "{}: {}",
            path.display(),
            join_errors(&ret.errors)
        ));
    }

    let result = Codegen::new()
        .with_options(CodegenOptions {
            source_map_path: source_map.then(|| path.to_path_buf()),
            ..CodegenOptions::default()
        })
        .build(&program);

    Ok(JsOutput {
        code: result.code,
        map: result.map.map(|map| map.to_json_string()),
    })
}

/// Minify JavaScript source code.
pub fn minify_js(source: &str) -> Option<String> {
    let allocator = Allocator::default();
    let source_type = SourceType::mjs();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if !ret.errors.is_empty() {
        return None;
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Some(code)
}

fn join_errors(errors: &[oxc::diagnostics::OxcDiagnostic]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// ============================================================================
// tests
// ============================================================================
