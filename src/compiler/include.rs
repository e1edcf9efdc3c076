// src/compiler/include.rs

//! Built-in line-oriented compiler.
//!
//! It understands exactly two directives, each on a line of its own:
//!
//! ```text
//! include partials/nav
//! extends /layouts/base.pug
//! ```
//!
//! The referenced file is spliced in place of the directive (keeping the
//! directive's indentation), recursively. Every other line is copied through.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::compiler::{CompileOptions, CompiledArtifact, TemplateCompiler};
use crate::errors::{RenderError, Result};
use crate::fs::FileSystem;
use crate::fs::path_utils::{canonical_key, normalize_lexically};
use crate::types::CompileMode;

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)(include|extends)\s+(\S.*?)\s*$").expect("valid directive regex")
});

/// Extension appended to include targets that have none.
const DEFAULT_EXTENSION: &str = "pug";

/// Function name used in client mode when none is configured.
const DEFAULT_TEMPLATE_NAME: &str = "template";

#[derive(Debug, Clone, Copy, Default)]
pub struct IncludeCompiler;

/// Mutable state threaded through one expansion.
struct Expansion<'a> {
    fs: &'a dyn FileSystem,
    options: &'a CompileOptions,
    /// Canonical paths of the files currently being expanded.
    stack: Vec<PathBuf>,
    dependencies: Vec<PathBuf>,
    lines: Vec<String>,
}

impl IncludeCompiler {
    pub fn new() -> Self {
        Self
    }

    fn compile(
        &self,
        fs: &dyn FileSystem,
        source: &str,
        origin: Option<&Path>,
        options: &CompileOptions,
    ) -> Result<CompiledArtifact> {
        let mut expansion = Expansion {
            fs,
            options,
            stack: origin.map(|p| vec![canonical_key(fs, p)]).unwrap_or_default(),
            dependencies: Vec::new(),
            lines: Vec::new(),
        };
        expansion.expand(source, origin, "")?;

        let rendered = render_markup(&expansion.lines, options);
        let output = match options.mode() {
            CompileMode::Server => rendered,
            CompileMode::Client => client_function(&rendered, origin, options)?,
        };

        Ok(CompiledArtifact {
            output,
            dependencies: expansion.dependencies,
        })
    }
}

impl TemplateCompiler for IncludeCompiler {
    fn compile_file(
        &self,
        fs: &dyn FileSystem,
        path: &Path,
        options: &CompileOptions,
    ) -> Result<CompiledArtifact> {
        let source = fs.read_to_string(path)?;
        self.compile(fs, &source, Some(path), options)
    }

    fn compile_source(
        &self,
        fs: &dyn FileSystem,
        source: &str,
        options: &CompileOptions,
    ) -> Result<CompiledArtifact> {
        self.compile(fs, source, options.filename.as_deref(), options)
    }
}

impl Expansion<'_> {
    fn expand(&mut self, source: &str, origin: Option<&Path>, indent: &str) -> Result<()> {
        for line in source.lines() {
            let Some(caps) = DIRECTIVE.captures(line) else {
                self.lines.push(format!("{indent}{line}"));
                continue;
            };

            let target = resolve_target(&caps[3], origin, self.options)
                .map_err(|message| compile_error(origin, message))?;
            let key = canonical_key(self.fs, &target);
            if self.stack.contains(&key) {
                return Err(compile_error(
                    origin,
                    format!("{} cycle through {}", &caps[2], target.display()),
                ));
            }
            if !self.dependencies.contains(&target) {
                self.dependencies.push(target.clone());
            }
            trace!(directive = &caps[2], target = ?target, "expanding");

            let included = self.fs.read_to_string(&target).map_err(|err| {
                compile_error(origin, format!("cannot read {}: {err}", target.display()))
            })?;

            let nested_indent = format!("{indent}{}", &caps[1]);
            self.stack.push(key);
            self.expand(&included, Some(&target), &nested_indent)?;
            self.stack.pop();
        }
        Ok(())
    }
}

fn compile_error(origin: Option<&Path>, message: impl Into<String>) -> RenderError {
    RenderError::compile(origin.unwrap_or(Path::new("<stdin>")), message)
}

fn resolve_target(
    raw: &str,
    origin: Option<&Path>,
    options: &CompileOptions,
) -> std::result::Result<PathBuf, String> {
    let mut target = PathBuf::from(raw);
    if target.extension().is_none() {
        target.set_extension(DEFAULT_EXTENSION);
    }

    let resolved = if let Ok(stripped) = target.strip_prefix("/") {
        let basedir = options.basedir.as_ref().ok_or_else(|| {
            format!("the \"basedir\" option is required to include \"{raw}\" by absolute path")
        })?;
        basedir.join(stripped)
    } else {
        let origin = origin.ok_or_else(|| {
            format!("the \"filename\" option is required to include \"{raw}\" by relative path")
        })?;
        origin
            .parent()
            .map(|dir| dir.join(&target))
            .unwrap_or(target)
    };

    Ok(normalize_lexically(&resolved))
}

fn render_markup(lines: &[String], options: &CompileOptions) -> String {
    let mut out: Vec<String> = Vec::with_capacity(lines.len() + 1);
    if let Some(doctype) = &options.doctype {
        out.push(doctype_line(doctype));
    }
    if options.pretty {
        out.extend(lines.iter().cloned());
    } else {
        out.extend(
            lines
                .iter()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty()),
        );
    }
    out.join("\n")
}

fn doctype_line(doctype: &str) -> String {
    match doctype {
        "html" => "<!DOCTYPE html>".to_string(),
        "xml" => r#"<?xml version="1.0" encoding="utf-8" ?>"#.to_string(),
        other => format!("<!DOCTYPE {other}>"),
    }
}

fn client_function(
    rendered: &str,
    origin: Option<&Path>,
    options: &CompileOptions,
) -> Result<String> {
    let name = options
        .template_name
        .as_deref()
        .unwrap_or(DEFAULT_TEMPLATE_NAME);
    let body = serde_json::to_string(rendered).map_err(anyhow::Error::from)?;

    let mut out = String::new();
    if options.compile_debug {
        if let Some(origin) = origin {
            out.push_str(&format!("// source: {}\n", origin.display()));
        }
    }
    out.push_str(&format!("function {name}(locals) {{\n  return {body};\n}}\n"));
    Ok(out)
}
