// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::compiler::CompileOptions;
use crate::render::{IgnoreRules, OutputOptions};
use crate::types::LineEnding;

/// Options object as given through `-O/--obj`.
///
/// ```json
/// { "doctype": "html", "pretty": true, "title": "Home" }
/// ```
///
/// Known keys map onto compile settings; every other key is kept in
/// `locals` on [`CompileOptions`](crate::compiler::CompileOptions) for
/// compilers that use template data.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsObject {
    #[serde(default)]
    pub filename: Option<PathBuf>,
    #[serde(default)]
    pub basedir: Option<PathBuf>,
    #[serde(default)]
    pub pretty: Option<bool>,
    #[serde(default)]
    pub client: Option<bool>,
    #[serde(default)]
    pub compile_debug: Option<bool>,
    #[serde(default)]
    pub doctype: Option<String>,
    #[serde(default)]
    pub template_name: Option<String>,
    /// `"lf"`, `"crlf"` or `"cr"`, case-insensitive.
    #[serde(default)]
    pub line_ending: Option<LineEnding>,
    #[serde(flatten)]
    pub locals: Map<String, Value>,
}

/// Fully resolved settings for a render run.
///
/// Built from [`crate::cli::CliArgs`] via `TryFrom` (see `validate.rs`).
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    pub compile: CompileOptions,
    pub output: OutputOptions,
    pub ignore: IgnoreRules,
    pub watch: bool,
    /// Discovery-only initial pass (watch mode only).
    pub soft_start: bool,
    pub line_ending: Option<LineEnding>,
    /// Derive the client function name from the file name.
    pub name_after_file: bool,
    /// Drop change events whose content hash did not change.
    pub skip_unchanged: bool,
    pub dry_run: bool,
}
