// src/compiler/mod.rs

//! Template compiler seam.
//!
//! The render pipeline only needs `compile(path, options) -> (output,
//! dependencies)`. [`TemplateCompiler`] is that contract; [`IncludeCompiler`]
//! is the built-in implementation used by the binary.
//!
//! Implementations must report the *full* transitive dependency closure of
//! a template, not just its direct includes: the watch registry is a flat
//! map and never walks an include graph itself.

use std::fmt::Debug;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::types::CompileMode;

pub mod include;
pub mod naming;

pub use include::IncludeCompiler;
pub use naming::template_name_from_file;

/// Settings handed to the compiler for a single compile.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileOptions {
    /// Filename used to resolve relative includes when compiling a string.
    pub filename: Option<PathBuf>,
    /// Root directory for absolute includes (`include /partials/nav`).
    pub basedir: Option<PathBuf>,
    pub pretty: bool,
    pub client: bool,
    pub compile_debug: bool,
    pub doctype: Option<String>,
    /// Exported function name in client mode.
    pub template_name: Option<String>,
    /// Free-form keys from the options object, available to compilers that
    /// interpolate data. [`IncludeCompiler`] ignores them.
    pub locals: Map<String, Value>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            filename: None,
            basedir: None,
            pretty: false,
            client: false,
            compile_debug: true,
            doctype: None,
            template_name: None,
            locals: Map::new(),
        }
    }
}

impl CompileOptions {
    pub fn mode(&self) -> CompileMode {
        if self.client {
            CompileMode::Client
        } else {
            CompileMode::Server
        }
    }
}

/// Output of one compile: the artifact text plus every file it depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledArtifact {
    pub output: String,
    pub dependencies: Vec<PathBuf>,
}

/// Compiles template sources into rendered markup or client function source.
pub trait TemplateCompiler: Send + Sync + Debug {
    /// Compile the template stored at `path`.
    fn compile_file(
        &self,
        fs: &dyn FileSystem,
        path: &Path,
        options: &CompileOptions,
    ) -> Result<CompiledArtifact>;

    /// Compile a template given as a string (standard input).
    fn compile_source(
        &self,
        fs: &dyn FileSystem,
        source: &str,
        options: &CompileOptions,
    ) -> Result<CompiledArtifact>;
}
