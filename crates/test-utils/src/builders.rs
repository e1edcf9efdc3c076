#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use rendwatch::compiler::{CompileOptions, IncludeCompiler};
use rendwatch::config::RenderConfig;
use rendwatch::engine::RenderSession;
use rendwatch::fs::FileSystem;
use rendwatch::render::{IgnoreRules, OutputOptions};
use rendwatch::types::LineEnding;

use crate::recording_backend::RecordingBackend;

/// Builder for `RenderConfig` to simplify test setup.
pub struct RenderConfigBuilder {
    config: RenderConfig,
    exclude: Vec<String>,
    ignore_only_files: bool,
}

impl RenderConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RenderConfig {
                compile: CompileOptions::default(),
                output: OutputOptions::default(),
                ..RenderConfig::default()
            },
            exclude: Vec::new(),
            ignore_only_files: false,
        }
    }

    pub fn out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output.out_dir = Some(dir.into());
        self
    }

    pub fn extension(mut self, ext: &str) -> Self {
        self.config.output.extension = Some(ext.to_string());
        self
    }

    pub fn client(mut self) -> Self {
        self.config.compile.client = true;
        self.config.output.mode = self.config.compile.mode();
        self
    }

    pub fn template_name(mut self, name: &str) -> Self {
        self.config.compile.template_name = Some(name.to_string());
        self
    }

    pub fn name_after_file(mut self) -> Self {
        self.config.name_after_file = true;
        self
    }

    pub fn watch(mut self) -> Self {
        self.config.watch = true;
        self
    }

    pub fn soft_start(mut self) -> Self {
        self.config.soft_start = true;
        self
    }

    pub fn dry_run(mut self) -> Self {
        self.config.dry_run = true;
        self
    }

    pub fn skip_unchanged(mut self) -> Self {
        self.config.skip_unchanged = true;
        self
    }

    pub fn line_ending(mut self, ending: LineEnding) -> Self {
        self.config.line_ending = Some(ending);
        self
    }

    pub fn ignore_only_files(mut self) -> Self {
        self.ignore_only_files = true;
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.exclude.push(pattern.to_string());
        self
    }

    pub fn build(mut self) -> RenderConfig {
        self.config.ignore = IgnoreRules::new(self.ignore_only_files, &self.exclude)
            .expect("Failed to build ignore rules from builder");
        self.config
    }
}

impl Default for RenderConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Session over `fs` with the built-in compiler and a recording backend.
///
/// The returned backend shares its record with the one inside the session.
pub fn session_with(
    config: RenderConfig,
    fs: Arc<dyn FileSystem>,
) -> (RenderSession<RecordingBackend>, RecordingBackend) {
    let backend = RecordingBackend::new();
    let session = RenderSession::new(
        config,
        fs,
        Arc::new(IncludeCompiler::new()),
        backend.clone(),
    );
    (session, backend)
}
