// src/engine/session.rs

//! Synchronous render core.
//!
//! [`RenderSession`] owns everything a render needs: the resolved config,
//! the filesystem, the compiler, the watch registry and the watch backend.
//!
//! Two entry points wrap the same [`RenderSession::render_path`]:
//! - the initial pass propagates the first error to the caller;
//! - [`RenderSession::try_render`], used for watch-triggered renders (and for
//!   directory entries in watch mode), prints the error and carries on.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use crate::compiler::{CompileOptions, TemplateCompiler, template_name_from_file};
use crate::config::RenderConfig;
use crate::errors::{RenderError, Result};
use crate::fs::FileSystem;
use crate::fs::path_utils::canonical_key;
use crate::render::{PathClass, RenderTask, classify, map_output};
use crate::watch::{ContentHashes, Registration, WatchBackend, WatchRegistry};

/// A command-line path armed for new-file notifications.
#[derive(Debug, Clone)]
struct ArrivalRoot {
    key: PathBuf,
    original: PathBuf,
    is_dir: bool,
}

pub struct RenderSession<W: WatchBackend> {
    config: RenderConfig,
    fs: Arc<dyn FileSystem>,
    compiler: Arc<dyn TemplateCompiler>,
    registry: WatchRegistry,
    backend: W,
    hashes: ContentHashes,
    arrival_roots: Vec<ArrivalRoot>,
    /// Pending discovery-only pass; cleared once the initial pass is done.
    soft_start: bool,
}

impl<W: WatchBackend> std::fmt::Debug for RenderSession<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderSession")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("soft_start", &self.soft_start)
            .finish_non_exhaustive()
    }
}

impl<W: WatchBackend> RenderSession<W> {
    pub fn new(
        config: RenderConfig,
        fs: Arc<dyn FileSystem>,
        compiler: Arc<dyn TemplateCompiler>,
        backend: W,
    ) -> Self {
        let soft_start = config.watch && config.soft_start;
        Self {
            config,
            fs,
            compiler,
            registry: WatchRegistry::new(),
            backend,
            hashes: ContentHashes::new(),
            arrival_roots: Vec::new(),
            soft_start,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn registry(&self) -> &WatchRegistry {
        &self.registry
    }

    pub fn backend(&self) -> &W {
        &self.backend
    }

    /// Render every command-line path once.
    ///
    /// In watch mode each path is then armed for new-file notifications.
    /// Any error aborts the pass and is returned. Soft start, if enabled,
    /// only applies to this pass.
    pub fn initial_pass(&mut self, paths: &[PathBuf]) -> Result<()> {
        let result = paths.iter().try_for_each(|path| {
            self.render_path(&RenderTask::top_level(path.clone()))?;
            if self.config.watch {
                self.watch_arrivals(path)?;
            }
            Ok(())
        });
        self.soft_start = false;
        result
    }

    /// Render `task` and swallow any error after printing it to stderr.
    ///
    /// Returns whether the render succeeded.
    pub fn try_render(&mut self, task: &RenderTask) -> bool {
        match self.render_path(task) {
            Ok(()) => true,
            Err(err) => {
                // keep watching when an error occurs
                eprintln!("{:?}\x07", anyhow::Error::from(err));
                false
            }
        }
    }

    /// Render whatever `task.target` is: a template file, or a directory
    /// walked recursively.
    pub fn render_path(&mut self, task: &RenderTask) -> Result<()> {
        let target = &task.target;
        if !self.fs.exists(target) && !self.fs.is_symlink(target) {
            return Err(RenderError::IoError(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file or directory: {}", target.display()),
            )));
        }

        match classify(&*self.fs, target, &self.config.ignore) {
            PathClass::Renderable => self.render_file(task),
            PathClass::Directory => self.walk_dir(task),
            PathClass::Ignored => {
                debug!(path = ?target, "ignored");
                Ok(())
            }
            PathClass::Other => {
                trace!(path = ?target, "not a template; skipping");
                Ok(())
            }
        }
    }

    /// React to a content-change notification.
    pub fn handle_change(&mut self, path: &Path) {
        let key = canonical_key(&*self.fs, path);
        let dependents = self.registry.dependents(&key);
        if dependents.is_empty() {
            trace!(?path, "change on unregistered path; ignoring");
            return;
        }
        if self.config.skip_unchanged && !self.hashes.has_changed(&*self.fs, &key) {
            debug!(?path, "content unchanged; skipping re-render");
            return;
        }

        debug!(?path, count = dependents.len(), "re-rendering dependents");
        for task in dependents {
            self.try_render(&task);
        }
    }

    /// React to a new-file notification.
    pub fn handle_arrival(&mut self, path: &Path) {
        // Editors create and remove scratch files around every save.
        if !self.fs.exists(path) && !self.fs.is_symlink(path) {
            debug!(?path, "arrived path is already gone; ignoring");
            return;
        }
        let key = canonical_key(&*self.fs, path);
        if self.registry.contains(&key) {
            trace!(?path, "arrival of an already watched path; ignoring");
            return;
        }
        let task = self.arrival_task(path, &key);
        debug!(?task, "new file");
        self.try_render(&task);
    }

    fn walk_dir(&mut self, task: &RenderTask) -> Result<()> {
        let dir = &task.target;
        let root = task.root.clone().unwrap_or_else(|| dir.clone());
        for entry in self.fs.read_dir(dir)? {
            let child = RenderTask::new(entry, Some(root.clone()));
            if self.config.watch {
                self.try_render(&child);
            } else {
                self.render_path(&child)?;
            }
        }
        Ok(())
    }

    fn render_file(&mut self, task: &RenderTask) -> Result<()> {
        let source = &task.target;
        let output_path = map_output(
            &*self.fs,
            source,
            task.root.as_deref(),
            &self.config.output,
        );

        if self.config.dry_run {
            println!("{} -> {}", source.display(), output_path.display());
            return Ok(());
        }

        // Watch the file itself before compiling, so a template that fails
        // to compile is still picked up once it is fixed.
        if self.config.watch {
            self.watch_path(source, task);
        }

        let options = self.compile_options_for(source);
        let artifact = self.compiler.compile_file(&*self.fs, source, &options)?;

        if self.config.watch {
            for dep in &artifact.dependencies {
                self.watch_path(dep, task);
            }
        }

        if self.soft_start {
            debug!(path = ?source, "soft start: compiled without writing");
            return Ok(());
        }

        self.write_artifact(&output_path, &artifact.output)?;
        info!("rendered {}", output_path.display());
        Ok(())
    }

    fn compile_options_for(&self, source: &Path) -> CompileOptions {
        let mut options = self.config.compile.clone();
        if self.config.name_after_file && options.template_name.is_none() {
            options.template_name = Some(template_name_from_file(source));
        }
        options
    }

    fn write_artifact(&self, output_path: &Path, output: &str) -> Result<()> {
        if let Some(dir) = output_path.parent() {
            if !dir.as_os_str().is_empty() {
                self.fs.create_dir_all(dir)?;
            }
        }
        let output = match self.config.line_ending {
            Some(ending) => ending.apply(output),
            None => output.to_string(),
        };
        self.fs.write(output_path, output.as_bytes())?;
        Ok(())
    }

    /// Register `path` as something `task` depends on (or `task` itself).
    fn watch_path(&mut self, path: &Path, task: &RenderTask) {
        let key = canonical_key(&*self.fs, path);
        let task_key = canonical_key(&*self.fs, &task.target);

        if self.registry.register(key.clone(), task_key, task.clone()) != Registration::NewPath {
            return;
        }
        if let Err(err) = self.backend.watch_content(&key) {
            warn!(path = ?key, error = %err, "failed to subscribe to changes");
        }
        if self.config.skip_unchanged {
            self.hashes.record(&*self.fs, &key);
        }
    }

    fn watch_arrivals(&mut self, path: &Path) -> Result<()> {
        let key = canonical_key(&*self.fs, path);
        if self.arrival_roots.iter().any(|r| r.key == key) {
            return Ok(());
        }
        self.backend.watch_arrivals(&key)?;
        self.arrival_roots.push(ArrivalRoot {
            key,
            original: path.to_path_buf(),
            is_dir: self.fs.is_dir(path),
        });
        Ok(())
    }

    /// Build the task for a newly created `path`, keeping the relative
    /// output layout of the command-line directory it appeared under.
    fn arrival_task(&self, path: &Path, key: &Path) -> RenderTask {
        let root = self
            .arrival_roots
            .iter()
            .filter(|r| key.starts_with(&r.key))
            .max_by_key(|r| r.key.components().count());

        match root {
            Some(root) if root.is_dir => {
                let target = match key.strip_prefix(&root.key) {
                    Ok(rel) => root.original.join(rel),
                    Err(_) => path.to_path_buf(),
                };
                RenderTask::new(target, Some(root.original.clone()))
            }
            Some(root) => RenderTask::top_level(root.original.clone()),
            None => RenderTask::top_level(path.to_path_buf()),
        }
    }
}
