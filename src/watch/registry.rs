// src/watch/registry.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::render::RenderTask;

/// Result of [`WatchRegistry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The `(path, template)` pair was already known; nothing changed.
    Duplicate,
    /// The path was already watched; a new dependent template was added.
    NewDependent,
    /// First registration of this path; the caller must subscribe to it.
    NewPath,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Dependent {
    /// Canonical path of `task.target`, used for de-duplication.
    key: PathBuf,
    task: RenderTask,
}

/// Map from a canonical watched path to the templates to re-render when it
/// changes.
///
/// The map is flat: a template registers itself and every file its compile
/// reported, however deep the include chain. Entries are never removed.
#[derive(Debug, Default)]
pub struct WatchRegistry {
    entries: HashMap<PathBuf, Vec<Dependent>>,
}

impl WatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `task` must be re-rendered whenever `path` changes.
    ///
    /// `path` and `task_key` must already be canonical. Registering the same
    /// pair again is a no-op and logs nothing.
    pub fn register(&mut self, path: PathBuf, task_key: PathBuf, task: RenderTask) -> Registration {
        let is_new_path = !self.entries.contains_key(&path);
        let dependents = self.entries.entry(path.clone()).or_default();
        if dependents.iter().any(|d| d.key == task_key) {
            return Registration::Duplicate;
        }

        if path == task_key {
            info!("watching {}", path.display());
        } else {
            info!(
                "watching {} as a dependency of {}",
                path.display(),
                task.target.display()
            );
        }
        dependents.push(Dependent { key: task_key, task });

        if is_new_path {
            Registration::NewPath
        } else {
            Registration::NewDependent
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    /// Templates to re-render when `path` changes, in registration order.
    pub fn dependents(&self, path: &Path) -> Vec<RenderTask> {
        self.entries
            .get(path)
            .map(|deps| deps.iter().map(|d| d.task.clone()).collect())
            .unwrap_or_default()
    }

    /// Every watched path.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.keys().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
