// src/watch/watcher.rs

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::debug;

use crate::engine::RenderEvent;

/// The two independent trigger families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscription {
    /// Bytes of an already registered path changed.
    Content,
    /// A file appeared under a watched command-line path.
    Arrival,
}

/// Seam between the render session and the filesystem notification layer.
///
/// Production code uses [`NotifyBackend`]; tests can record the requested
/// subscriptions and inject events by hand.
pub trait WatchBackend {
    /// Make sure content changes of `path` are reported as
    /// [`RenderEvent::ContentChanged`].
    fn watch_content(&mut self, path: &Path) -> Result<()>;

    /// Report files created anywhere under `path` as
    /// [`RenderEvent::FileArrived`].
    fn watch_arrivals(&mut self, path: &Path) -> Result<()>;
}

/// `notify`-backed subscriptions.
///
/// Each subscription is one `RecommendedWatcher`, created on first use and
/// extended with further paths afterwards. Content changes are observed
/// through the parent directory of each file so that editors which save by
/// renaming over the original keep being noticed.
pub struct NotifyBackend {
    event_tx: mpsc::UnboundedSender<RenderEvent>,
    content: Option<RecommendedWatcher>,
    content_dirs: HashSet<PathBuf>,
    arrival: Option<RecommendedWatcher>,
    arrival_paths: HashSet<PathBuf>,
}

impl std::fmt::Debug for NotifyBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyBackend")
            .field("content_dirs", &self.content_dirs)
            .field("arrival_paths", &self.arrival_paths)
            .finish_non_exhaustive()
    }
}

impl NotifyBackend {
    pub fn new(event_tx: mpsc::UnboundedSender<RenderEvent>) -> Self {
        Self {
            event_tx,
            content: None,
            content_dirs: HashSet::new(),
            arrival: None,
            arrival_paths: HashSet::new(),
        }
    }

    /// Whether the content and arrival watchers have been created yet.
    pub fn subscriptions(&self) -> (bool, bool) {
        (self.content.is_some(), self.arrival.is_some())
    }

    fn content_watcher(&mut self) -> Result<&mut RecommendedWatcher> {
        let watcher = match self.content.take() {
            Some(w) => w,
            None => spawn_watcher(self.event_tx.clone(), Subscription::Content)?,
        };
        Ok(self.content.insert(watcher))
    }

    fn arrival_watcher(&mut self) -> Result<&mut RecommendedWatcher> {
        let watcher = match self.arrival.take() {
            Some(w) => w,
            None => spawn_watcher(self.event_tx.clone(), Subscription::Arrival)?,
        };
        Ok(self.arrival.insert(watcher))
    }
}

impl WatchBackend for NotifyBackend {
    fn watch_content(&mut self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if self.content_dirs.contains(&dir) {
            return Ok(());
        }
        self.content_watcher()?
            .watch(&dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("watching {:?} for changes", dir))?;
        debug!(?dir, "content subscription extended");
        self.content_dirs.insert(dir);
        Ok(())
    }

    fn watch_arrivals(&mut self, path: &Path) -> Result<()> {
        if self.arrival_paths.contains(path) {
            return Ok(());
        }
        self.arrival_watcher()?
            .watch(path, RecursiveMode::Recursive)
            .with_context(|| format!("watching {:?} for new files", path))?;
        debug!(?path, "arrival subscription extended");
        self.arrival_paths.insert(path.to_path_buf());
        Ok(())
    }
}

fn spawn_watcher(
    event_tx: mpsc::UnboundedSender<RenderEvent>,
    subscription: Subscription,
) -> Result<RecommendedWatcher> {
    // Closure called synchronously by notify whenever an event arrives.
    let watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                for render_event in events_for(subscription, &event) {
                    if let Err(err) = event_tx.send(render_event) {
                        // We can't log via tracing here easily, so fallback to stderr.
                        eprintln!("rendwatch: failed to forward notify event: {err}");
                    }
                }
            }
            Err(err) => {
                eprintln!("rendwatch: file watch error: {err}");
            }
        },
        Config::default(),
    )?;
    debug!(?subscription, "created filesystem watcher");
    Ok(watcher)
}

/// Translate a raw `notify` event into render events for `subscription`.
pub fn events_for(subscription: Subscription, event: &Event) -> Vec<RenderEvent> {
    match subscription {
        Subscription::Content => match event.kind {
            EventKind::Create(_) | EventKind::Modify(_) => {
                let paths: &[PathBuf] = match event.kind {
                    // Old name of a rename: the file is gone, not changed.
                    EventKind::Modify(ModifyKind::Name(RenameMode::From)) => &[],
                    EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
                        event.paths.get(1..).unwrap_or(&[])
                    }
                    _ => event.paths.as_slice(),
                };
                paths
                    .iter()
                    .cloned()
                    .map(RenderEvent::ContentChanged)
                    .collect()
            }
            _ => Vec::new(),
        },
        Subscription::Arrival => {
            let paths: &[PathBuf] = match event.kind {
                EventKind::Create(_)
                | EventKind::Modify(ModifyKind::Name(RenameMode::To)) => event.paths.as_slice(),
                EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
                    event.paths.get(1..).unwrap_or(&[])
                }
                _ => &[],
            };
            paths.iter().cloned().map(RenderEvent::FileArrived).collect()
        }
    }
}
