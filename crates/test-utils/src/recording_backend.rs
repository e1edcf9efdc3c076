use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rendwatch::watch::WatchBackend;

/// What a [`RecordingBackend`] was asked to subscribe to.
#[derive(Debug, Default, Clone)]
pub struct Subscriptions {
    pub content: Vec<PathBuf>,
    pub arrivals: Vec<PathBuf>,
}

/// A watch backend that never touches the OS and only records requests.
///
/// Clones share the same record, so a test can keep one handle while the
/// session owns the other.
#[derive(Debug, Default, Clone)]
pub struct RecordingBackend {
    record: Arc<Mutex<Subscriptions>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> Vec<PathBuf> {
        self.record.lock().unwrap().content.clone()
    }

    pub fn arrivals(&self) -> Vec<PathBuf> {
        self.record.lock().unwrap().arrivals.clone()
    }
}

impl WatchBackend for RecordingBackend {
    fn watch_content(&mut self, path: &Path) -> anyhow::Result<()> {
        self.record.lock().unwrap().content.push(path.to_path_buf());
        Ok(())
    }

    fn watch_arrivals(&mut self, path: &Path) -> anyhow::Result<()> {
        self.record.lock().unwrap().arrivals.push(path.to_path_buf());
        Ok(())
    }
}
