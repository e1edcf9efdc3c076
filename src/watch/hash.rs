// src/watch/hash.rs

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use blake3::Hasher;
use tracing::debug;

use crate::fs::FileSystem;

/// Compute the hash of a single file.
pub fn compute_file_hash(fs: &dyn FileSystem, path: &Path) -> Result<String> {
    let mut hasher = Hasher::new();
    let mut file = fs
        .open_read(path)
        .with_context(|| format!("opening file for hashing: {:?}", path))?;
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().to_hex().to_string())
}

/// Last seen content hash of each watched file.
///
/// Editors and `notify` often report several events for one save; with
/// `--skip-unchanged` only events that changed the bytes trigger renders.
#[derive(Debug, Default)]
pub struct ContentHashes {
    hashes: HashMap<PathBuf, String>,
}

impl ContentHashes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the current hash of `path`. Unreadable files are forgotten.
    pub fn record(&mut self, fs: &dyn FileSystem, path: &Path) {
        match compute_file_hash(fs, path) {
            Ok(hash) => {
                self.hashes.insert(path.to_path_buf(), hash);
            }
            Err(err) => {
                debug!(?path, error = %err, "cannot hash file; forgetting it");
                self.hashes.remove(path);
            }
        }
    }

    /// Re-hash `path` and report whether it differs from the last record.
    ///
    /// Unknown or unreadable files count as changed.
    pub fn has_changed(&mut self, fs: &dyn FileSystem, path: &Path) -> bool {
        let new_hash = match compute_file_hash(fs, path) {
            Ok(h) => h,
            Err(err) => {
                debug!(?path, error = %err, "cannot hash file; treating as changed");
                self.hashes.remove(path);
                return true;
            }
        };
        match self.hashes.insert(path.to_path_buf(), new_hash.clone()) {
            Some(old) => old != new_hash,
            None => true,
        }
    }
}
