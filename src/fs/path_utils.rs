// src/fs/path_utils.rs

//! Path helpers shared by the output mapper and the watch registry.

use std::path::{Component, Path, PathBuf};

use crate::fs::FileSystem;

/// Canonical key for `path`.
///
/// Uses the filesystem's canonical form when the path exists. Paths that do
/// not exist (e.g. a dependency that was deleted) fall back to a lexically
/// normalised absolute path so that they still produce a stable key.
pub fn canonical_key(fs: &dyn FileSystem, path: &Path) -> PathBuf {
    match fs.canonicalize(path) {
        Ok(p) => p,
        Err(_) => {
            let absolute = if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            };
            normalize_lexically(&absolute)
        }
    }
}

/// Resolve `.` and `..` components without touching the filesystem.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Path of `path` relative to `root`.
///
/// - First we try a direct `strip_prefix(root)`.
/// - Then the same on lexically normalised forms (e.g. `./a` vs `a`).
/// - Finally on canonical forms (symlinks, absolute vs relative).
///
/// Returns `None` if `path` does not live under `root`.
pub fn relative_to(fs: &dyn FileSystem, root: &Path, path: &Path) -> Option<PathBuf> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(rel.to_path_buf());
    }

    let (root_norm, path_norm) = (normalize_lexically(root), normalize_lexically(path));
    if let Ok(rel) = path_norm.strip_prefix(&root_norm) {
        return Some(rel.to_path_buf());
    }
    if root_norm == Path::new(".") && path_norm.is_relative() && !path_norm.starts_with("..") {
        return Some(path_norm);
    }

    let (root_canon, path_canon) = (canonical_key(fs, root), canonical_key(fs, path));
    path_canon
        .strip_prefix(&root_canon)
        .ok()
        .map(Path::to_path_buf)
}

/// Forward-slash string form of a path, for matching and display.
pub fn slash_str(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
