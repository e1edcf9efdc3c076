// src/render/classify.rs

use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::Regex;

use crate::fs::FileSystem;
use crate::fs::path_utils::slash_str;

/// Recognised template source extensions.
pub static TEMPLATE_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(?:pug|jade)$").expect("valid extension regex"));

/// A leading `_` on the whole path or on any path segment.
static IGNORED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([/\\]_)|(^_)").expect("valid ignore regex"));

/// What the walker should do with a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// Template source to compile.
    Renderable,
    /// Template source excluded by the ignore rules.
    Ignored,
    /// Directory to recurse into.
    Directory,
    /// Anything else; skipped silently.
    Other,
}

/// Rules deciding which template files are skipped.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    /// Check the `_` prefix against the basename only, so files under
    /// `_dir/` are still rendered.
    pub ignore_only_files: bool,
    /// Extra `--exclude` globs, matched against the forward-slash path.
    pub exclude: Option<GlobSet>,
}

impl IgnoreRules {
    pub fn new(ignore_only_files: bool, exclude_patterns: &[String]) -> Result<Self> {
        let exclude = if exclude_patterns.is_empty() {
            None
        } else {
            Some(build_globset(exclude_patterns)?)
        };
        Ok(Self {
            ignore_only_files,
            exclude,
        })
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        let full = slash_str(path);
        let target = if self.ignore_only_files {
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        } else {
            full.clone()
        };
        if IGNORED.is_match(&target) {
            return true;
        }
        match &self.exclude {
            Some(set) => set.is_match(&full) || set.is_match(full.trim_start_matches("./")),
            None => false,
        }
    }
}

/// Classify `path` without following symlinks.
///
/// Directories are always recursed into, whatever their name; the ignore
/// rules only decide about template files.
pub fn classify(fs: &dyn FileSystem, path: &Path, rules: &IgnoreRules) -> PathClass {
    if fs.is_symlink(path) {
        return PathClass::Other;
    }
    if fs.is_dir(path) {
        return PathClass::Directory;
    }
    if !fs.is_file(path) || !is_template(path) {
        return PathClass::Other;
    }
    if rules.is_ignored(path) {
        PathClass::Ignored
    } else {
        PathClass::Renderable
    }
}

/// True if the file name carries a template extension.
pub fn is_template(path: &Path) -> bool {
    TEMPLATE_EXTENSION.is_match(&path.to_string_lossy())
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid exclude glob pattern: {pat}"))?;
        builder.add(glob);
    }
    builder.build().context("building exclude globset")
}
