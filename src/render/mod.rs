// src/render/mod.rs

//! Pure pieces of the render pipeline.
//!
//! - [`classify`] decides what a path is (renderable, ignored, directory).
//! - [`output`] derives where the artifact for a source file is written.
//!
//! Nothing in here compiles or writes; that is the job of
//! [`crate::engine::RenderSession`].

use std::path::PathBuf;

pub mod classify;
pub mod output;

pub use classify::{IgnoreRules, PathClass, classify};
pub use output::{OutputOptions, map_output};

/// One unit of work for the render invoker.
///
/// `root` is the directory under which relative output structure is
/// computed; `None` for a file given directly on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderTask {
    pub target: PathBuf,
    pub root: Option<PathBuf>,
}

impl RenderTask {
    pub fn new(target: impl Into<PathBuf>, root: Option<PathBuf>) -> Self {
        Self {
            target: target.into(),
            root,
        }
    }

    /// Task for a path given on the command line.
    pub fn top_level(target: impl Into<PathBuf>) -> Self {
        Self::new(target, None)
    }
}
