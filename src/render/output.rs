// src/render/output.rs

use std::path::{Path, PathBuf};

use regex::NoExpand;

use crate::fs::FileSystem;
use crate::fs::path_utils::relative_to;
use crate::render::classify::TEMPLATE_EXTENSION;
use crate::types::CompileMode;

/// Settings that decide where artifacts go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// `--out`: relocate artifacts under this directory.
    pub out_dir: Option<PathBuf>,
    /// `--extension`: replacement extension without the dot; `Some("")`
    /// strips the extension.
    pub extension: Option<String>,
    pub mode: CompileMode,
}

impl OutputOptions {
    /// Extension (with dot) that replaces the template extension.
    pub fn output_extension(&self) -> String {
        match (&self.extension, self.mode) {
            (Some(ext), _) if ext.is_empty() => String::new(),
            (Some(ext), _) => format!(".{ext}"),
            (None, CompileMode::Client) => ".js".to_string(),
            (None, CompileMode::Server) => ".html".to_string(),
        }
    }
}

/// Destination path for the artifact rendered from `source`.
///
/// - Without an output directory the artifact sits next to its source.
/// - With one, and a `root`, the path relative to `root` is recreated under
///   the output directory.
/// - With one and no `root` (a file named on the command line) the artifact
///   lands directly in the output directory.
pub fn map_output(
    fs: &dyn FileSystem,
    source: &Path,
    root: Option<&Path>,
    opts: &OutputOptions,
) -> PathBuf {
    let replaced = PathBuf::from(
        TEMPLATE_EXTENSION
            .replace(
                &source.to_string_lossy(),
                NoExpand(opts.output_extension().as_str()),
            )
            .into_owned(),
    );

    let Some(out_dir) = &opts.out_dir else {
        return replaced;
    };

    let relative = root
        .and_then(|root| relative_to(fs, root, &replaced))
        .filter(|rel| !rel.as_os_str().is_empty())
        .or_else(|| replaced.file_name().map(PathBuf::from))
        .unwrap_or_else(|| replaced.clone());

    out_dir.join(relative)
}
