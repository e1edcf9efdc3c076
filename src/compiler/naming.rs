// src/compiler/naming.rs

use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::render::classify::TEMPLATE_EXTENSION;

static WORD_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+([a-z])").expect("valid word-break regex"));

/// Derive a function name from a template path: `my-page.pug` becomes
/// `myPageTemplate`.
pub fn template_name_from_file(path: &Path) -> String {
    let base = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = TEMPLATE_EXTENSION.replace(&base, "").to_lowercase();
    let camel = WORD_BREAK.replace_all(&stem, |caps: &Captures<'_>| caps[1].to_uppercase());
    format!("{camel}Template")
}
