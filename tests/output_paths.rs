// tests/output_paths.rs

use std::path::{Path, PathBuf};

use proptest::prelude::*;

use rendwatch::fs::mock::MockFileSystem;
use rendwatch::render::{OutputOptions, map_output};
use rendwatch::types::CompileMode;

fn segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,7}"
}

fn options(out_dir: Option<&str>, extension: Option<&str>, mode: CompileMode) -> OutputOptions {
    OutputOptions {
        out_dir: out_dir.map(PathBuf::from),
        extension: extension.map(str::to_string),
        mode,
    }
}

#[test]
fn extension_precedence() {
    let fs = MockFileSystem::new();
    let src = Path::new("views/index.pug");

    let server = options(None, None, CompileMode::Server);
    let client = options(None, None, CompileMode::Client);
    let custom = options(None, Some("xml"), CompileMode::Client);
    let stripped = options(None, Some(""), CompileMode::Client);

    assert_eq!(map_output(&fs, src, None, &server), PathBuf::from("views/index.html"));
    assert_eq!(map_output(&fs, src, None, &client), PathBuf::from("views/index.js"));
    assert_eq!(map_output(&fs, src, None, &custom), PathBuf::from("views/index.xml"));
    assert_eq!(map_output(&fs, src, None, &stripped), PathBuf::from("views/index"));
    assert_eq!(
        map_output(&fs, Path::new("old/page.jade"), None, &server),
        PathBuf::from("old/page.html")
    );
}

#[test]
fn root_outside_source_falls_back_to_basename() {
    let fs = MockFileSystem::new();
    let opts = options(Some("out"), None, CompileMode::Server);

    assert_eq!(
        map_output(&fs, Path::new("a/b/page.pug"), Some(Path::new("zzz")), &opts),
        PathBuf::from("out/page.html")
    );
    assert_eq!(
        map_output(&fs, Path::new("./a/b/page.pug"), Some(Path::new("a")), &opts),
        PathBuf::from("out/b/page.html")
    );
}

proptest! {
    #[test]
    fn mapping_is_deterministic_and_preserves_structure(
        dirs in proptest::collection::vec(segment(), 0..4),
        stem in segment(),
        jade in any::<bool>(),
        client in any::<bool>(),
    ) {
        let fs = MockFileSystem::new();
        let ext = if jade { "jade" } else { "pug" };
        let mode = if client { CompileMode::Client } else { CompileMode::Server };
        let out_ext = if client { "js" } else { "html" };

        let mut rel = PathBuf::new();
        for d in &dirs {
            rel.push(d);
        }
        let source = Path::new("src").join(&rel).join(format!("{stem}.{ext}"));
        let root = Path::new("src");

        let relocated = options(Some("out"), None, mode);
        let first = map_output(&fs, &source, Some(root), &relocated);
        let second = map_output(&fs, &source, Some(root), &relocated);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first, Path::new("out").join(&rel).join(format!("{stem}.{out_ext}")));

        let flattened = map_output(&fs, &source, None, &relocated);
        prop_assert_eq!(flattened, Path::new("out").join(format!("{stem}.{out_ext}")));

        let in_place = map_output(&fs, &source, Some(root), &options(None, None, mode));
        prop_assert_eq!(in_place, source.with_extension(out_ext));
    }
}

#[test]
fn extension_is_taken_literally() {
    let fs = MockFileSystem::new();
    let opts = options(None, Some("$0x"), CompileMode::Server);

    assert_eq!(
        map_output(&fs, Path::new("a/page.pug"), None, &opts),
        PathBuf::from("a/page.$0x")
    );
}
