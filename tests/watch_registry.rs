// tests/watch_registry.rs

use rendwatch_test_utils::builders::{RenderConfigBuilder, session_with};
use rendwatch_test_utils::{capture_logs, init_tracing};

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rendwatch::fs::FileSystem;
use rendwatch::fs::mock::MockFileSystem;
use rendwatch::render::RenderTask;
use rendwatch::watch::{Registration, WatchRegistry};

type TestResult = Result<(), Box<dyn Error>>;

/// `templates/foo.pug` includes a partial that lives outside the walked tree.
fn include_scenario() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_file("templates/foo.pug", "include ../includes/bar.pug\np hello");
    fs.add_file("includes/bar.pug", "p bar");
    fs
}

#[test]
fn registering_the_same_pair_twice_is_a_no_op() {
    let mut registry = WatchRegistry::new();
    let task = RenderTask::new("templates/foo.pug", Some(PathBuf::from("templates")));

    let first = registry.register(
        PathBuf::from("/abs/bar.pug"),
        PathBuf::from("/abs/foo.pug"),
        task.clone(),
    );
    let second = registry.register(
        PathBuf::from("/abs/bar.pug"),
        PathBuf::from("/abs/foo.pug"),
        task.clone(),
    );

    assert_eq!(first, Registration::NewPath);
    assert_eq!(second, Registration::Duplicate);
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.dependents(Path::new("/abs/bar.pug")), vec![task]);
}

#[test]
fn second_dependent_extends_existing_entry() {
    let mut registry = WatchRegistry::new();
    let foo = RenderTask::top_level("foo.pug");
    let baz = RenderTask::top_level("baz.pug");

    registry.register(PathBuf::from("/p/bar.pug"), PathBuf::from("/p/foo.pug"), foo.clone());
    let added = registry.register(PathBuf::from("/p/bar.pug"), PathBuf::from("/p/baz.pug"), baz.clone());

    assert_eq!(added, Registration::NewDependent);
    assert_eq!(registry.dependents(Path::new("/p/bar.pug")), vec![foo, baz]);
    assert!(registry.dependents(Path::new("/p/unknown.pug")).is_empty());
}

#[test]
fn dependency_edit_re_renders_the_including_template() -> TestResult {
    init_tracing();

    let fs = include_scenario();
    let config = RenderConfigBuilder::new().watch().build();
    let (mut session, backend) = session_with(config, Arc::new(fs.clone()));

    session.initial_pass(&[PathBuf::from("templates")])?;

    assert_eq!(fs.contents("templates/foo.html").as_deref(), Some("p bar\np hello"));

    let registry = session.registry();
    assert_eq!(
        registry.dependents(Path::new("templates/foo.pug")),
        vec![RenderTask::new("templates/foo.pug", Some(PathBuf::from("templates")))]
    );
    assert_eq!(
        registry.dependents(Path::new("includes/bar.pug")),
        vec![RenderTask::new("templates/foo.pug", Some(PathBuf::from("templates")))]
    );
    assert_eq!(
        backend.content(),
        vec![PathBuf::from("templates/foo.pug"), PathBuf::from("includes/bar.pug")]
    );
    assert_eq!(backend.arrivals(), vec![PathBuf::from("templates")]);

    fs.add_file("includes/bar.pug", "p BAR");
    session.handle_change(Path::new("includes/bar.pug"));

    assert_eq!(fs.contents("templates/foo.html").as_deref(), Some("p BAR\np hello"));
    assert!(!fs.exists(Path::new("includes/bar.html")));
    Ok(())
}

#[test]
fn change_re_renders_every_distinct_root_and_no_others() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("site/a.pug", "include ../partials/shared.pug");
    fs.add_file("site/b.pug", "include ../partials/shared.pug\np b");
    fs.add_file("site/c.pug", "p c");
    fs.add_file("partials/shared.pug", "p shared");

    let config = RenderConfigBuilder::new().watch().build();
    let (mut session, backend) = session_with(config, Arc::new(fs.clone()));
    session.initial_pass(&[PathBuf::from("site")])?;

    let before = fs.writes().len();
    assert_eq!(before, 3);

    session.handle_change(Path::new("partials/shared.pug"));
    assert_eq!(
        fs.writes()[before..].to_vec(),
        vec![PathBuf::from("site/a.html"), PathBuf::from("site/b.html")]
    );

    // Re-rendering registers nothing new and subscribes nothing twice.
    assert_eq!(backend.content().len(), 4);
    Ok(())
}

#[test]
fn change_on_unregistered_path_is_ignored() -> TestResult {
    let fs = include_scenario();
    let config = RenderConfigBuilder::new().watch().build();
    let (mut session, _backend) = session_with(config, Arc::new(fs.clone()));
    session.initial_pass(&[PathBuf::from("templates")])?;

    let before = fs.writes().len();
    session.handle_change(Path::new("templates/foo.html"));
    session.handle_change(Path::new("nowhere/at/all.pug"));

    assert_eq!(fs.writes().len(), before);
    Ok(())
}

#[test]
fn arrival_of_known_path_is_a_no_op_and_unknown_path_is_rendered() -> TestResult {
    let fs = include_scenario();
    let config = RenderConfigBuilder::new().watch().out_dir("dist").build();
    let (mut session, _backend) = session_with(config, Arc::new(fs.clone()));
    session.initial_pass(&[PathBuf::from("templates")])?;

    let before = fs.writes().len();
    session.handle_arrival(Path::new("templates/foo.pug"));
    assert_eq!(fs.writes().len(), before);

    fs.add_file("templates/nested/new.pug", "p new");
    session.handle_arrival(Path::new("templates/nested/new.pug"));

    assert_eq!(fs.writes().last(), Some(&PathBuf::from("dist/nested/new.html")));
    assert_eq!(
        session.registry().dependents(Path::new("templates/nested/new.pug")),
        vec![RenderTask::new(
            "templates/nested/new.pug",
            Some(PathBuf::from("templates"))
        )]
    );

    // Non-template arrivals (including our own outputs) do nothing.
    fs.add_file("templates/notes.txt", "x");
    let before = fs.writes().len();
    session.handle_arrival(Path::new("templates/notes.txt"));
    assert_eq!(fs.writes().len(), before);
    Ok(())
}

#[test]
fn soft_start_discovers_without_writing_then_writes_on_change() -> TestResult {
    let fs = include_scenario();
    let config = RenderConfigBuilder::new().watch().soft_start().build();
    let (mut session, _backend) = session_with(config, Arc::new(fs.clone()));

    session.initial_pass(&[PathBuf::from("templates")])?;

    assert!(fs.writes().is_empty());
    assert!(session.registry().contains(Path::new("templates/foo.pug")));
    assert!(session.registry().contains(Path::new("includes/bar.pug")));

    session.handle_change(Path::new("includes/bar.pug"));
    assert_eq!(fs.writes(), vec![PathBuf::from("templates/foo.html")]);
    Ok(())
}

#[test]
fn soft_start_is_ignored_without_watch() -> TestResult {
    let fs = include_scenario();
    let config = RenderConfigBuilder::new().soft_start().build();
    let (mut session, _backend) = session_with(config, Arc::new(fs.clone()));

    session.initial_pass(&[PathBuf::from("templates")])?;

    assert_eq!(fs.writes(), vec![PathBuf::from("templates/foo.html")]);
    Ok(())
}

#[test]
fn dependency_inside_walked_tree_is_also_its_own_root() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("templates/foo.pug", "include bar.pug");
    fs.add_file("templates/bar.pug", "p bar");

    let config = RenderConfigBuilder::new().watch().build();
    let (mut session, _backend) = session_with(config, Arc::new(fs.clone()));
    session.initial_pass(&[PathBuf::from("templates")])?;

    let root = Some(PathBuf::from("templates"));
    assert_eq!(
        session.registry().dependents(Path::new("templates/bar.pug")),
        vec![
            RenderTask::new("templates/bar.pug", root.clone()),
            RenderTask::new("templates/foo.pug", root),
        ]
    );

    let before = fs.writes().len();
    session.handle_change(Path::new("templates/bar.pug"));
    assert_eq!(
        fs.writes()[before..].to_vec(),
        vec![PathBuf::from("templates/bar.html"), PathBuf::from("templates/foo.html")]
    );
    Ok(())
}

#[test]
fn paths_lists_every_watched_file_once() {
    let mut registry = WatchRegistry::new();
    let foo = RenderTask::top_level("foo.pug");
    let baz = RenderTask::top_level("baz.pug");

    registry.register(PathBuf::from("/p/foo.pug"), PathBuf::from("/p/foo.pug"), foo.clone());
    registry.register(PathBuf::from("/p/bar.pug"), PathBuf::from("/p/foo.pug"), foo);
    registry.register(PathBuf::from("/p/bar.pug"), PathBuf::from("/p/baz.pug"), baz);

    let mut paths: Vec<&Path> = registry.paths().collect();
    paths.sort();
    assert_eq!(paths, vec![Path::new("/p/bar.pug"), Path::new("/p/foo.pug")]);
    assert!(!registry.is_empty());
}

#[test]
fn duplicate_registration_logs_only_once() {
    let task = RenderTask::top_level("foo.pug");

    let (_, logs) = capture_logs(|| {
        let mut registry = WatchRegistry::new();
        for _ in 0..2 {
            registry.register(
                PathBuf::from("/p/bar.pug"),
                PathBuf::from("/p/foo.pug"),
                task.clone(),
            );
        }
    });

    let lines: Vec<&str> = logs.lines().filter(|l| l.contains("watching")).collect();
    assert_eq!(lines.len(), 1, "logs: {logs}");
    assert!(lines[0].contains("watching /p/bar.pug as a dependency of foo.pug"));
}

#[test]
fn arrival_of_vanished_scratch_file_is_ignored_quietly() -> TestResult {
    let fs = include_scenario();
    let config = RenderConfigBuilder::new().watch().build();
    let (mut session, _backend) = session_with(config, Arc::new(fs.clone()));
    session.initial_pass(&[PathBuf::from("templates")])?;
    let writes = fs.writes().len();
    let watched = session.registry().len();

    let (_, logs) = capture_logs(|| session.handle_arrival(Path::new("templates/4913")));

    assert!(logs.contains("already gone"), "logs: {logs}");
    assert!(!logs.contains("ERROR"));
    assert_eq!(fs.writes().len(), writes);
    assert_eq!(session.registry().len(), watched);
    Ok(())
}
