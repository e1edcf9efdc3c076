// tests/runtime_events.rs

use rendwatch_test_utils::builders::{RenderConfigBuilder, session_with};
use rendwatch_test_utils::{init_tracing, with_timeout};

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use rendwatch::engine::{RenderEvent, RunOutcome, Runtime};
use rendwatch::fs::mock::MockFileSystem;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn events_are_handled_in_order_until_shutdown() -> TestResult {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_file("site/page.pug", "include ../parts/head\np page");
    fs.add_file("parts/head.pug", "p head");
    let config = RenderConfigBuilder::new().watch().build();
    let (mut session, _backend) = session_with(config, Arc::new(fs.clone()));
    session.initial_pass(&[PathBuf::from("site")])?;
    assert_eq!(fs.writes().len(), 1);

    let (tx, rx) = mpsc::unbounded_channel();
    let mut runtime = Runtime::new(session, rx);

    fs.add_file("parts/head.pug", "p new head");
    tx.send(RenderEvent::ContentChanged(PathBuf::from("parts/head.pug")))?;
    tx.send(RenderEvent::ShutdownRequested)?;
    // Never reached: the loop stops at the shutdown request.
    tx.send(RenderEvent::ContentChanged(PathBuf::from("parts/head.pug")))?;

    let outcome = with_timeout(runtime.run()).await;

    assert_eq!(outcome, RunOutcome::Interrupted);
    assert_eq!(fs.writes().len(), 2);
    assert_eq!(
        fs.contents("site/page.html").as_deref(),
        Some("p new head\np page")
    );
    Ok(())
}

#[tokio::test]
async fn arrivals_render_new_files_under_watched_dirs() -> TestResult {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_dir("site");
    let config = RenderConfigBuilder::new().watch().out_dir("dist").build();
    let (mut session, backend) = session_with(config, Arc::new(fs.clone()));
    session.initial_pass(&[PathBuf::from("site")])?;
    assert_eq!(backend.arrivals(), vec![PathBuf::from("site")]);

    let (tx, rx) = mpsc::unbounded_channel();
    let mut runtime = Runtime::new(session, rx);

    fs.add_file("site/blog/post.pug", "p post");
    tx.send(RenderEvent::FileArrived(PathBuf::from("site/blog/post.pug")))?;
    drop(tx);

    let outcome = with_timeout(runtime.run()).await;

    assert_eq!(outcome, RunOutcome::Closed);
    assert_eq!(fs.contents("dist/blog/post.html").as_deref(), Some("p post"));
    assert!(
        runtime
            .session()
            .registry()
            .contains(std::path::Path::new("site/blog/post.pug"))
    );
    Ok(())
}

#[tokio::test]
async fn closed_channel_ends_the_loop() {
    let fs = MockFileSystem::new();
    let config = RenderConfigBuilder::new().watch().build();
    let (session, _backend) = session_with(config, Arc::new(fs));

    let (tx, rx) = mpsc::unbounded_channel::<RenderEvent>();
    drop(tx);
    let mut runtime = Runtime::new(session, rx);

    assert_eq!(with_timeout(runtime.run()).await, RunOutcome::Closed);
    assert!(runtime.into_session().registry().is_empty());
}
