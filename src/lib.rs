// src/lib.rs

pub mod cli;
pub mod compiler;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod render;
pub mod types;
pub mod watch;

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::compiler::{IncludeCompiler, TemplateCompiler, template_name_from_file};
use crate::config::{RenderConfig, load_and_validate};
use crate::engine::{RenderEvent, RenderSession, RunOutcome, Runtime};
use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};
use crate::watch::NotifyBackend;

/// Exit status after an interrupt in watch mode.
pub const INTERRUPTED_EXIT_CODE: i32 = 1;

/// High-level entry point used by `main.rs`. Returns the process exit code.
///
/// This wires together:
/// - config resolution (CLI flags over the `--obj` options object)
/// - standard input mode when no paths are given
/// - the initial render pass
/// - (optional) watch subscriptions, the event loop and Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<i32> {
    let config = load_and_validate(&args)?;
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let compiler: Arc<dyn TemplateCompiler> = Arc::new(IncludeCompiler::new());

    if args.paths.is_empty() {
        render_stdin(&config, &*fs, &*compiler).await?;
        return Ok(0);
    }

    let (event_tx, event_rx) = mpsc::unbounded_channel::<RenderEvent>();
    let backend = NotifyBackend::new(event_tx.clone());
    let mut session = RenderSession::new(config, fs, compiler, backend);

    session.initial_pass(&args.paths)?;

    if !session.config().watch {
        debug!("initial pass complete; not watching");
        return Ok(0);
    }

    // Ctrl-C stops the loop; the process then exits non-zero.
    {
        let tx = event_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RenderEvent::ShutdownRequested);
        });
    }

    info!(
        watched = session.registry().len(),
        "initial render complete"
    );

    let mut runtime = Runtime::new(session, event_rx);
    match runtime.run().await {
        RunOutcome::Interrupted => Ok(INTERRUPTED_EXIT_CODE),
        RunOutcome::Closed => Ok(0),
    }
}

/// Compile a template read from standard input and write the result to
/// standard output.
///
/// In client mode the compiled function source is written.
async fn render_stdin(
    config: &RenderConfig,
    fs: &dyn FileSystem,
    compiler: &dyn TemplateCompiler,
) -> Result<()> {
    let mut source = String::new();
    tokio::io::stdin().read_to_string(&mut source).await?;

    let mut options = config.compile.clone();
    if config.name_after_file && options.template_name.is_none() {
        if let Some(filename) = &options.filename {
            options.template_name = Some(template_name_from_file(filename));
        }
    }

    let artifact = compiler.compile_source(fs, &source, &options)?;
    let output = match config.line_ending {
        Some(ending) => ending.apply(&artifact.output),
        None => artifact.output,
    };

    let mut stdout = tokio::io::stdout();
    stdout.write_all(output.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}
