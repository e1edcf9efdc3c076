// src/engine/mod.rs

//! Render-and-watch engine.
//!
//! - [`session`] holds the synchronous core: the directory walker, the
//!   render invoker and the reaction to watch events. It owns the watch
//!   registry and the watch backend, so no state is shared or locked.
//! - [`runtime`] is the async shell that feeds events from the watch
//!   subscriptions (and Ctrl-C) into the session one at a time.

use std::path::PathBuf;

pub mod runtime;
pub mod session;

pub use runtime::{RunOutcome, Runtime};
pub use session::RenderSession;

/// Events flowing into the runtime from the watch subscriptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    /// A path's content changed (content subscription).
    ContentChanged(PathBuf),
    /// A file appeared under a watched command-line path (arrival
    /// subscription).
    FileArrived(PathBuf),
    /// Interrupt received; stop listening.
    ShutdownRequested,
}
