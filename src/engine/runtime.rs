// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::watch::WatchBackend;

use super::RenderEvent;
use super::session::RenderSession;

/// Why [`Runtime::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every event sender was dropped.
    Closed,
    /// A [`RenderEvent::ShutdownRequested`] was received.
    Interrupted,
}

/// Drives a [`RenderSession`] in response to [`RenderEvent`]s.
///
/// Events are handled strictly one at a time in arrival order; each render
/// blocks the loop until it finishes.
pub struct Runtime<W: WatchBackend> {
    session: RenderSession<W>,
    event_rx: mpsc::UnboundedReceiver<RenderEvent>,
}

impl<W: WatchBackend> fmt::Debug for Runtime<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime").finish_non_exhaustive()
    }
}

impl<W: WatchBackend> Runtime<W> {
    pub fn new(session: RenderSession<W>, event_rx: mpsc::UnboundedReceiver<RenderEvent>) -> Self {
        Self { session, event_rx }
    }

    pub fn session(&self) -> &RenderSession<W> {
        &self.session
    }

    pub fn into_session(self) -> RenderSession<W> {
        self.session
    }

    /// Main event loop.
    pub async fn run(&mut self) -> RunOutcome {
        info!("watching for changes (Ctrl-C to stop)");

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("event channel closed; exiting");
                    return RunOutcome::Closed;
                }
            };

            debug!(?event, "runtime received event");

            match event {
                RenderEvent::ContentChanged(path) => self.session.handle_change(&path),
                RenderEvent::FileArrived(path) => self.session.handle_arrival(&path),
                RenderEvent::ShutdownRequested => {
                    info!("interrupted; stopping");
                    return RunOutcome::Interrupted;
                }
            }
        }
    }
}
