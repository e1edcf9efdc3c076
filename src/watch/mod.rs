// src/watch/mod.rs

//! Reverse-dependency watching.
//!
//! This module is responsible for:
//! - The flat registry mapping a watched path to the root templates that
//!   must be re-rendered when it changes ([`registry`]).
//! - The two filesystem subscriptions, content changes and new-file
//!   arrivals, behind the [`WatchBackend`] seam ([`watcher`]).
//! - Optional content hashing to drop change events that did not change
//!   anything ([`hash`]).
//!
//! It does **not** render anything; the engine turns events into renders.

pub mod hash;
pub mod registry;
pub mod watcher;

pub use hash::{ContentHashes, compute_file_hash};
pub use registry::{Registration, WatchRegistry};
pub use watcher::{NotifyBackend, Subscription, WatchBackend, events_for};
