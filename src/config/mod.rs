// src/config/mod.rs

//! Configuration for rendwatch.
//!
//! Responsibilities:
//! - Define the options-object model and the resolved config (`model.rs`).
//! - Resolve the `--obj` options object from a file or a string (`loader.rs`).
//! - Merge CLI flags over the options object and validate (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, parse_obj};
pub use model::{OptionsObject, RenderConfig};
