// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error")]
    IoError(#[from] std::io::Error),

    #[error("Failed to compile {}: {message}", path.display())]
    CompileError { path: PathBuf, message: String },

    #[error("Invalid options object: {0}")]
    OptionsError(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RenderError {
    pub fn compile(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        RenderError::CompileError {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, RenderError>;
