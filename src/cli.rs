// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, ValueEnum};

use crate::types::LineEnding;

/// Command-line arguments for `rendwatch`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "rendwatch",
    version,
    about = "Render template files (or compile them for the client) and keep them fresh.",
    long_about = None,
    group(ArgGroup::new("line_ending").args(["lf", "crlf", "cr"]).multiple(false))
)]
pub struct CliArgs {
    /// Files or directories to render. Reads standard input when omitted.
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// JSON/expression options object, or a path to a file containing one.
    #[arg(short = 'O', long = "obj", value_name = "STR|PATH")]
    pub obj: Option<String>,

    /// Write rendered HTML or compiled JavaScript to this directory.
    #[arg(short = 'o', long = "out", value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Filename used to resolve includes (mainly for standard input).
    #[arg(short = 'p', long = "path", value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Root directory used to resolve absolute includes.
    #[arg(short = 'b', long = "basedir", value_name = "PATH")]
    pub basedir: Option<PathBuf>,

    /// Compile pretty output.
    #[arg(short = 'P', long)]
    pub pretty: bool,

    /// Compile a function for client-side use.
    #[arg(short = 'c', long)]
    pub client: bool,

    /// Name of the compiled template function (client mode).
    #[arg(short = 'n', long = "template-name", alias = "name", value_name = "STR")]
    pub template_name: Option<String>,

    /// Compile without debugging information.
    #[arg(short = 'D', long = "no-debug")]
    pub no_debug: bool,

    /// Watch files for changes and re-render automatically.
    #[arg(short = 'w', long)]
    pub watch: bool,

    /// Output file extension (empty string strips the extension).
    #[arg(short = 'E', long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Do not print informational logs; errors are still printed.
    #[arg(short = 's', long)]
    pub silent: bool,

    /// Convert line endings to LF.
    #[arg(long)]
    pub lf: bool,

    /// Convert line endings to CRLF.
    #[arg(long)]
    pub crlf: bool,

    /// Convert line endings to CR.
    #[arg(long)]
    pub cr: bool,

    /// With --watch: discover and watch on startup but do not write output.
    #[arg(long)]
    pub soft_start: bool,

    /// Only ignore files (not directories) whose name starts with `_`.
    #[arg(long)]
    pub ignore_only_files: bool,

    /// Name the template after its file (client mode; --name wins).
    #[arg(long)]
    pub name_after_file: bool,

    /// Doctype to use when the template does not declare one.
    #[arg(long, value_name = "STR")]
    pub doctype: Option<String>,

    /// Extra glob of files to ignore (repeatable).
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// With --watch: skip re-renders when a changed file's content hash is unchanged.
    #[arg(long)]
    pub skip_unchanged: bool,

    /// Print the files that would be rendered and their outputs, then exit.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `RENDWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

impl CliArgs {
    /// The line ending selected by `--lf`, `--crlf` or `--cr`, if any.
    pub fn line_ending(&self) -> Option<LineEnding> {
        if self.lf {
            Some(LineEnding::Lf)
        } else if self.crlf {
            Some(LineEnding::Crlf)
        } else if self.cr {
            Some(LineEnding::Cr)
        } else {
            None
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
