//! CLI definitions for the `layered-conf` host binary.
//!
//! The binary resolves and loads configuration the same way a host program
//! would, then prints the merged document.

use crate::config::{Behavior, Behaviors, Loader, PreservedArgs, SkippedPath};
use crate::error::{ErrorCode, LoadError, LoadResult};
use crate::logging::LogTarget;
use clap::{Parser, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Output format for the merged document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Single-line JSON
    Json,
    /// Indented JSON (default)
    #[default]
    Pretty,
}

/// Layered JSON configuration loader
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root directory for config lookup (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Loader behavior, repeatable (e.g. use-dot-user, ignore-missing-files)
    #[arg(short, long = "behavior")]
    pub behaviors: Vec<Behavior>,

    /// Take config paths from raw arguments after skipping this many
    /// (instead of the positional PATHS)
    #[arg(long)]
    pub preserve: Option<usize>,

    /// Only print the resolved lookup paths
    #[arg(long)]
    pub paths_only: bool,

    /// Print a JSON report (behaviors, loaded, skipped, error, config)
    /// instead of only the merged document
    #[arg(long)]
    pub report: bool,

    /// Output format for the merged document
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2")]
    pub log: LogTarget,

    /// Explicit config files (used with use-argument-paths)
    pub paths: Vec<String>,
}

impl Cli {
    pub fn behavior_set(&self) -> Behaviors {
        self.behaviors.iter().copied().collect()
    }

    pub fn preserved_args(&self) -> PreservedArgs {
        match self.preserve {
            Some(count) => PreservedArgs::Count(count),
            None => PreservedArgs::Positional,
        }
    }

    /// Build the loader these arguments describe.
    pub fn loader(&self) -> LoadResult<Loader> {
        let mut loader = Loader::new(self.behavior_set())?;
        if let Some(ref root) = self.root {
            loader.root_path = root.clone();
        }
        loader.preserved_args = self.preserved_args();
        loader.positional_args = self.paths.clone();
        Ok(loader)
    }
}

/// Error details included in a [`LoadReport`].
#[derive(Debug, Serialize)]
pub struct ReportedError<'a> {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<&'a Path>,
}

impl<'a> From<&'a LoadError> for ReportedError<'a> {
    fn from(err: &'a LoadError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            path: err.path(),
        }
    }
}

/// Outcome of one load, printed with `--report`.
#[derive(Debug, Serialize)]
pub struct LoadReport<'a> {
    pub behaviors: &'a Behaviors,
    pub loaded: &'a [PathBuf],
    pub skipped: &'a [SkippedPath],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ReportedError<'a>>,
    pub config: &'a Value,
}

impl<'a> LoadReport<'a> {
    pub fn new(loader: &'a Loader, config: &'a Value, error: Option<&'a LoadError>) -> Self {
        Self {
            behaviors: loader.behaviors(),
            loaded: loader.loaded_paths(),
            skipped: loader.skipped(),
            error: error.map(ReportedError::from),
            config,
        }
    }
}
