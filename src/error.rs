//! Error taxonomy for skeleton verification
//!
//! Only [`DiscoveryError`] aborts a run. Every other error type here is
//! carried as data: structural problems exclude a case, tool failures are
//! stored on the fragment's [`AnalyzerOutcome`](crate::analyzer::AnalyzerOutcome)
//! or in the normalization counters.

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// The corpus root could not be enumerated
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Root directory does not exist: {0}")]
    NotFound(PathBuf),

    #[error("Root path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to read root directory {path}: {source}")]
    Unreadable { path: PathBuf, source: io::Error },
}

/// A case directory that does not hold exactly two fragments
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize)]
#[error("Directory {dir} has {found} .{extension} files, expected exactly 2")]
pub struct StructuralError {
    pub case_id: String,
    pub dir: PathBuf,
    pub found: usize,
    pub extension: String,
}

/// An external tool could not produce a usable verdict for one fragment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolInvocationError {
    #[error("Failed to spawn {program}: {message}")]
    Spawn { program: String, message: String },

    /// Non-zero exit. `stderr` is the tool's diagnostic text, trimmed.
    #[error("{}", exit_message(.code, .stderr))]
    NonZeroExit { code: Option<i32>, stderr: String },

    #[error("Analyzer timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The tool exited cleanly but reported an error in its payload
    #[error("{0}")]
    Reported(String),
}

fn exit_message(code: &Option<i32>, stderr: &str) -> String {
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    match code {
        Some(code) => format!("Analyzer exited with status {}", code),
        None => "Analyzer terminated by signal".to_string(),
    }
}

/// The analyzer's stdout was not the expected JSON payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to parse analyzer output: {0}")]
pub struct DecodeError(pub String);

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError(err.to_string())
    }
}

/// Failure half of an analyzer outcome
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyzerFailure {
    #[error(transparent)]
    Invocation(#[from] ToolInvocationError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Fatal pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error("Failed to write {path}: {source}")]
    Output { path: PathBuf, source: io::Error },

    #[error("Failed to write report {path}: {source}")]
    Report { path: PathBuf, source: csv::Error },

    #[error("Invalid tracked-variable prefix: {0}")]
    Pattern(#[from] regex::Error),
}
