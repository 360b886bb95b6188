use super::{AnalyzerOutcome, FragmentAnalyzer};
use crate::error::{DecodeError, ToolInvocationError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, warn};

/// JSON document the analyzer prints on stdout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerPayload {
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub has_write: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalyzerPayload {
    /// Decodes the analyzer's stdout
    pub fn parse(stdout: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(stdout.trim())?)
    }

    pub fn into_outcome(self) -> AnalyzerOutcome {
        match self.error {
            Some(message) if !message.trim().is_empty() => {
                ToolInvocationError::Reported(message.trim().to_string()).into()
            }
            _ => AnalyzerOutcome::Analyzed {
                has_write: self.has_write,
                line: self.line_content.filter(|l| !l.is_empty()),
            },
        }
    }
}

/// Runs the analyzer binary once per fragment as
/// `<program> [leading args..] -i <path> [-debug]`
#[derive(Debug, Clone)]
pub struct ExternalAnalyzer {
    program: PathBuf,
    leading_args: Vec<String>,
    debug: bool,
    timeout: Duration,
}

impl ExternalAnalyzer {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            debug: false,
            timeout,
        }
    }

    /// Arguments placed before `-i`, e.g. a script path when `program` is
    /// an interpreter
    pub fn with_leading_args(mut self, args: Vec<String>) -> Self {
        self.leading_args = args;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    fn command(&self, path: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.leading_args).arg("-i").arg(path);
        if self.debug {
            cmd.arg("-debug");
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    async fn run(&self, path: &Path) -> Result<AnalyzerOutcome, ToolInvocationError> {
        let child = self
            .command(path)
            .spawn()
            .map_err(|e| ToolInvocationError::Spawn {
                program: self.program.display().to_string(),
                message: e.to_string(),
            })?;

        // dropping the wait future on timeout kills the child
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(ToolInvocationError::Spawn {
                    program: self.program.display().to_string(),
                    message: e.to_string(),
                })
            }
            Err(_) => return Err(ToolInvocationError::Timeout(self.timeout)),
        };

        if !output.status.success() {
            return Err(ToolInvocationError::NonZeroExit {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(match AnalyzerPayload::parse(&stdout) {
            Ok(payload) => {
                debug!(
                    path = %path.display(),
                    has_write = payload.has_write,
                    line_number = ?payload.line_number,
                    "Analyzer verdict"
                );
                payload.into_outcome()
            }
            Err(e) => e.into(),
        })
    }
}

#[async_trait]
impl FragmentAnalyzer for ExternalAnalyzer {
    async fn analyze(&self, path: &Path) -> AnalyzerOutcome {
        let start = Instant::now();
        let outcome = match self.run(path).await {
            Ok(outcome) => outcome,
            Err(e) => e.into(),
        };

        if let Some(err) = outcome.error() {
            warn!(
                path = %path.display(),
                elapsed_ms = start.elapsed().as_millis(),
                error = %err,
                "Analyzer failed"
            );
        }
        outcome
    }

    fn name(&self) -> &str {
        "external"
    }
}
