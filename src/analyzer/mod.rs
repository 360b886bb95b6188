//! Per-fragment analyzer abstraction
//!
//! The analyzer is a black box that inspects one fragment and reports whether
//! it writes to a tracked variable. [`ExternalAnalyzer`] runs the real tool as
//! a child process; [`AnalyzerInvoker`] fans invocations out over a bounded
//! number of concurrent workers.

mod external;
mod invoker;

pub use external::{AnalyzerPayload, ExternalAnalyzer};
pub use invoker::{AnalysisResults, AnalyzerInvoker};

use crate::error::{AnalyzerFailure, DecodeError, ToolInvocationError};
use async_trait::async_trait;
use std::path::Path;

/// Result of analyzing a single fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyzerOutcome {
    /// The analyzer produced a verdict. `line` is the source text of the
    /// racy access when one was reported.
    Analyzed { has_write: bool, line: Option<String> },

    Failed(AnalyzerFailure),
}

impl AnalyzerOutcome {
    /// Write flag of the verdict. A failed invocation never reports a write.
    pub fn has_write(&self) -> bool {
        match self {
            AnalyzerOutcome::Analyzed { has_write, .. } => *has_write,
            AnalyzerOutcome::Failed(_) => false,
        }
    }

    pub fn line(&self) -> Option<&str> {
        match self {
            AnalyzerOutcome::Analyzed { line, .. } => line.as_deref(),
            AnalyzerOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&AnalyzerFailure> {
        match self {
            AnalyzerOutcome::Failed(err) => Some(err),
            AnalyzerOutcome::Analyzed { .. } => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, AnalyzerOutcome::Failed(_))
    }
}

impl From<AnalyzerFailure> for AnalyzerOutcome {
    fn from(err: AnalyzerFailure) -> Self {
        AnalyzerOutcome::Failed(err)
    }
}

impl From<ToolInvocationError> for AnalyzerOutcome {
    fn from(err: ToolInvocationError) -> Self {
        AnalyzerOutcome::Failed(err.into())
    }
}

impl From<DecodeError> for AnalyzerOutcome {
    fn from(err: DecodeError) -> Self {
        AnalyzerOutcome::Failed(err.into())
    }
}

/// Something that can produce an [`AnalyzerOutcome`] for a fragment path.
///
/// Implementations must not fail as a whole: every problem is folded into
/// `AnalyzerOutcome::Failed` for that path.
#[async_trait]
pub trait FragmentAnalyzer: Send + Sync {
    async fn analyze(&self, path: &Path) -> AnalyzerOutcome;

    /// Human-readable name used in logs
    fn name(&self) -> &str;
}
