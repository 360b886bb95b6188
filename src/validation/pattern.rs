use crate::corpus::Case;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Matchers for the tracked-variable naming convention: a fixed identifier
/// prefix followed by a numeric suffix (`racyVar0`, `racyVar12`, ...).
#[derive(Debug, Clone)]
pub struct TrackedPattern {
    prefix: String,
    reference: Regex,
    assignment: Regex,
}

impl TrackedPattern {
    pub fn new(prefix: &str) -> Result<Self, regex::Error> {
        let escaped = regex::escape(prefix);
        let reference = Regex::new(&format!(r"\b{}\d+", escaped))?;
        // `=` not followed by another `=`, so comparisons are ignored
        let assignment = Regex::new(&format!(r"\b{}\d+\s*=(?:[^=]|$)", escaped))?;
        Ok(Self {
            prefix: prefix.to_string(),
            reference,
            assignment,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether `content` mentions any tracked variable
    pub fn is_referenced(&self, content: &str) -> bool {
        self.reference.is_match(content)
    }

    /// Whether `content` assigns to any tracked variable
    pub fn is_assigned(&self, content: &str) -> bool {
        self.assignment.is_match(content)
    }
}

impl Default for TrackedPattern {
    fn default() -> Self {
        Self::new("racyVar").expect("default prefix is a valid pattern")
    }
}

/// A case with at least one fragment that never mentions a tracked variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternIssue {
    pub case_id: String,
    pub dir: PathBuf,
    pub prefix: String,
    pub missing: Vec<String>,
}

impl fmt::Display for PatternIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "In directory {}, files missing {} pattern: {}",
            self.dir.display(),
            self.prefix,
            self.missing.join(", ")
        )
    }
}

/// Advisory result of pattern validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatternReport {
    pub cases_checked: usize,
    pub issues: Vec<PatternIssue>,
}

impl PatternReport {
    pub fn cases_with_issues(&self) -> usize {
        self.issues.len()
    }
}

/// Checks that every fragment of every case references a tracked variable.
///
/// Findings are advisory: nothing is excluded from analysis.
pub struct PatternValidator {
    pattern: TrackedPattern,
}

impl PatternValidator {
    pub fn new(pattern: TrackedPattern) -> Self {
        Self { pattern }
    }

    pub fn validate(&self, cases: &[Case]) -> PatternReport {
        let mut report = PatternReport::default();

        for case in cases {
            report.cases_checked += 1;

            let missing: Vec<String> = case
                .fragments()
                .iter()
                .filter(|f| !self.pattern.is_referenced(&f.content))
                .map(|f| f.name.clone())
                .collect();

            if missing.is_empty() {
                debug!(case = %case.id, "Tracked pattern present in both fragments");
                continue;
            }

            let issue = PatternIssue {
                case_id: case.id.clone(),
                dir: case.dir.clone(),
                prefix: self.pattern.prefix().to_string(),
                missing,
            };
            warn!("{}", issue);
            report.issues.push(issue);
        }

        report
    }
}
