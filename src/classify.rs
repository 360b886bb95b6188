//! Textual race classification
//!
//! The classifier only looks at fragment text. Its verdict is never
//! reconciled with the analyzer's `has_write` flag; the report carries both.

use crate::corpus::Case;
use crate::validation::TrackedPattern;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RaceClassification {
    WriteWrite,
    ReadWrite,
}

impl RaceClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            RaceClassification::WriteWrite => "write-write",
            RaceClassification::ReadWrite => "read-write",
        }
    }
}

impl fmt::Display for RaceClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct RaceClassifier {
    pattern: TrackedPattern,
}

impl RaceClassifier {
    pub fn new(pattern: TrackedPattern) -> Self {
        Self { pattern }
    }

    /// `WriteWrite` iff both texts assign to a tracked variable
    pub fn classify_texts(&self, first: &str, second: &str) -> RaceClassification {
        if self.pattern.is_assigned(first) && self.pattern.is_assigned(second) {
            RaceClassification::WriteWrite
        } else {
            RaceClassification::ReadWrite
        }
    }

    pub fn classify(&self, case: &Case) -> RaceClassification {
        self.classify_texts(&case.first.content, &case.second.content)
    }
}

impl Default for RaceClassifier {
    fn default() -> Self {
        Self::new(TrackedPattern::default())
    }
}
