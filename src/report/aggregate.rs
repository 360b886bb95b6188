use crate::analyzer::{AnalysisResults, AnalyzerOutcome};
use crate::classify::{RaceClassification, RaceClassifier};
use crate::corpus::{Case, Fragment, FragmentStats};
use serde::Serialize;

/// Status of a fragment the analyzer never reported on
pub const STATUS_NOT_FOUND: &str = "NOT_FOUND";

/// Status of a fragment whose analysis failed
pub const STATUS_ERROR: &str = "ERROR";

/// CSV header, in column order
pub const REPORT_COLUMNS: [&str; 19] = [
    "case_id",
    "file1_name",
    "file1_status",
    "file1_line",
    "file1_error",
    "file2_name",
    "file2_status",
    "file2_line",
    "file2_error",
    "has_write",
    "race_type",
    "file1_size",
    "file2_size",
    "file1_line_count",
    "file2_line_count",
    "file1_has_package",
    "file2_has_package",
    "file1_has_comments",
    "file2_has_comments",
];

fn flag(value: bool) -> &'static str {
    if value {
        "TRUE"
    } else {
        "FALSE"
    }
}

/// One fragment's half of a report row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FragmentReport {
    pub name: String,
    pub status: String,
    pub line: String,
    pub error: String,
    pub has_write: bool,
    pub stats: FragmentStats,
}

impl FragmentReport {
    pub fn new(fragment: &Fragment, outcome: Option<&AnalyzerOutcome>) -> Self {
        let (status, line, error) = match outcome {
            None => (STATUS_NOT_FOUND.to_string(), String::new(), String::new()),
            Some(AnalyzerOutcome::Failed(err)) => {
                (STATUS_ERROR.to_string(), String::new(), err.to_string())
            }
            Some(AnalyzerOutcome::Analyzed { has_write, line }) => (
                flag(*has_write).to_string(),
                line.clone().unwrap_or_default(),
                String::new(),
            ),
        };

        Self {
            name: fragment.name.clone(),
            status,
            line,
            error,
            has_write: outcome.map(AnalyzerOutcome::has_write).unwrap_or(false),
            stats: fragment.stats.clone(),
        }
    }
}

/// Joined record for one valid case
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseReport {
    pub case_id: String,
    pub first: FragmentReport,
    pub second: FragmentReport,
    pub has_write: bool,
    pub race_type: RaceClassification,
}

impl CaseReport {
    pub fn new(case: &Case, results: &AnalysisResults, race_type: RaceClassification) -> Self {
        let first = FragmentReport::new(&case.first, results.get(&case.first.path));
        let second = FragmentReport::new(&case.second, results.get(&case.second.path));
        Self {
            case_id: case.id.clone(),
            has_write: first.has_write || second.has_write,
            first,
            second,
            race_type,
        }
    }

    /// Whether either side is missing or failed
    pub fn has_failures(&self) -> bool {
        [&self.first, &self.second]
            .iter()
            .any(|f| f.status == STATUS_ERROR || f.status == STATUS_NOT_FOUND)
    }

    /// Row cells in [`REPORT_COLUMNS`] order
    pub fn to_record(&self) -> [String; 19] {
        let (a, b) = (&self.first, &self.second);
        [
            self.case_id.clone(),
            a.name.clone(),
            a.status.clone(),
            a.line.clone(),
            a.error.clone(),
            b.name.clone(),
            b.status.clone(),
            b.line.clone(),
            b.error.clone(),
            flag(self.has_write).to_string(),
            self.race_type.to_string(),
            a.stats.size.to_string(),
            b.stats.size.to_string(),
            a.stats.line_count.to_string(),
            b.stats.line_count.to_string(),
            flag(a.stats.has_package).to_string(),
            flag(b.stats.has_package).to_string(),
            flag(a.stats.has_comments).to_string(),
            flag(b.stats.has_comments).to_string(),
        ]
    }
}

/// Joins cases, analyzer outcomes and textual classification into rows
pub struct ReportAggregator {
    classifier: RaceClassifier,
}

impl ReportAggregator {
    pub fn new(classifier: RaceClassifier) -> Self {
        Self { classifier }
    }

    /// One report per case, in the order the cases are given
    pub fn aggregate(&self, cases: &[Case], results: &AnalysisResults) -> Vec<CaseReport> {
        cases
            .iter()
            .map(|case| CaseReport::new(case, results, self.classifier.classify(case)))
            .collect()
    }
}
