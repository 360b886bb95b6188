use super::aggregate::CaseReport;
use crate::analyzer::AnalysisResults;
use crate::classify::RaceClassification;
use crate::corpus::normalize::NormalizeStats;
use crate::corpus::{CombinedFile, Discovery};
use crate::error::StructuralError;
use crate::validation::{PatternIssue, PatternReport};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Process-level counters for one run.
///
/// Each stage returns its own accumulator; they are merged here once, in
/// pipeline order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub root: PathBuf,

    pub normalized: bool,
    pub files_renamed: usize,
    pub files_checked: usize,
    pub package_updates: usize,
    pub parsed_successfully: usize,
    pub parse_errors: usize,
    pub parse_error_details: BTreeMap<PathBuf, String>,
    pub formatter_available: bool,

    pub subdirectories: usize,
    pub files_discovered: usize,
    pub valid_cases: usize,
    pub excluded_cases: Vec<StructuralError>,

    pub cases_with_pattern_issues: usize,
    pub pattern_issues: Vec<PatternIssue>,

    pub combined_fragments: usize,
    /// Fragments left out of the combined file because they could not be read
    pub combined_skipped: usize,

    pub fragments_analyzed: usize,
    pub analyzer_failures: usize,
    pub cases_with_write: usize,
    /// Rows where either fragment is missing or failed
    pub cases_with_failures: usize,
    pub write_write: usize,
    pub read_write: usize,
    pub rows_written: usize,

    pub elapsed_ms: u64,
}

impl RunSummary {
    pub fn new(root: PathBuf, started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            root,
            normalized: false,
            files_renamed: 0,
            files_checked: 0,
            package_updates: 0,
            parsed_successfully: 0,
            parse_errors: 0,
            parse_error_details: BTreeMap::new(),
            formatter_available: false,
            subdirectories: 0,
            files_discovered: 0,
            valid_cases: 0,
            excluded_cases: Vec::new(),
            cases_with_pattern_issues: 0,
            pattern_issues: Vec::new(),
            combined_fragments: 0,
            combined_skipped: 0,
            fragments_analyzed: 0,
            analyzer_failures: 0,
            cases_with_write: 0,
            cases_with_failures: 0,
            write_write: 0,
            read_write: 0,
            rows_written: 0,
            elapsed_ms: 0,
        }
    }

    pub fn record_normalization(&mut self, stats: NormalizeStats) {
        self.normalized = true;
        self.files_renamed = stats.files_renamed;
        self.files_checked = stats.total_files;
        self.package_updates = stats.package_updates;
        self.parsed_successfully = stats.parsed_success;
        self.parse_errors = stats.parse_errors;
        self.parse_error_details = stats.parse_error_details;
        self.formatter_available = stats.checker_available;
    }

    pub fn record_discovery(&mut self, discovery: &Discovery) {
        self.subdirectories = discovery.total_subdirs;
        self.valid_cases = discovery.cases.len();
        self.files_discovered = discovery.fragment_count()
            + discovery.excluded.iter().map(|e| e.found).sum::<usize>();
        self.excluded_cases = discovery.excluded.clone();
    }

    pub fn record_patterns(&mut self, report: PatternReport) {
        self.cases_with_pattern_issues = report.cases_with_issues();
        self.pattern_issues = report.issues;
    }

    pub fn record_combined(&mut self, combined: &CombinedFile) {
        self.combined_fragments = combined.fragments;
        self.combined_skipped = combined.skipped.len();
    }

    pub fn record_analysis(&mut self, results: &AnalysisResults) {
        self.fragments_analyzed = results.len();
        self.analyzer_failures = results.values().filter(|o| o.is_failure()).count();
    }

    pub fn record_reports(&mut self, reports: &[CaseReport]) {
        self.cases_with_write = reports.iter().filter(|r| r.has_write).count();
        self.cases_with_failures = reports.iter().filter(|r| r.has_failures()).count();
        self.write_write = reports
            .iter()
            .filter(|r| r.race_type == RaceClassification::WriteWrite)
            .count();
        self.read_write = reports.len() - self.write_write;
    }

    pub fn finish(&mut self, elapsed: Duration) {
        self.elapsed_ms = elapsed.as_millis() as u64;
    }

    pub fn excluded(&self) -> usize {
        self.excluded_cases.len()
    }
}
