//! Output formatting for multiple formats
//!
//! Run summaries, discovery listings and configuration dumps can be rendered
//! as JSON, YAML or human-readable text. Machine formats serialize the same
//! structures the library returns.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::config::SkelcheckConfig;
use crate::corpus::Discovery;
use crate::error::StructuralError;
use crate::report::RunSummary;

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// One valid case as listed by `skelcheck discover`
#[derive(Debug, Clone, Serialize)]
pub struct ListedCase {
    pub id: String,
    pub first: String,
    pub second: String,
}

/// Read-only view of a discovery pass
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryListing {
    pub root: PathBuf,
    pub subdirectories: usize,
    pub cases: Vec<ListedCase>,
    pub excluded: Vec<StructuralError>,
}

impl DiscoveryListing {
    pub fn new(root: PathBuf, discovery: &Discovery) -> Self {
        Self {
            root,
            subdirectories: discovery.total_subdirs,
            cases: discovery
                .cases
                .iter()
                .map(|case| ListedCase {
                    id: case.id.clone(),
                    first: case.first.name.clone(),
                    second: case.second.name.clone(),
                })
                .collect(),
            excluded: discovery.excluded.clone(),
        }
    }
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_summary(&self, summary: &RunSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(summary)
                .context("Failed to serialize run summary to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(summary).context("Failed to serialize run summary to YAML")
            }
            OutputFormat::Human => Ok(self.format_summary_human(summary)),
        }
    }

    pub fn format_discovery(&self, listing: &DiscoveryListing) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(listing)
                .context("Failed to serialize discovery listing to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(listing)
                .context("Failed to serialize discovery listing to YAML"),
            OutputFormat::Human => Ok(self.format_discovery_human(listing)),
        }
    }

    pub fn format_config(&self, config: &SkelcheckConfig) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&config.to_display_map())
                .context("Failed to serialize config to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(&config.to_display_map())
                .context("Failed to serialize config to YAML"),
            OutputFormat::Human => Ok(config.to_string()),
        }
    }

    fn format_summary_human(&self, summary: &RunSummary) -> String {
        let mut output = String::new();

        if summary.analyzer_failures == 0 && summary.excluded() == 0 && summary.parse_errors == 0 {
            output.push_str("\u{2713} Skeleton Verification Summary\n");
        } else {
            output.push_str("\u{26A0} Skeleton Verification Summary (with issues)\n");
        }
        output.push_str(RULE);
        output.push_str("\n\n");

        output.push_str(&format!("Root:  {}\n\n", summary.root.display()));

        if summary.normalized {
            output.push_str("Normalization:\n");
            output.push_str(&format!("\u{251C}\u{2500} Files checked:    {}\n", summary.files_checked));
            output.push_str(&format!("\u{251C}\u{2500} Files renamed:    {}\n", summary.files_renamed));
            output.push_str(&format!("\u{251C}\u{2500} Package updates:  {}\n", summary.package_updates));
            output.push_str(&format!("\u{251C}\u{2500} Parsed OK:        {}\n", summary.parsed_successfully));
            output.push_str(&format!("\u{2514}\u{2500} Parse errors:     {}\n", summary.parse_errors));
            if !summary.formatter_available {
                output.push_str("   (formatter not found, syntax checks skipped)\n");
            }
            output.push('\n');
        }

        output.push_str("Cases:\n");
        output.push_str(&format!("\u{251C}\u{2500} Subdirectories:   {}\n", summary.subdirectories));
        output.push_str(&format!("\u{251C}\u{2500} Fragments found:  {}\n", summary.files_discovered));
        output.push_str(&format!("\u{251C}\u{2500} Valid:            {}\n", summary.valid_cases));
        output.push_str(&format!("\u{251C}\u{2500} Excluded:         {}\n", summary.excluded()));
        output.push_str(&format!(
            "\u{2514}\u{2500} Pattern issues:   {}\n\n",
            summary.cases_with_pattern_issues
        ));

        output.push_str("Analysis:\n");
        output.push_str(&format!("\u{251C}\u{2500} Fragments:        {}\n", summary.fragments_analyzed));
        output.push_str(&format!("\u{251C}\u{2500} Failures:         {}\n", summary.analyzer_failures));
        output.push_str(&format!("\u{251C}\u{2500} Cases with write: {}\n", summary.cases_with_write));
        output.push_str(&format!("\u{251C}\u{2500} Incomplete rows:  {}\n", summary.cases_with_failures));
        output.push_str(&format!("\u{251C}\u{2500} Write-write:      {}\n", summary.write_write));
        output.push_str(&format!("\u{2514}\u{2500} Read-write:       {}\n", summary.read_write));

        if !summary.excluded_cases.is_empty() {
            output.push_str("\n\u{26A0} Excluded directories:\n");
            for excluded in &summary.excluded_cases {
                output.push_str(&format!("  - {}\n", excluded));
            }
        }

        if !summary.pattern_issues.is_empty() {
            output.push_str("\n\u{26A0} Pattern issues:\n");
            for issue in &summary.pattern_issues {
                output.push_str(&format!("  - {}\n", issue));
            }
        }

        if summary.combined_skipped > 0 {
            output.push_str(&format!(
                "\n\u{26A0} {} unreadable fragment(s) left out of the combined file\n",
                summary.combined_skipped
            ));
        }

        if !summary.parse_error_details.is_empty() {
            output.push_str("\n\u{26A0} Parse errors:\n");
            for (path, message) in &summary.parse_error_details {
                output.push_str(&format!("  - {}: {}\n", path.display(), message));
            }
        }

        output.push_str(&format!(
            "\n{} rows written in {}ms\n",
            summary.rows_written, summary.elapsed_ms
        ));

        output
    }

    fn format_discovery_human(&self, listing: &DiscoveryListing) -> String {
        let mut output = format!(
            "{} ({} subdirectories, {} valid, {} excluded)\n",
            listing.root.display(),
            listing.subdirectories,
            listing.cases.len(),
            listing.excluded.len()
        );

        for (i, case) in listing.cases.iter().enumerate() {
            let connector = if i + 1 == listing.cases.len() && listing.excluded.is_empty() {
                "\u{2514}"
            } else {
                "\u{251C}"
            };
            output.push_str(&format!(
                "{}\u{2500} {}: {}, {}\n",
                connector, case.id, case.first, case.second
            ));
        }

        for (i, excluded) in listing.excluded.iter().enumerate() {
            let connector = if i + 1 == listing.excluded.len() {
                "\u{2514}"
            } else {
                "\u{251C}"
            };
            output.push_str(&format!(
                "{}\u{2500} {}: excluded ({} .{} files)\n",
                connector, excluded.case_id, excluded.found, excluded.extension
            ));
        }

        output
    }
}
