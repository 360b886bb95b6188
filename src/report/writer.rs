use super::aggregate::{CaseReport, REPORT_COLUMNS};
use crate::error::PipelineError;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Writes the header and one row per report. Returns the row count.
pub fn write_report<W: Write>(writer: W, reports: &[CaseReport]) -> Result<usize, csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(REPORT_COLUMNS)?;
    for report in reports {
        out.write_record(report.to_record())?;
    }
    out.flush()?;
    Ok(reports.len())
}

/// [`write_report`] to a file, creating parent directories
pub fn write_report_file(path: &Path, reports: &[CaseReport]) -> Result<usize, PipelineError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| PipelineError::Output {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let file = File::create(path).map_err(|source| PipelineError::Output {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = write_report(file, reports).map_err(|source| PipelineError::Report {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), rows, "CSV report written");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{AnalysisResults, AnalyzerOutcome};
    use crate::classify::RaceClassification;
    use crate::corpus::{Case, Fragment, FragmentStats};
    use crate::error::DecodeError;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn report(id: &str, line: &str) -> CaseReport {
        let fragment = |name: &str, content: &str| Fragment {
            path: PathBuf::from(format!("/c/{}/{}", id, name)),
            name: name.to_string(),
            content: content.to_string(),
            stats: FragmentStats::from_content(content.len() as u64, content),
        };
        let case = Case {
            id: id.to_string(),
            dir: PathBuf::from(format!("/c/{}", id)),
            first: fragment("a.go", "package main\n"),
            second: fragment("b.go", "package main\n"),
        };
        let mut results = AnalysisResults::new();
        results.insert(
            case.first.path.clone(),
            AnalyzerOutcome::Analyzed {
                has_write: true,
                line: Some(line.to_string()),
            },
        );
        results.insert(
            case.second.path.clone(),
            DecodeError("expected value at line 1 column 1".to_string()).into(),
        );
        CaseReport::new(&case, &results, RaceClassification::ReadWrite)
    }

    #[test]
    fn test_write_report_header_and_rows() {
        let mut buf = Vec::new();
        let rows = write_report(&mut buf, &[report("D1", "racyVar1 = 5")]).unwrap();
        assert_eq!(rows, 1);

        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), REPORT_COLUMNS.join(","));
        assert_eq!(
            lines.next().unwrap(),
            "D1,a.go,TRUE,racyVar1 = 5,,b.go,ERROR,,\
             Failed to parse analyzer output: expected value at line 1 column 1,\
             TRUE,read-write,13,13,1,1,TRUE,TRUE,FALSE,FALSE"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_write_report_quotes_embedded_commas() {
        let mut buf = Vec::new();
        write_report(&mut buf, &[report("D1", "racyVar1, x = 1, 2")]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\"racyVar1, x = 1, 2\""));
    }

    #[test]
    fn test_empty_report_has_header_only() {
        let mut buf = Vec::new();
        write_report(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), format!("{}\n", REPORT_COLUMNS.join(",")));
    }

    #[test]
    fn test_write_report_file_creates_parents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/out/report.csv");

        write_report_file(&path, &[report("D1", "x")]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 2);
    }
}
