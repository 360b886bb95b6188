//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { root } => {
                info!(root = %root, "Starting verification");
            }
            ProgressEvent::NormalizationComplete {
                files,
                parse_errors,
                duration,
            } => {
                if *parse_errors > 0 {
                    warn!(
                        files,
                        parse_errors,
                        duration_ms = duration.as_millis(),
                        "Normalization complete with parse errors"
                    );
                } else {
                    info!(
                        files,
                        duration_ms = duration.as_millis(),
                        "Normalization complete"
                    );
                }
            }
            ProgressEvent::DiscoveryComplete {
                cases,
                excluded,
                scan_time,
            } => {
                info!(
                    cases,
                    excluded,
                    scan_time_ms = scan_time.as_millis(),
                    "Case discovery complete"
                );
            }
            ProgressEvent::ValidationComplete {
                cases_checked,
                issues,
            } => {
                if *issues > 0 {
                    warn!(cases_checked, issues, "Pattern validation found issues");
                } else {
                    debug!(cases_checked, "Pattern validation complete");
                }
            }
            ProgressEvent::AnalysisStarted { fragments, workers } => {
                info!(fragments, workers, "Running analyzer");
            }
            ProgressEvent::FragmentAnalyzed {
                path,
                index,
                total,
                duration,
                success,
            } => {
                let progress = format!("{}/{}", index, total);
                if *success {
                    debug!(
                        path = %path,
                        progress = %progress,
                        duration_ms = duration.as_millis(),
                        "Fragment analyzed"
                    );
                } else {
                    warn!(
                        path = %path,
                        progress = %progress,
                        duration_ms = duration.as_millis(),
                        "Fragment analysis failed"
                    );
                }
            }
            ProgressEvent::AnalysisComplete {
                fragments,
                failures,
                duration,
            } => {
                info!(
                    fragments,
                    failures,
                    duration_ms = duration.as_millis(),
                    "Analysis complete"
                );
            }
            ProgressEvent::ReportWritten { path, rows } => {
                info!(path = %path, rows, "Report written");
            }
            ProgressEvent::Completed { cases, total_time } => {
                info!(
                    cases,
                    total_time_ms = total_time.as_millis(),
                    "Verification complete"
                );
            }
            ProgressEvent::Failed { error } => {
                warn!(error = %error, "Verification failed");
            }
        }
    }
}
