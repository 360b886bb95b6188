use crate::analyzer::{AnalyzerInvoker, ExternalAnalyzer, FragmentAnalyzer};
use crate::classify::RaceClassifier;
use crate::config::SkelcheckConfig;
use crate::corpus::normalize::{normalize_corpus, SyntaxChecker};
use crate::corpus::{check_root, discover, write_combined_file};
use crate::error::PipelineError;
use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler};
use crate::report::{write_report_file, CaseReport, ReportAggregator, RunSummary};
use crate::validation::{PatternValidator, TrackedPattern};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Paths for one verification run
#[derive(Debug, Clone)]
pub struct VerifyRequest {
    pub input_dir: PathBuf,
    pub combined_file: PathBuf,
    pub output_csv: PathBuf,
    /// Run the normalization pass before discovery
    pub normalize: bool,
}

/// Everything a completed run produced
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub reports: Vec<CaseReport>,
    pub summary: RunSummary,
}

/// Drives normalization, discovery, validation, analysis, classification
/// and reporting, strictly in that order.
pub struct PipelineOrchestrator {
    config: SkelcheckConfig,
    analyzer: Arc<dyn FragmentAnalyzer>,
    progress: Arc<dyn ProgressHandler>,
}

impl PipelineOrchestrator {
    pub fn new(config: SkelcheckConfig, analyzer: Arc<dyn FragmentAnalyzer>) -> Self {
        Self {
            config,
            analyzer,
            progress: Arc::new(NoOpHandler),
        }
    }

    /// Orchestrator backed by the external analyzer named in `config`
    pub fn from_config(config: SkelcheckConfig) -> Self {
        let analyzer = ExternalAnalyzer::new(config.analyzer.clone(), config.analyzer_timeout())
            .with_leading_args(config.analyzer_args.clone())
            .with_debug(config.analyzer_debug);
        Self::new(config, Arc::new(analyzer))
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.progress = progress;
        self
    }

    pub async fn execute(&self, request: &VerifyRequest) -> Result<RunOutcome, PipelineError> {
        let start = Instant::now();
        let mut summary = RunSummary::new(request.input_dir.clone(), Utc::now());

        info!(
            root = %request.input_dir.display(),
            analyzer = %self.analyzer.name(),
            "Starting pipeline"
        );
        self.progress.on_progress(&ProgressEvent::Started {
            root: request.input_dir.display().to_string(),
        });

        match self.run_stages(request, &mut summary).await {
            Ok(reports) => {
                summary.finish(start.elapsed());
                self.progress.on_progress(&ProgressEvent::Completed {
                    cases: reports.len(),
                    total_time: start.elapsed(),
                });
                Ok(RunOutcome { reports, summary })
            }
            Err(e) => {
                self.progress.on_progress(&ProgressEvent::Failed {
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn run_stages(
        &self,
        request: &VerifyRequest,
        summary: &mut RunSummary,
    ) -> Result<Vec<CaseReport>, PipelineError> {
        let root = request.input_dir.as_path();
        let extension = self.config.extension.as_str();
        let pattern = TrackedPattern::new(&self.config.var_prefix)?;

        check_root(root)?;

        if request.normalize {
            let phase_start = Instant::now();
            let checker = SyntaxChecker::new(self.config.formatter.clone())
                .with_timeout(self.config.analyzer_timeout());
            let stats = normalize_corpus(root, extension, &checker).await;
            self.progress.on_progress(&ProgressEvent::NormalizationComplete {
                files: stats.total_files,
                parse_errors: stats.parse_errors,
                duration: phase_start.elapsed(),
            });
            summary.record_normalization(stats);
        } else {
            debug!("Normalization skipped");
        }

        let phase_start = Instant::now();
        let discovery = discover(root, extension)?;
        self.progress.on_progress(&ProgressEvent::DiscoveryComplete {
            cases: discovery.cases.len(),
            excluded: discovery.excluded.len(),
            scan_time: phase_start.elapsed(),
        });
        summary.record_discovery(&discovery);

        let patterns = PatternValidator::new(pattern.clone()).validate(&discovery.cases);
        self.progress.on_progress(&ProgressEvent::ValidationComplete {
            cases_checked: patterns.cases_checked,
            issues: patterns.cases_with_issues(),
        });
        summary.record_patterns(patterns);

        let combined = write_combined_file(root, &request.combined_file, extension).map_err(
            |source| PipelineError::Output {
                path: request.combined_file.clone(),
                source,
            },
        )?;
        summary.record_combined(&combined);

        let paths: Vec<PathBuf> = discovery.fragments().map(|f| f.path.clone()).collect();
        let results = AnalyzerInvoker::new(Arc::clone(&self.analyzer), self.config.workers)
            .with_progress(Arc::clone(&self.progress))
            .analyze_all(&paths)
            .await;
        summary.record_analysis(&results);

        let reports =
            ReportAggregator::new(RaceClassifier::new(pattern)).aggregate(&discovery.cases, &results);
        summary.record_reports(&reports);

        summary.rows_written = write_report_file(&request.output_csv, &reports)?;
        self.progress.on_progress(&ProgressEvent::ReportWritten {
            path: request.output_csv.display().to_string(),
            rows: summary.rows_written,
        });

        Ok(reports)
    }
}
