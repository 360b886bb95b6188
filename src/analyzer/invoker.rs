use super::{AnalyzerOutcome, FragmentAnalyzer};
use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler};
use futures_util::stream::{self, StreamExt};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Outcomes keyed by the fragment path the analyzer was invoked on
pub type AnalysisResults = BTreeMap<PathBuf, AnalyzerOutcome>;

/// Runs a [`FragmentAnalyzer`] over many fragments with bounded concurrency.
///
/// Each in-flight invocation owns its path and hands back `(path, outcome)`,
/// so results are correlated by key and never by completion order. The call
/// returns only once every invocation has produced an outcome.
pub struct AnalyzerInvoker {
    analyzer: Arc<dyn FragmentAnalyzer>,
    workers: usize,
    progress: Arc<dyn ProgressHandler>,
}

impl AnalyzerInvoker {
    pub fn new(analyzer: Arc<dyn FragmentAnalyzer>, workers: usize) -> Self {
        Self {
            analyzer,
            workers,
            progress: Arc::new(NoOpHandler),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.progress = progress;
        self
    }

    /// `min(workers, fragments)`, at least one when there is work
    pub fn concurrency(&self, fragments: usize) -> usize {
        self.workers.max(1).min(fragments)
    }

    pub async fn analyze_all(&self, paths: &[PathBuf]) -> AnalysisResults {
        let total = paths.len();
        if total == 0 {
            debug!("No fragments to analyze");
            return AnalysisResults::new();
        }

        let workers = self.concurrency(total);
        self.progress.on_progress(&ProgressEvent::AnalysisStarted {
            fragments: total,
            workers,
        });

        let start = Instant::now();
        let analyzer = self.analyzer.as_ref();
        let mut pending = stream::iter(paths.iter().cloned())
            .map(|path| async move {
                let started = Instant::now();
                let outcome = analyzer.analyze(&path).await;
                (path, outcome, started.elapsed())
            })
            .buffer_unordered(workers);

        let mut results = AnalysisResults::new();
        let mut failures = 0;
        while let Some((path, outcome, duration)) = pending.next().await {
            if outcome.is_failure() {
                failures += 1;
            }
            self.progress.on_progress(&ProgressEvent::FragmentAnalyzed {
                path: path.display().to_string(),
                index: results.len() + 1,
                total,
                duration,
                success: !outcome.is_failure(),
            });
            results.insert(path, outcome);
        }

        self.progress.on_progress(&ProgressEvent::AnalysisComplete {
            fragments: results.len(),
            failures,
            duration: start.elapsed(),
        });

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolInvocationError;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Verdict derived from the path; later paths finish first
    struct ScriptedAnalyzer {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl ScriptedAnalyzer {
        fn new() -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl FragmentAnalyzer for ScriptedAnalyzer {
        async fn analyze(&self, path: &Path) -> AnalyzerOutcome {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            let n: u64 = name.trim_start_matches('f').trim_end_matches(".go").parse().unwrap();
            tokio::time::sleep(Duration::from_millis(40 - n * 4)).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if n % 3 == 2 {
                return ToolInvocationError::NonZeroExit {
                    code: Some(1),
                    stderr: format!("cannot analyze {}", name),
                }
                .into();
            }
            AnalyzerOutcome::Analyzed {
                has_write: n % 2 == 0,
                line: Some(format!("line of {}", name)),
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn paths(count: usize) -> Vec<PathBuf> {
        (0..count)
            .map(|i| PathBuf::from(format!("/corpus/D{}/f{}.go", i / 2, i)))
            .collect()
    }

    #[tokio::test]
    async fn test_empty_input_spawns_nothing() {
        let analyzer = Arc::new(ScriptedAnalyzer::new());
        let invoker = AnalyzerInvoker::new(analyzer.clone(), 4);

        let results = invoker.analyze_all(&[]).await;

        assert!(results.is_empty());
        assert_eq!(analyzer.peak.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_one_outcome_per_path() {
        let invoker = AnalyzerInvoker::new(Arc::new(ScriptedAnalyzer::new()), 3);
        let input = paths(8);

        let results = invoker.analyze_all(&input).await;

        assert_eq!(results.len(), 8);
        for path in &input {
            assert!(results.contains_key(path), "missing {}", path.display());
        }
        let f2 = &results[&PathBuf::from("/corpus/D1/f2.go")];
        assert_eq!(f2.error().unwrap().to_string(), "cannot analyze f2.go");
        let f4 = &results[&PathBuf::from("/corpus/D2/f4.go")];
        assert_eq!(f4.line(), Some("line of f4.go"));
    }

    #[tokio::test]
    async fn test_single_and_many_workers_agree() {
        let input = paths(9);

        let serial = AnalyzerInvoker::new(Arc::new(ScriptedAnalyzer::new()), 1)
            .analyze_all(&input)
            .await;
        let parallel = AnalyzerInvoker::new(Arc::new(ScriptedAnalyzer::new()), 6)
            .analyze_all(&input)
            .await;

        assert_eq!(serial, parallel);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let analyzer = Arc::new(ScriptedAnalyzer::new());
        let invoker = AnalyzerInvoker::new(analyzer.clone(), 2);

        invoker.analyze_all(&paths(6)).await;

        assert!(analyzer.peak.load(Ordering::SeqCst) <= 2);
    }

    #[test]
    fn test_concurrency_degree() {
        let invoker = AnalyzerInvoker::new(Arc::new(ScriptedAnalyzer::new()), 8);
        assert_eq!(invoker.concurrency(3), 3);
        assert_eq!(invoker.concurrency(20), 8);
        assert_eq!(invoker.concurrency(0), 0);

        let zero = AnalyzerInvoker::new(Arc::new(ScriptedAnalyzer::new()), 0);
        assert_eq!(zero.concurrency(5), 1);
    }

    #[tokio::test]
    async fn test_progress_events_per_fragment() {
        struct Recorder(std::sync::Mutex<Vec<String>>);
        impl ProgressHandler for Recorder {
            fn on_progress(&self, event: &ProgressEvent) {
                let tag = match event {
                    ProgressEvent::AnalysisStarted { .. } => "started",
                    ProgressEvent::FragmentAnalyzed { .. } => "fragment",
                    ProgressEvent::AnalysisComplete { failures, .. } => {
                        assert_eq!(*failures, 1);
                        "complete"
                    }
                    _ => "other",
                };
                self.0.lock().unwrap().push(tag.to_string());
            }
        }

        let recorder = Arc::new(Recorder(std::sync::Mutex::new(Vec::new())));
        let invoker = AnalyzerInvoker::new(Arc::new(ScriptedAnalyzer::new()), 2)
            .with_progress(recorder.clone());

        invoker.analyze_all(&paths(4)).await;

        let tags = recorder.0.lock().unwrap().clone();
        assert_eq!(
            tags,
            vec!["started", "fragment", "fragment", "fragment", "fragment", "complete"]
        );
    }
}
