//! Progress handler trait and events

use std::time::Duration;

/// Events emitted while a corpus is being verified
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Run started
    Started { root: String },

    /// Normalization pass completed
    NormalizationComplete {
        files: usize,
        parse_errors: usize,
        duration: Duration,
    },

    /// Case discovery completed
    DiscoveryComplete {
        cases: usize,
        excluded: usize,
        scan_time: Duration,
    },

    /// Pattern validation completed
    ValidationComplete { cases_checked: usize, issues: usize },

    /// Analyzer fan-out started
    AnalysisStarted { fragments: usize, workers: usize },

    /// One fragment finished, in completion order
    FragmentAnalyzed {
        path: String,
        index: usize,
        total: usize,
        duration: Duration,
        success: bool,
    },

    /// Every analyzer invocation has returned
    AnalysisComplete {
        fragments: usize,
        failures: usize,
        duration: Duration,
    },

    /// CSV report written
    ReportWritten { path: String, rows: usize },

    /// Run completed
    Completed { cases: usize, total_time: Duration },

    /// Run aborted
    Failed { error: String },
}

/// Trait for handling progress events during a run
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingHandler {
        count: Arc<AtomicUsize>,
    }

    impl ProgressHandler for CountingHandler {
        fn on_progress(&self, _event: &ProgressEvent) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_noop_handler() {
        NoOpHandler.on_progress(&ProgressEvent::Started {
            root: "/corpus".to_string(),
        });
    }

    #[test]
    fn test_progress_events() {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = CountingHandler {
            count: count.clone(),
        };

        handler.on_progress(&ProgressEvent::Started {
            root: "/corpus".to_string(),
        });
        handler.on_progress(&ProgressEvent::DiscoveryComplete {
            cases: 2,
            excluded: 1,
            scan_time: Duration::from_millis(5),
        });
        handler.on_progress(&ProgressEvent::Completed {
            cases: 2,
            total_time: Duration::from_secs(1),
        });

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_event_debug() {
        let event = ProgressEvent::AnalysisStarted {
            fragments: 4,
            workers: 2,
        };
        let debug_str = format!("{:?}", event);
        assert!(debug_str.contains("AnalysisStarted"));
        assert!(debug_str.contains("workers: 2"));
    }
}
