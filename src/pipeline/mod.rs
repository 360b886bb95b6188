//! End-to-end verification pipeline

mod orchestrator;

pub use orchestrator::{PipelineOrchestrator, RunOutcome, VerifyRequest};
