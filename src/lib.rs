//! skelcheck - verification and race classification for skeleton corpora
//!
//! A corpus is a directory with one subdirectory per candidate data race.
//! Each subdirectory holds exactly two source fragments, one per side of the
//! race. skelcheck checks that shape, runs an external per-fragment analyzer
//! over every fragment concurrently, classifies each pair from its text and
//! writes one CSV row per pair.
//!
//! # Pipeline
//!
//! 1. [`corpus::normalize`]: canonical file names, package headers, comment
//!    stripping and syntax checks (optional)
//! 2. [`corpus::discover`]: group subdirectories into [`corpus::Case`]s
//! 3. [`validation`]: advisory check for tracked-variable references
//! 4. [`analyzer`]: bounded fan-out of the external analyzer
//! 5. [`classify`]: write-write versus read-write, from fragment text
//! 6. [`report`]: CSV rows and the [`RunSummary`]
//!
//! # Example
//!
//! ```no_run
//! use skelcheck::{PipelineOrchestrator, SkelcheckConfig, VerifyRequest};
//! use std::path::PathBuf;
//!
//! # async fn run() -> Result<(), skelcheck::PipelineError> {
//! let request = VerifyRequest {
//!     input_dir: PathBuf::from("skeletons"),
//!     combined_file: PathBuf::from("out/combined.go"),
//!     output_csv: PathBuf::from("out/report.csv"),
//!     normalize: true,
//! };
//! let outcome = PipelineOrchestrator::from_config(SkelcheckConfig::default())
//!     .execute(&request)
//!     .await?;
//! println!("{} rows", outcome.summary.rows_written);
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod classify;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod report;
pub mod util;
pub mod validation;

pub use analyzer::{AnalysisResults, AnalyzerInvoker, AnalyzerOutcome, ExternalAnalyzer, FragmentAnalyzer};
pub use classify::{RaceClassification, RaceClassifier};
pub use config::{ConfigError, SkelcheckConfig};
pub use corpus::{discover, Case, Discovery, Fragment, FragmentStats};
pub use error::{
    AnalyzerFailure, DecodeError, DiscoveryError, PipelineError, StructuralError,
    ToolInvocationError,
};
pub use pipeline::{PipelineOrchestrator, RunOutcome, VerifyRequest};
pub use report::{CaseReport, ReportAggregator, RunSummary};
pub use util::{init_from_env, init_logging, LoggingConfig};
pub use validation::{PatternValidator, TrackedPattern};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
