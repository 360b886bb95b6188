//! Subcommand handlers
//!
//! Each handler returns the process exit code. Only invalid configuration,
//! an unusable corpus root or a failed artifact write yield a non-zero code;
//! per-fragment failures end up in the report instead.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, error};

use super::commands::{ConfigArgs, DiscoverArgs, VerifyArgs};
use super::output::{DiscoveryListing, OutputFormatter};
use crate::config::SkelcheckConfig;
use crate::corpus::discover;
use crate::pipeline::{PipelineOrchestrator, VerifyRequest};
use crate::progress::LoggingHandler;

/// Environment defaults overridden by `verify` flags, then validated
pub fn verify_config(args: &VerifyArgs) -> Result<SkelcheckConfig> {
    let mut config = SkelcheckConfig::default();

    if let Some(analyzer) = &args.analyzer {
        config.analyzer = analyzer.clone();
    }
    if !args.analyzer_args.is_empty() {
        config.analyzer_args = args.analyzer_args.clone();
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(timeout) = args.timeout {
        config.analyzer_timeout_secs = timeout;
    }
    if let Some(formatter) = &args.formatter {
        config.formatter = formatter.clone();
    }
    if let Some(extension) = &args.extension {
        config.extension = extension.trim_start_matches('.').to_string();
    }
    if let Some(prefix) = &args.var_prefix {
        config.var_prefix = prefix.clone();
    }
    config.analyzer_debug |= args.debug_analyzer;

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

pub async fn handle_verify(args: &VerifyArgs) -> i32 {
    match run_verify(args).await {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => fail(e),
    }
}

async fn run_verify(args: &VerifyArgs) -> Result<String> {
    let config = verify_config(args)?;
    debug!("{}", config);

    let request = VerifyRequest {
        input_dir: args.input_dir.clone(),
        combined_file: args.combined_file.clone(),
        output_csv: args.output_csv.clone(),
        normalize: !args.skip_normalize,
    };

    let outcome = PipelineOrchestrator::from_config(config)
        .with_progress(Arc::new(LoggingHandler))
        .execute(&request)
        .await
        .with_context(|| format!("Failed to verify {}", request.input_dir.display()))?;

    OutputFormatter::new(args.format.into()).format_summary(&outcome.summary)
}

pub fn handle_discover(args: &DiscoverArgs) -> i32 {
    match run_discover(args) {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => fail(e),
    }
}

fn run_discover(args: &DiscoverArgs) -> Result<String> {
    let mut config = SkelcheckConfig::default();
    if let Some(extension) = &args.extension {
        config.extension = extension.trim_start_matches('.').to_string();
    }
    config.validate().context("Invalid configuration")?;

    let discovery = discover(&args.input_dir, &config.extension)
        .with_context(|| format!("Failed to discover cases in {}", args.input_dir.display()))?;

    let listing = DiscoveryListing::new(args.input_dir.clone(), &discovery);
    OutputFormatter::new(args.format.into()).format_discovery(&listing)
}

pub fn handle_config(args: &ConfigArgs) -> i32 {
    let config = SkelcheckConfig::default();
    let validated = config.validate().context("Invalid configuration");
    let rendered = OutputFormatter::new(args.format.into()).format_config(&config);

    match (validated, rendered) {
        (Ok(()), Ok(output)) => {
            println!("{}", output);
            0
        }
        (Err(e), Ok(output)) => {
            println!("{}", output);
            fail(e)
        }
        (_, Err(e)) => fail(e),
    }
}

fn fail(e: anyhow::Error) -> i32 {
    error!("{:#}", e);
    eprintln!("Error: {:#}", e);
    1
}
