//! Configuration management for skelcheck
//!
//! Settings are loaded from environment variables with sensible defaults and
//! may be overridden by command-line flags before the run starts.
//!
//! # Environment Variables
//!
//! - `SKELCHECK_ANALYZER`: Analyzer executable - default: "./bin/analyzer"
//! - `SKELCHECK_ANALYZER_TIMEOUT`: Per-fragment timeout in seconds - default: "120"
//! - `SKELCHECK_ANALYZER_DEBUG` or `DEBUG`: Any non-empty value passes `-debug` to the analyzer
//! - `SKELCHECK_WORKERS`: Maximum concurrent analyzer processes - default: available parallelism
//! - `SKELCHECK_FORMATTER`: Syntax checker executable - default: "gofmt"
//! - `SKELCHECK_EXTENSION`: Fragment file extension - default: "go"
//! - `SKELCHECK_VAR_PREFIX`: Tracked-variable prefix - default: "racyVar"
//! - `SKELCHECK_LOG_LEVEL`: Logging level - default: "info"
//!
//! # Example
//!
//! ```no_run
//! use skelcheck::SkelcheckConfig;
//!
//! let mut config = SkelcheckConfig::default();
//! config.workers = 4;
//! config.validate().expect("Invalid configuration");
//! ```

use crate::util::logging::parse_level;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_ANALYZER: &str = "./bin/analyzer";
const DEFAULT_FORMATTER: &str = "gofmt";
const DEFAULT_EXTENSION: &str = "go";
const DEFAULT_VAR_PREFIX: &str = "racyVar";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ANALYZER_TIMEOUT_SECS: u64 = 120;
const MAX_ANALYZER_TIMEOUT_SECS: u64 = 3600;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Failed to parse configuration value
    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

/// Main configuration structure for skelcheck
#[derive(Debug, Clone)]
pub struct SkelcheckConfig {
    /// External analyzer executable
    pub analyzer: PathBuf,

    /// Arguments placed before `-i <path>` on every analyzer invocation
    pub analyzer_args: Vec<String>,

    /// Pass `-debug` to the analyzer
    pub analyzer_debug: bool,

    /// Per-invocation timeout in seconds
    pub analyzer_timeout_secs: u64,

    /// Upper bound on concurrent analyzer processes
    pub workers: usize,

    /// External syntax checker, invoked as `<formatter> -e <path>`
    pub formatter: PathBuf,

    /// Fragment file extension, without the dot
    pub extension: String,

    /// Identifier prefix of tracked variables
    pub var_prefix: String,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for SkelcheckConfig {
    /// Loads configuration from `SKELCHECK_*` environment variables,
    /// falling back to defaults for anything unset or unparsable.
    fn default() -> Self {
        let analyzer = env::var("SKELCHECK_ANALYZER")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_ANALYZER));

        let analyzer_debug = ["SKELCHECK_ANALYZER_DEBUG", "DEBUG"]
            .iter()
            .any(|key| env::var(key).map(|v| !v.is_empty()).unwrap_or(false));

        let analyzer_timeout_secs = env::var("SKELCHECK_ANALYZER_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_ANALYZER_TIMEOUT_SECS);

        let workers = env::var("SKELCHECK_WORKERS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or_else(default_workers);

        let formatter = env::var("SKELCHECK_FORMATTER")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_FORMATTER));

        let extension = env::var("SKELCHECK_EXTENSION")
            .map(|v| v.trim_start_matches('.').to_string())
            .unwrap_or_else(|_| DEFAULT_EXTENSION.to_string());

        let var_prefix =
            env::var("SKELCHECK_VAR_PREFIX").unwrap_or_else(|_| DEFAULT_VAR_PREFIX.to_string());

        let log_level = env::var("SKELCHECK_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            analyzer,
            analyzer_args: Vec::new(),
            analyzer_debug,
            analyzer_timeout_secs,
            workers,
            formatter,
            extension,
            var_prefix,
            log_level,
        }
    }
}

/// Available hardware parallelism, or 1 when it cannot be determined
pub fn default_workers() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl SkelcheckConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any value is out of range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::ValidationFailed(
                "Worker count must be at least 1".to_string(),
            ));
        }

        if self.analyzer_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Analyzer timeout must be at least 1 second".to_string(),
            ));
        }
        if self.analyzer_timeout_secs > MAX_ANALYZER_TIMEOUT_SECS {
            return Err(ConfigError::ValidationFailed(
                "Analyzer timeout cannot exceed 1 hour".to_string(),
            ));
        }

        if self.analyzer.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Analyzer path must not be empty".to_string(),
            ));
        }

        if self.extension.is_empty() || self.extension.contains(['/', '.']) {
            return Err(ConfigError::ParseError {
                field: "extension".to_string(),
                error: format!("'{}' is not a bare file extension", self.extension),
            });
        }

        let mut chars = self.var_prefix.chars();
        let is_identifier = chars
            .next()
            .map(|c| c.is_ascii_alphabetic() || c == '_')
            .unwrap_or(false)
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !is_identifier {
            return Err(ConfigError::ParseError {
                field: "var_prefix".to_string(),
                error: format!("'{}' is not an identifier", self.var_prefix),
            });
        }

        if parse_level(&self.log_level).is_none() {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        Ok(())
    }

    pub fn analyzer_timeout(&self) -> Duration {
        Duration::from_secs(self.analyzer_timeout_secs)
    }

    /// Converts configuration to a display map for output formatting
    pub fn to_display_map(&self) -> std::collections::BTreeMap<String, String> {
        let mut map = std::collections::BTreeMap::new();

        map.insert("analyzer".to_string(), self.analyzer.display().to_string());
        if !self.analyzer_args.is_empty() {
            map.insert("analyzer_args".to_string(), self.analyzer_args.join(" "));
        }
        map.insert(
            "analyzer_debug".to_string(),
            self.analyzer_debug.to_string(),
        );
        map.insert(
            "analyzer_timeout_secs".to_string(),
            self.analyzer_timeout_secs.to_string(),
        );
        map.insert("workers".to_string(), self.workers.to_string());
        map.insert("formatter".to_string(), self.formatter.display().to_string());
        map.insert("extension".to_string(), self.extension.clone());
        map.insert("var_prefix".to_string(), self.var_prefix.clone());
        map.insert("log_level".to_string(), self.log_level.clone());

        map
    }
}

impl fmt::Display for SkelcheckConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Skelcheck Configuration:")?;
        writeln!(f, "  Analyzer: {}", self.analyzer.display())?;
        if !self.analyzer_args.is_empty() {
            writeln!(f, "  Analyzer Args: {}", self.analyzer_args.join(" "))?;
        }
        writeln!(f, "  Analyzer Debug: {}", self.analyzer_debug)?;
        writeln!(f, "  Analyzer Timeout: {}s", self.analyzer_timeout_secs)?;
        writeln!(f, "  Workers: {}", self.workers)?;
        writeln!(f, "  Formatter: {}", self.formatter.display())?;
        writeln!(f, "  Extension: .{}", self.extension)?;
        writeln!(f, "  Tracked Prefix: {}", self.var_prefix)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
