//! Structured logging setup for skelcheck
//!
//! Logs go to stderr through `tracing-subscriber`, either as human-readable
//! lines or as JSON, so stdout stays free for the run summary. `RUST_LOG`
//! replaces the computed filter entirely when it is set.
//!
//! # Example
//!
//! ```no_run
//! use skelcheck::util::logging;
//!
//! logging::init_from_env();
//! tracing::info!(root = "skeletons", "Starting verification");
//! ```

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Controls level and shape of log output
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level for skelcheck's own targets
    pub level: Level,

    /// Emit one JSON object per event
    pub use_json: bool,

    /// Include the module target (e.g., skelcheck::analyzer) in logs
    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: false,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// Reads `SKELCHECK_LOG_LEVEL` and `SKELCHECK_LOG_JSON`
    pub fn from_env() -> Self {
        let level = env::var("SKELCHECK_LOG_LEVEL")
            .ok()
            .and_then(|v| parse_level(&v))
            .unwrap_or(Level::INFO);

        let use_json = env::var("SKELCHECK_LOG_JSON")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        Self {
            level,
            use_json,
            include_location: level >= Level::DEBUG,
            include_target: level >= Level::DEBUG,
        }
    }

    pub fn json(mut self, use_json: bool) -> Self {
        self.use_json = use_json;
        self
    }

    fn directives(&self) -> String {
        format!("warn,skelcheck={}", self.level)
    }
}

/// Parses a level name, case-insensitively
///
/// ```
/// use skelcheck::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("Debug"), Some(Level::DEBUG));
/// assert_eq!(parse_level("loud"), None);
/// ```
pub fn parse_level(level_str: &str) -> Option<Level> {
    match level_str.trim().to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Resolves the effective level from CLI flags.
///
/// `-q` wins over everything, then each `-v` raises the base level by one
/// step.
pub fn level_from_flags(base: Level, verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    let steps = [Level::ERROR, Level::WARN, Level::INFO, Level::DEBUG, Level::TRACE];
    let index = steps.iter().position(|l| *l == base).unwrap_or(2);
    steps[(index + verbose as usize).min(steps.len() - 1)]
}

/// Installs the global subscriber. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = match env::var("RUST_LOG") {
            Ok(_) => EnvFilter::from_default_env(),
            Err(_) => EnvFilter::new(config.directives()),
        };

        let registry = tracing_subscriber::registry().with(filter);
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(config.include_target)
            .with_file(config.include_location)
            .with_line_number(config.include_location);

        // try_init so a subscriber installed by an embedding program wins
        let result = if config.use_json {
            registry.with(layer.json()).try_init()
        } else {
            registry.with(layer).try_init()
        };
        if let Err(e) = result {
            eprintln!("skelcheck: logging already initialized: {}", e);
        }
    });
}

/// Initializes logging from `SKELCHECK_LOG_*` environment variables
pub fn init_from_env() {
    init_logging(LoggingConfig::from_env());
}
