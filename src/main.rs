use skelcheck::cli::commands::{CliArgs, Commands};
use skelcheck::cli::handlers::{handle_config, handle_discover, handle_verify};
use skelcheck::util::logging::{init_logging, level_from_flags, parse_level, LoggingConfig};
use skelcheck::VERSION;

use clap::Parser;
use tracing::debug;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("skelcheck v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Verify(verify_args) => handle_verify(verify_args).await,
        Commands::Discover(discover_args) => handle_discover(discover_args),
        Commands::Config(config_args) => handle_config(config_args),
    };

    std::process::exit(exit_code);
}

/// `--log-level` beats `SKELCHECK_LOG_LEVEL`; `-v`/`-q` adjust the result
fn init_logging_from_args(args: &CliArgs) {
    let mut config = LoggingConfig::from_env();

    if let Some(level_str) = &args.log_level {
        match parse_level(level_str) {
            Some(level) => config.level = level,
            None => eprintln!(
                "Invalid log level '{}', keeping {}. Valid levels: trace, debug, info, warn, error",
                level_str, config.level
            ),
        }
    }
    config.level = level_from_flags(config.level, args.verbose, args.quiet);
    config.use_json |= args.log_json;

    init_logging(config);
}
