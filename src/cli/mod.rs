pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, ConfigArgs, DiscoverArgs, VerifyArgs};
pub use output::{DiscoveryListing, OutputFormat, OutputFormatter};
