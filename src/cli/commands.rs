use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Skeleton corpus verification and race classification
#[derive(Parser, Debug)]
#[command(
    name = "skelcheck",
    about = "Verify paired race skeletons, run the analyzer over them and emit a CSV report",
    version,
    long_about = "skelcheck walks a corpus of race skeletons (one subdirectory per candidate \
                  race, two fragment files per subdirectory), runs an external analyzer on \
                  every fragment in parallel, classifies each pair as write-write or \
                  read-write and writes one CSV row per valid pair."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(
        short = 'v',
        long,
        global = true,
        action = ArgAction::Count,
        help = "Increase verbosity (can be used multiple times)"
    )]
    pub verbose: u8,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only errors are logged"
    )]
    pub quiet: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Normalize, analyze and report on a skeleton corpus",
        long_about = "Runs the full pipeline: normalization, case discovery, pattern \
                      validation, combined-file generation, parallel analysis, race \
                      classification and CSV reporting.\n\n\
                      Examples:\n  \
                      skelcheck verify -i skeletons -c out/combined.go -o out/report.csv\n  \
                      skelcheck verify -i skeletons -c combined.go -o report.csv --workers 4\n  \
                      skelcheck verify -i skeletons -c combined.go -o report.csv --skip-normalize"
    )]
    Verify(VerifyArgs),

    #[command(
        about = "List the cases of a corpus without modifying it",
        long_about = "Groups the subdirectories of a corpus into cases and shows which are \
                      valid and which are excluded. Nothing is renamed or analyzed.\n\n\
                      Examples:\n  \
                      skelcheck discover skeletons\n  \
                      skelcheck discover skeletons --format json"
    )]
    Discover(DiscoverArgs),

    #[command(about = "Show the effective configuration")]
    Config(ConfigArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct VerifyArgs {
    #[arg(
        short = 'i',
        long,
        value_name = "DIR",
        help = "Corpus root with one subdirectory per case"
    )]
    pub input_dir: PathBuf,

    #[arg(
        short = 'c',
        long,
        value_name = "FILE",
        help = "Where to write the concatenation of all fragments"
    )]
    pub combined_file: PathBuf,

    #[arg(short = 'o', long, value_name = "FILE", help = "Where to write the CSV report")]
    pub output_csv: PathBuf,

    #[arg(long, value_name = "PATH", help = "Analyzer executable")]
    pub analyzer: Option<PathBuf>,

    #[arg(
        long = "analyzer-arg",
        value_name = "ARG",
        allow_hyphen_values = true,
        help = "Argument placed before -i on every analyzer call (repeatable)"
    )]
    pub analyzer_args: Vec<String>,

    #[arg(
        short = 'j',
        long,
        value_name = "N",
        help = "Maximum concurrent analyzer processes"
    )]
    pub workers: Option<usize>,

    #[arg(long, value_name = "SECONDS", help = "Per-fragment analyzer timeout")]
    pub timeout: Option<u64>,

    #[arg(long, value_name = "PATH", help = "Syntax checker used during normalization")]
    pub formatter: Option<PathBuf>,

    #[arg(long, value_name = "EXT", help = "Fragment file extension")]
    pub extension: Option<String>,

    #[arg(long, value_name = "PREFIX", help = "Identifier prefix of tracked variables")]
    pub var_prefix: Option<String>,

    #[arg(long, help = "Pass -debug to the analyzer")]
    pub debug_analyzer: bool,

    #[arg(long, help = "Skip renaming, header insertion, comment stripping and syntax checks")]
    pub skip_normalize: bool,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Summary output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct DiscoverArgs {
    #[arg(value_name = "DIR", help = "Corpus root")]
    pub input_dir: PathBuf,

    #[arg(long, value_name = "EXT", help = "Fragment file extension")]
    pub extension: Option<String>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
