use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu",
    version,
    about = "Met-aromatic CLI - detect methionine sulfur / aromatic ring interactions and the bridges they form in protein structures.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(flatten)]
    pub detection: DetectionArgs,
}

/// Detection options shared by every subcommand. Each one overrides the
/// configuration file.
#[derive(Args, Debug, Default, Clone)]
pub struct DetectionArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Chain identifier to analyse.
    #[arg(long, global = true, value_name = "CHAR")]
    pub chain: Option<String>,

    /// Maximum sulfur to ring-midpoint distance, in Ångström.
    #[arg(short = 'd', long, global = true, value_name = "FLOAT")]
    pub distance: Option<f64>,

    /// Maximum angle between a lone pair and the sulfur-midpoint vector, in degrees.
    #[arg(short = 'a', long, global = true, value_name = "FLOAT")]
    pub angle: Option<f64>,

    /// Lone-pair interpolation model: 'cp' (cross-product) or 'rm' (rotation).
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Read structures from this directory instead of downloading them from RCSB.
    #[arg(long, global = true, value_name = "DIR")]
    pub structures_dir: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S detection.cutoff-angle=60
    #[arg(short = 'S', long = "set", global = true, value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect Met-aromatic interactions in a single structure.
    Query(QueryArgs),
    /// Reduce the interactions of a structure to bridges of a fixed size.
    Bridges(BridgesArgs),
    /// Run detection over a list of PDB codes and store one JSON record per code.
    Batch(BatchArgs),
}

/// Arguments for the `query` subcommand.
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// A four-character PDB code, or the path to a local PDB file (optionally .gz).
    #[arg(required = true, value_name = "CODE_OR_PATH")]
    pub target: String,

    /// Also write the interactions to a CSV file.
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,
}

/// Arguments for the `bridges` subcommand.
#[derive(Args, Debug)]
pub struct BridgesArgs {
    /// A four-character PDB code, or the path to a local PDB file (optionally .gz).
    #[arg(required = true, value_name = "CODE_OR_PATH")]
    pub target: String,

    /// Number of residues per bridge (at least 3).
    #[arg(short = 'n', long, value_name = "INT")]
    pub size: Option<usize>,
}

/// Arguments for the `batch` subcommand.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Text file with one PDB code per line. Blank lines and '#' comments are ignored.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub ids: PathBuf,

    /// Output file; one JSON document per line.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub out: PathBuf,

    /// Number of worker threads (clamped to 15).
    #[arg(short, long, value_name = "INT")]
    pub workers: Option<usize>,

    /// Also compute bridges of this size for every successful record.
    #[arg(long, value_name = "INT")]
    pub bridge_size: Option<usize>,
}
