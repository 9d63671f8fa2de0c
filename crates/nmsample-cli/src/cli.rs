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
    author,
    version,
    about = "nmsample - generate displaced molecular geometries by sampling vibrational normal modes, for fitting potential-energy surfaces.",
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
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sample displaced geometries and write them as concatenated XYZ frames.
    Generate(GenerateArgs),
    /// Summarize the normal modes and print the planned sampling parameters.
    Inspect(InspectArgs),
}

/// Options shared by every subcommand that builds a generator.
#[derive(Args, Debug, Clone)]
pub struct GeneratorArgs {
    /// Settings file (TOML) providing `molecule.fragments`.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub settings: PathBuf,

    /// Normal-mode data file (.dat).
    #[arg(short = 'm', long, required = true, value_name = "PATH")]
    pub normal_modes: PathBuf,

    /// Run configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Number of configurations, overriding `generator.num-configs`.
    #[arg(short, long, value_name = "INT")]
    pub num_configs: Option<usize>,

    #[command(flatten)]
    pub family: DistributionFamily,

    /// Sample at this constant temperature (kelvin).
    /// Takes precedence over --linear and --geometric.
    #[arg(short, long, value_name = "KELVIN")]
    pub temperature: Option<f64>,

    /// Use the quantum (zero-point corrected) variance instead of the classical one.
    #[arg(long)]
    pub quantum: bool,

    /// Reproduce the historical generator's numerics exactly.
    #[arg(long)]
    pub legacy: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S generator.num-configs=50
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Mutually exclusive default distribution families.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(required = false, multiple = false)]
pub struct DistributionFamily {
    /// Vary temperature and amplitude linearly across the run.
    #[arg(long)]
    pub linear: bool,
    /// Vary temperature and amplitude geometrically across the run.
    #[arg(long)]
    pub geometric: bool,
}

/// Arguments for the `generate` subcommand.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub generator: GeneratorArgs,

    /// Equilibrium geometry in XYZ format (angstroms).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub geometry: PathBuf,

    /// Output file for the generated configurations.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Seed for the random number generator. A fresh seed is drawn and logged when omitted.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Also write a CSV manifest of each configuration's ensemble and parameter.
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    #[command(flatten)]
    pub generator: GeneratorArgs,
}
