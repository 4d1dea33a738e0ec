use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "rekrut",
    version,
    about = "Polish university admission formula evaluator"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a candidate against one formula
    Evaluate(EvaluateCommand),
    /// Report every structural problem in a formula
    Validate(ValidateCommand),
    /// Score a candidate against every formula in a directory
    Compare(CompareCommand),
    /// Build a formula from a written rule such as "0.5 × matematyka (R)"
    Parse(ParseCommand),
    /// Print a catalog preset formula
    Preset(PresetCommand),
    /// Convert an IB or EB grade into a matura percentage
    Convert(ConvertCommand),
}

#[derive(Args)]
pub struct EvaluateCommand {
    pub formula: PathBuf,
    #[arg(long)]
    pub scores: PathBuf,
    /// Defaults to `report.format` from rekrut.toml
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,
    /// Also enforce interview, portfolio and previous-degree flags
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args)]
pub struct ValidateCommand {
    pub formula: PathBuf,
}

#[derive(Args)]
pub struct CompareCommand {
    #[arg(long)]
    pub scores: PathBuf,
    /// Defaults to `catalog.dir` from rekrut.toml
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

#[derive(Args)]
pub struct ParseCommand {
    pub expression: String,
    #[arg(long, default_value = "custom")]
    pub university: String,
    #[arg(long, default_value = "custom")]
    pub program: String,
}

#[derive(Args)]
pub struct PresetCommand {
    pub name: String,
    #[arg(long, default_value = "custom")]
    pub university: String,
    #[arg(long, default_value = "custom")]
    pub program: String,
}

#[derive(Args)]
pub struct ConvertCommand {
    #[arg(long, value_enum)]
    pub system: GradeSystem,
    #[arg(long, allow_negative_numbers = true)]
    pub grade: f64,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum GradeSystem {
    Ib,
    Eb,
}
