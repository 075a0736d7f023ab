use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::OutputFormat;

#[derive(Parser)]
#[command(
    name = "fieldaudit",
    about = "Field-level change auditing for JSON records",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format; defaults to the config file's setting
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare two flat JSON records
    Diff(DiffArgs),
    /// Build an audit record from a request document
    Record(RecordArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    pub before: PathBuf,
    pub after: PathBuf,
    /// Fields to ignore, comma separated
    #[arg(short, long, value_delimiter = ',')]
    pub ignore: Vec<String>,
}

#[derive(Args)]
pub struct RecordArgs {
    pub request: PathBuf,
    /// Assign a fresh record id
    #[arg(long)]
    pub assign_id: bool,
}
