use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use lakewriter::format::FormatKind;

mod config;
mod ingest;
mod inspect;
mod profile;

pub use profile::Profile;

/// lakewriter - Append-only lakehouse table writer
#[derive(Parser)]
#[command(name = "lakewriter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Write profile for trading speed against file size.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ProfileArg {
    /// Uncompressed data files, no statistics
    Fast,
    /// Snappy-compressed data files
    #[default]
    Balanced,
    /// ZSTD-compressed data files
    MaxCompression,
}

impl From<ProfileArg> for Profile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Fast => Profile::Fast,
            ProfileArg::Balanced => Profile::Balanced,
            ProfileArg::MaxCompression => Profile::MaxCompression,
        }
    }
}

/// Table format of a new table.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum FormatArg {
    /// Paimon append-only table
    #[default]
    Paimon,
    /// Iceberg table
    Iceberg,
}

impl From<FormatArg> for FormatKind {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Paimon => FormatKind::Paimon,
            FormatArg::Iceberg => FormatKind::Iceberg,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write Parquet input files into a new table as one snapshot
    Ingest {
        /// Table root directory
        #[arg(value_name = "TABLE")]
        table: PathBuf,

        /// Input Parquet files, read in order
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,

        /// Table format (defaults to the config file, then paimon)
        #[arg(short = 'f', long, value_enum)]
        format: Option<FormatArg>,

        /// Write profile (fast, balanced, max-compression)
        #[arg(short = 'p', long, default_value = "balanced", value_enum)]
        profile: ProfileArg,

        /// Rows buffered before a data file is written
        #[arg(long, value_name = "N")]
        flush_rows: Option<usize>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Display the committed snapshot of a table
    Inspect {
        /// Table root directory
        #[arg(value_name = "TABLE")]
        table: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Ingest {
            table,
            inputs,
            format,
            profile,
            flush_rows,
            config,
        } => ingest::run(
            table,
            inputs,
            format.map(FormatKind::from),
            Profile::from(profile),
            flush_rows,
            config,
        ),
        Commands::Inspect { table } => inspect::run(table),
    }
}
