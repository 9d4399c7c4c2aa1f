//! # lakewriter
//!
//! Command-line front end for the append-only table writer.
//!
//! ## Usage
//!
//! ```bash
//! # Ingest Parquet files into a new Paimon table
//! lakewriter ingest ./lineitem part-0.parquet part-1.parquet
//!
//! # Same, as an Iceberg table with a smaller flush threshold
//! lakewriter ingest ./lineitem part-0.parquet --format iceberg --flush-rows 1000000
//!
//! # Show the committed snapshot and its data files
//! lakewriter inspect ./lineitem
//! ```

mod cli;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
