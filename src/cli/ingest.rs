use anyhow::{Context, Result};
use log::info;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::File;
use std::path::PathBuf;

use lakewriter::format::FormatKind;
use lakewriter::writer::TableWriter;

use super::config::Config;
use super::Profile;

/// Stream Parquet input files into a new table
pub fn run(
    table: PathBuf,
    inputs: Vec<PathBuf>,
    format: Option<FormatKind>,
    profile: Profile,
    flush_rows: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let file_config = match &config_path {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let mut config = file_config.apply(profile.writer_config())?;
    if let Some(rows) = flush_rows {
        config.flush_threshold_rows = rows;
    }
    let format = match format {
        Some(kind) => kind,
        None => file_config.format()?.unwrap_or_default(),
    };

    info!(
        "Ingesting {} file(s) into {} table {} (profile: {}, flush threshold: {} rows)",
        inputs.len(),
        format,
        table.display(),
        profile,
        config.flush_threshold_rows
    );

    let mut writer = TableWriter::new(&table, format, config);
    for input in &inputs {
        let file = File::open(input)
            .with_context(|| format!("Failed to open input file: {}", input.display()))?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .with_context(|| format!("Failed to read Parquet file: {}", input.display()))?
            .build()?;

        let mut rows = 0usize;
        for batch in reader {
            let batch = batch.with_context(|| format!("Failed to decode {}", input.display()))?;
            rows += batch.num_rows();
            writer
                .write_batch(&batch)
                .with_context(|| format!("Failed to write batch from {}", input.display()))?;
        }
        info!("Read {} rows from {}", rows, input.display());
    }

    let stats = writer.close().context("Failed to commit table")?;

    println!("Ingest complete!");
    println!("  {}", stats);
    if let Some(commit) = &stats.commit {
        println!("  Snapshot: {}", commit.snapshot_id);
        println!("  Manifest: {}", commit.manifest);
        println!("  Manifest list: {}", commit.manifest_list);
        println!("  Total records: {}", commit.total_record_count);
    }

    Ok(())
}
