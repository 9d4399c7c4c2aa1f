use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use lakewriter::format::{iceberg, paimon};

/// Display the committed snapshot of a table
pub fn run(table: PathBuf) -> Result<()> {
    if !table.is_dir() {
        bail!("Table directory does not exist: {}", table.display());
    }

    if let Some(snapshot) =
        paimon::read_latest_snapshot(&table).context("Failed to read Paimon snapshot")?
    {
        return print_paimon(&table, &snapshot);
    }
    if let Some(metadata) =
        iceberg::read_current_metadata(&table).context("Failed to read Iceberg metadata")?
    {
        return print_iceberg(&table, &metadata);
    }
    bail!("No committed snapshot found in {}", table.display())
}

fn print_paimon(table: &Path, snapshot: &paimon::Snapshot) -> Result<()> {
    println!("Paimon Table Information");
    println!("========================");
    println!("Table: {}", table.display());
    println!("Snapshot: {}", snapshot.id);
    println!("  Schema id: {}", snapshot.schema_id);
    println!("  Commit kind: {:?}", snapshot.commit_kind);
    println!("  Committed at: {}", format_millis(snapshot.time_millis));
    println!("  Total records: {}", snapshot.total_record_count);
    println!("  Delta records: {}", snapshot.delta_record_count);
    println!();

    let list = paimon::read_manifest_list(table, &snapshot.delta_manifest_list)
        .with_context(|| format!("Failed to decode {}", snapshot.delta_manifest_list))?;
    println!("Manifest list: {}", snapshot.delta_manifest_list);
    for manifest in &list {
        println!(
            "  {} ({} bytes, {} added, {} deleted)",
            manifest.file_name, manifest.file_size, manifest.num_added_files, manifest.num_deleted_files
        );
        let entries = paimon::read_manifest(table, &manifest.file_name)
            .with_context(|| format!("Failed to decode {}", manifest.file_name))?;
        for entry in entries {
            println!(
                "    {:?} {}/{} ({} rows, {} bytes)",
                entry.kind,
                paimon::BUCKET_DIR,
                entry.file.file_name,
                entry.file.row_count,
                entry.file.file_size
            );
        }
    }
    Ok(())
}

fn print_iceberg(table: &Path, metadata: &iceberg::TableMetadata) -> Result<()> {
    println!("Iceberg Table Information");
    println!("=========================");
    println!("Table: {}", table.display());
    println!("Table UUID: {}", metadata.table_uuid);
    println!("Current snapshot: {}", metadata.current_snapshot_id);
    println!();

    println!("Schema:");
    for field in &metadata.schema.fields {
        let required = if field.required { " (required)" } else { "" };
        println!("  {:3}. {} {}{}", field.id, field.name, field.field_type, required);
    }
    println!();

    for snapshot in &metadata.snapshots {
        println!(
            "Snapshot {} at {}",
            snapshot.snapshot_id,
            format_millis(snapshot.timestamp_ms)
        );
        for (key, value) in &snapshot.summary {
            println!("  {key}: {value}");
        }
        let list: iceberg::ManifestList = iceberg::read_json(table, &snapshot.manifest_list)?;
        for entry in &list.manifests {
            let manifest: iceberg::Manifest = iceberg::read_json(table, &entry.manifest_path)?;
            println!("  {} ({} bytes)", entry.manifest_path, entry.manifest_length);
            for file in &manifest.files {
                println!(
                    "    {} {} ({} rows, {} bytes)",
                    file.status,
                    file.data_file.file_path,
                    file.data_file.record_count,
                    file.data_file.file_size_in_bytes
                );
            }
        }
    }
    Ok(())
}

fn format_millis(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| millis.to_string())
}
