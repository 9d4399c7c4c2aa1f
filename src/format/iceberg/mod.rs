//! # Iceberg Tables
//!
//! Version 1 tables with JSON manifests and manifest lists:
//!
//! ```text
//! data/data_<seq>.parquet
//! metadata/manifest-<id>.json
//! metadata/snap-<id>.manifest-list.json
//! metadata/v<id>.metadata.json
//! metadata/version-hint.text
//! ```

mod metadata;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::schema::TableSchema;
use crate::storage::{read_hint, write_atomic, write_durable};
use crate::writer::{DataFileInfo, TableError};

use super::{create_table_dir, CommitContext, FormatKind, ManifestFile, TableFormat};

pub use metadata::{
    DataFile, Manifest, ManifestEntry, ManifestList, ManifestListEntry, Schema, SchemaField,
    Snapshot, SnapshotLogEntry, TableMetadata, DEFAULT_BLOCK_SIZE, FORMAT_VERSION,
};

/// Directory of data files
pub const DATA_DIR: &str = "data";
/// Directory of all metadata files
pub const METADATA_DIR: &str = "metadata";
/// Hint holding the current metadata version
pub const VERSION_HINT: &str = "version-hint.text";

const CONTENT_DATA: &str = "data";

/// Iceberg implementation of [`TableFormat`]
#[derive(Debug)]
pub struct IcebergFormat {
    root: PathBuf,
    table_uuid: String,
    /// Manifests of the commit in progress, kept for the snapshot summary
    pending: Vec<ManifestFile>,
}

impl IcebergFormat {
    /// Format for a table rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            table_uuid: Uuid::new_v4().to_string(),
            pending: Vec::new(),
        }
    }

    fn metadata_dir(&self) -> PathBuf {
        self.root.join(METADATA_DIR)
    }
}

impl TableFormat for IcebergFormat {
    fn kind(&self) -> FormatKind {
        FormatKind::Iceberg
    }

    fn root(&self) -> &Path {
        &self.root
    }

    fn data_dir(&self) -> &'static str {
        DATA_DIR
    }

    fn data_file_name(&self, seq: u32, extension: &str) -> String {
        format!("data_{seq:05}.{extension}")
    }

    fn initialize(&mut self, _schema: &TableSchema) -> Result<(), TableError> {
        if self.metadata_dir().join(VERSION_HINT).exists() {
            return Err(TableError::AlreadyCommitted(self.root.clone()));
        }
        create_table_dir(&self.root.join(DATA_DIR))?;
        create_table_dir(&self.metadata_dir())?;
        log::debug!("Initialized Iceberg table at {}", self.root.display());
        Ok(())
    }

    fn build_manifest(
        &mut self,
        ctx: &CommitContext<'_>,
        files: &[DataFileInfo],
    ) -> Result<ManifestFile, TableError> {
        let name = format!("manifest-{}.json", ctx.snapshot_id);
        let manifest = Manifest {
            version: FORMAT_VERSION,
            manifest_path: format!("{METADATA_DIR}/{name}"),
            content: CONTENT_DATA.to_string(),
            files: files
                .iter()
                .map(|f| ManifestEntry {
                    status: "ADDED".to_string(),
                    snapshot_id: ctx.snapshot_id,
                    data_file: DataFile {
                        file_path: format!("{DATA_DIR}/{}", f.name),
                        file_format: "PARQUET".to_string(),
                        spec_id: 0,
                        partition: BTreeMap::new(),
                        record_count: f.row_count,
                        file_size_in_bytes: f.size_bytes,
                        block_size_in_bytes: DEFAULT_BLOCK_SIZE,
                        sort_order_id: 0,
                    },
                })
                .collect(),
        };

        let path = self.metadata_dir().join(&name);
        write_durable(&path, &serde_json::to_vec_pretty(&manifest)?)?;
        let size_bytes = fs::metadata(&path)?.len() as i64;

        let manifest_file = ManifestFile {
            name,
            size_bytes,
            num_added_files: files.len() as i64,
            num_added_rows: files.iter().map(|f| f.row_count).sum(),
        };
        self.pending.push(manifest_file.clone());
        Ok(manifest_file)
    }

    fn build_manifest_list(
        &mut self,
        ctx: &CommitContext<'_>,
        manifests: &[ManifestFile],
    ) -> Result<String, TableError> {
        let list = ManifestList {
            version: FORMAT_VERSION,
            snapshot_id: ctx.snapshot_id,
            manifests: manifests
                .iter()
                .map(|m| ManifestListEntry {
                    manifest_path: format!("{METADATA_DIR}/{}", m.name),
                    manifest_length: m.size_bytes,
                    partition_spec_id: 0,
                    content: CONTENT_DATA.to_string(),
                    sequence_number: 0,
                    min_sequence_number: 0,
                    added_snapshot_id: ctx.snapshot_id,
                    added_files_count: m.num_added_files,
                    existing_files_count: 0,
                    deleted_files_count: 0,
                })
                .collect(),
        };

        let name = format!("snap-{}.manifest-list.json", ctx.snapshot_id);
        write_durable(
            &self.metadata_dir().join(&name),
            &serde_json::to_vec_pretty(&list)?,
        )?;
        Ok(name)
    }

    fn build_snapshot(
        &mut self,
        ctx: &CommitContext<'_>,
        manifest_list: &str,
    ) -> Result<(), TableError> {
        let added_files: i64 = self.pending.iter().map(|m| m.num_added_files).sum();
        let summary = BTreeMap::from([
            ("operation".to_string(), "append".to_string()),
            ("added-data-files".to_string(), added_files.to_string()),
            ("added-records".to_string(), ctx.delta_record_count.to_string()),
            ("total-records".to_string(), ctx.total_record_count.to_string()),
        ]);

        let snapshot = Snapshot {
            snapshot_id: ctx.snapshot_id,
            parent_snapshot_id: (ctx.snapshot_id > 1).then_some(ctx.snapshot_id - 1),
            timestamp_ms: ctx.timestamp_ms,
            summary,
            manifest_list: format!("{METADATA_DIR}/{manifest_list}"),
        };
        let metadata = TableMetadata {
            format_version: FORMAT_VERSION,
            table_uuid: self.table_uuid.clone(),
            location: self.root.display().to_string(),
            last_updated_ms: ctx.timestamp_ms,
            last_column_id: ctx.schema.highest_field_id(),
            schema: Schema::from(ctx.schema),
            current_snapshot_id: ctx.snapshot_id,
            snapshots: vec![snapshot],
            snapshot_log: vec![SnapshotLogEntry {
                timestamp_ms: ctx.timestamp_ms,
                snapshot_id: ctx.snapshot_id,
            }],
            metadata_log: Vec::new(),
            sort_orders: Vec::new(),
        };

        let path = self
            .metadata_dir()
            .join(format!("v{}.metadata.json", ctx.snapshot_id));
        write_durable(&path, &serde_json::to_vec_pretty(&metadata)?)?;
        self.pending.clear();
        log::debug!("Wrote table metadata {}", path.display());
        Ok(())
    }

    fn publish_hints(&mut self, ctx: &CommitContext<'_>) -> Result<(), TableError> {
        let hint = format!("{}\n", ctx.snapshot_id);
        write_atomic(&self.metadata_dir().join(VERSION_HINT), hint.as_bytes())?;
        Ok(())
    }
}

/// Read the current metadata of the table at `root`, if any.
pub fn read_current_metadata(root: &Path) -> Result<Option<TableMetadata>, TableError> {
    let metadata_dir = root.join(METADATA_DIR);
    let Some(version) = read_hint(&metadata_dir.join(VERSION_HINT))? else {
        return Ok(None);
    };
    let bytes = fs::read(metadata_dir.join(format!("v{version}.metadata.json")))?;
    Ok(Some(serde_json::from_slice(&bytes)?))
}

/// Read a JSON metadata file by its path relative to the table root.
pub fn read_json<T: serde::de::DeserializeOwned>(
    root: &Path,
    relative: &str,
) -> Result<T, TableError> {
    let bytes = fs::read(root.join(relative))?;
    Ok(serde_json::from_slice(&bytes)?)
}
