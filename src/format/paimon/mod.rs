//! # Paimon Append-Only Tables
//!
//! Layout of a table root:
//!
//! ```text
//! OPTIONS
//! schema/schema-0
//! bucket-0/data-<uuid>-<seq>.parquet
//! manifest/manifest-<uuid>-0
//! manifest/manifest-list-<uuid>-0
//! snapshot/snapshot-<id>
//! snapshot/EARLIEST
//! snapshot/LATEST
//! ```
//!
//! Manifests and manifest lists are single-block container files (see
//! [`crate::avro`]); everything else is JSON or plain text.

mod manifest;
mod schema_file;
mod snapshot;

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::avro::{ContainerFile, ContainerWriter};
use crate::schema::TableSchema;
use crate::storage::{read_hint, write_atomic, write_durable};
use crate::writer::{DataFileInfo, TableError};

use super::{create_table_dir, CommitContext, FormatKind, ManifestFile, TableFormat};

pub use manifest::{
    DataFileMeta, FileKind, ManifestEntry, ManifestListEntry, EMPTY_PARTITION,
    FILE_SOURCE_APPEND, MANIFEST_ENTRY_SCHEMA, MANIFEST_LIST_ENTRY_SCHEMA, UNBUCKETED,
};
pub use schema_file::{options_file, SchemaFile, SchemaFileField, TABLE_OPTIONS};
pub use snapshot::{CommitKind, Snapshot, BATCH_COMMIT_IDENTIFIER, SNAPSHOT_VERSION};

/// Directory of the single bucket of an unbucketed table
pub const BUCKET_DIR: &str = "bucket-0";
/// Directory of manifests and manifest lists
pub const MANIFEST_DIR: &str = "manifest";
/// Directory of snapshot descriptors and hints
pub const SNAPSHOT_DIR: &str = "snapshot";
/// Directory of schema files
pub const SCHEMA_DIR: &str = "schema";
/// Table options file
pub const OPTIONS_FILE: &str = "OPTIONS";
/// Hint holding the oldest snapshot id
pub const EARLIEST_HINT: &str = "EARLIEST";
/// Hint holding the newest snapshot id
pub const LATEST_HINT: &str = "LATEST";

/// Paimon implementation of [`TableFormat`]
#[derive(Debug)]
pub struct PaimonFormat {
    root: PathBuf,
    /// Shared by the data files this writer generates
    write_uuid: String,
    commit_user: String,
}

impl PaimonFormat {
    /// Format for a table rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_uuid: Uuid::new_v4().simple().to_string(),
            commit_user: Uuid::new_v4().to_string(),
        }
    }

    fn snapshot_dir(&self) -> PathBuf {
        self.root.join(SNAPSHOT_DIR)
    }

    fn manifest_dir(&self) -> PathBuf {
        self.root.join(MANIFEST_DIR)
    }
}

impl TableFormat for PaimonFormat {
    fn kind(&self) -> FormatKind {
        FormatKind::Paimon
    }

    fn root(&self) -> &Path {
        &self.root
    }

    fn data_dir(&self) -> &'static str {
        BUCKET_DIR
    }

    fn data_file_name(&self, seq: u32, extension: &str) -> String {
        format!("data-{}-{seq}.{extension}", self.write_uuid)
    }

    fn initialize(&mut self, schema: &TableSchema) -> Result<(), TableError> {
        let snapshot_dir = self.snapshot_dir();
        if snapshot_dir.join(LATEST_HINT).exists() {
            return Err(TableError::AlreadyCommitted(self.root.clone()));
        }

        for dir in [SNAPSHOT_DIR, MANIFEST_DIR, BUCKET_DIR, SCHEMA_DIR] {
            create_table_dir(&self.root.join(dir))?;
        }

        let options_path = self.root.join(OPTIONS_FILE);
        write_durable(&options_path, options_file().as_bytes()).map_err(|source| {
            TableError::Initialization {
                path: options_path.clone(),
                source,
            }
        })?;

        let schema_path = self
            .root
            .join(SCHEMA_DIR)
            .join(format!("schema-{}", schema.id));
        let json = serde_json::to_vec_pretty(&SchemaFile::from(schema))?;
        write_durable(&schema_path, &json).map_err(|source| TableError::Initialization {
            path: schema_path.clone(),
            source,
        })?;

        log::debug!("Initialized Paimon table at {}", self.root.display());
        Ok(())
    }

    fn build_manifest(
        &mut self,
        ctx: &CommitContext<'_>,
        files: &[DataFileInfo],
    ) -> Result<ManifestFile, TableError> {
        let mut writer = ContainerWriter::new(MANIFEST_ENTRY_SCHEMA);
        let mut record = Vec::new();
        for file in files {
            record.clear();
            ManifestEntry::added(file, ctx.schema.id).encode(&mut record);
            writer.append_record(&record);
        }

        let name = format!("manifest-{}-0", Uuid::new_v4().simple());
        let path = self.manifest_dir().join(&name);
        writer.finish(&path)?;
        let size_bytes = fs::metadata(&path)?.len() as i64;

        Ok(ManifestFile {
            name,
            size_bytes,
            num_added_files: files.len() as i64,
            num_added_rows: files.iter().map(|f| f.row_count).sum(),
        })
    }

    fn build_manifest_list(
        &mut self,
        ctx: &CommitContext<'_>,
        manifests: &[ManifestFile],
    ) -> Result<String, TableError> {
        let mut writer = ContainerWriter::new(MANIFEST_LIST_ENTRY_SCHEMA);
        let mut record = Vec::new();
        for manifest in manifests {
            record.clear();
            ManifestListEntry {
                file_name: manifest.name.clone(),
                file_size: manifest.size_bytes,
                num_added_files: manifest.num_added_files,
                num_deleted_files: 0,
                schema_id: ctx.schema.id,
            }
            .encode(&mut record);
            writer.append_record(&record);
        }

        let name = format!("manifest-list-{}-0", Uuid::new_v4().simple());
        writer.finish(self.manifest_dir().join(&name))?;
        Ok(name)
    }

    fn build_snapshot(
        &mut self,
        ctx: &CommitContext<'_>,
        manifest_list: &str,
    ) -> Result<(), TableError> {
        let mut snapshot = Snapshot::append(
            ctx.snapshot_id,
            ctx.schema.id,
            self.commit_user.as_str(),
            ctx.base_manifest_list.map(str::to_string),
            manifest_list,
        );
        snapshot.time_millis = ctx.timestamp_ms;
        snapshot.total_record_count = ctx.total_record_count;
        snapshot.delta_record_count = ctx.delta_record_count;

        let path = self
            .snapshot_dir()
            .join(format!("snapshot-{}", ctx.snapshot_id));
        write_durable(&path, &serde_json::to_vec_pretty(&snapshot)?)?;
        log::debug!("Wrote snapshot descriptor {}", path.display());
        Ok(())
    }

    fn publish_hints(&mut self, ctx: &CommitContext<'_>) -> Result<(), TableError> {
        let snapshot_dir = self.snapshot_dir();
        let id = ctx.snapshot_id.to_string();

        // EARLIEST only moves when this is the first snapshot of the table
        let earliest = snapshot_dir.join(EARLIEST_HINT);
        if read_hint(&earliest)?.is_none() {
            write_atomic(&earliest, id.as_bytes())?;
        }
        write_atomic(&snapshot_dir.join(LATEST_HINT), id.as_bytes())?;
        Ok(())
    }
}

/// Read the newest snapshot of the table at `root`, if any.
pub fn read_latest_snapshot(root: &Path) -> Result<Option<Snapshot>, TableError> {
    let snapshot_dir = root.join(SNAPSHOT_DIR);
    let Some(id) = read_hint(&snapshot_dir.join(LATEST_HINT))? else {
        return Ok(None);
    };
    let bytes = fs::read(snapshot_dir.join(format!("snapshot-{id}")))?;
    Ok(Some(serde_json::from_slice(&bytes)?))
}

/// Decode `manifest/<name>` as a manifest list.
pub fn read_manifest_list(root: &Path, name: &str) -> Result<Vec<ManifestListEntry>, TableError> {
    let file = ContainerFile::open(root.join(MANIFEST_DIR).join(name))?;
    Ok(file.decode_records(ManifestListEntry::decode)?)
}

/// Decode `manifest/<name>` as a manifest.
pub fn read_manifest(root: &Path, name: &str) -> Result<Vec<ManifestEntry>, TableError> {
    let file = ContainerFile::open(root.join(MANIFEST_DIR).join(name))?;
    Ok(file.decode_records(ManifestEntry::decode)?)
}
