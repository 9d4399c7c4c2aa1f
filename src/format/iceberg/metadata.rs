use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::TableSchema;

/// Metadata layout version
pub const FORMAT_VERSION: i32 = 1;

/// Block size recorded for data files
pub const DEFAULT_BLOCK_SIZE: i64 = 64 * 1024 * 1024;

/// A data file as recorded in a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DataFile {
    /// Path relative to the table root
    pub file_path: String,
    /// Upper-case file format name
    pub file_format: String,
    /// Partition spec the file was written with
    pub spec_id: i32,
    /// Partition values; always empty
    pub partition: BTreeMap<String, String>,
    /// Rows in the file
    pub record_count: i64,
    /// Size in bytes
    pub file_size_in_bytes: i64,
    /// Nominal block size
    pub block_size_in_bytes: i64,
    /// Sort order the file was written with
    pub sort_order_id: i32,
}

/// One file entry of a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ManifestEntry {
    /// `ADDED`, `EXISTING` or `DELETED`
    pub status: String,
    /// Snapshot that added the file
    pub snapshot_id: i64,
    /// The file
    pub data_file: DataFile,
}

/// Content of `metadata/manifest-<id>.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Manifest {
    /// Layout version
    pub version: i32,
    /// Path of this manifest relative to the table root
    pub manifest_path: String,
    /// `data` or `deletes`
    pub content: String,
    /// File entries
    pub files: Vec<ManifestEntry>,
}

/// One manifest referenced by a manifest list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ManifestListEntry {
    /// Path relative to the table root
    pub manifest_path: String,
    /// Manifest size in bytes
    pub manifest_length: i64,
    /// Partition spec of the manifest
    pub partition_spec_id: i32,
    /// `data` or `deletes`
    pub content: String,
    /// Sequence number of the commit that added the manifest
    pub sequence_number: i64,
    /// Lowest data sequence number in the manifest
    pub min_sequence_number: i64,
    /// Snapshot that added the manifest
    pub added_snapshot_id: i64,
    /// Files with status `ADDED`
    pub added_files_count: i64,
    /// Files with status `EXISTING`
    pub existing_files_count: i64,
    /// Files with status `DELETED`
    pub deleted_files_count: i64,
}

/// Content of `metadata/snap-<id>.manifest-list.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ManifestList {
    /// Layout version
    pub version: i32,
    /// Snapshot the list belongs to
    pub snapshot_id: i64,
    /// Referenced manifests
    pub manifests: Vec<ManifestListEntry>,
}

/// A column of the table schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    /// Column id
    pub id: i32,
    /// Column name
    pub name: String,
    /// True for non-nullable columns
    pub required: bool,
    /// Type name
    #[serde(rename = "type")]
    pub field_type: String,
}

/// Struct schema of the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Schema {
    /// Always `struct`
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Schema id
    pub schema_id: i64,
    /// Columns in order
    pub fields: Vec<SchemaField>,
}

impl From<&TableSchema> for Schema {
    fn from(schema: &TableSchema) -> Self {
        Self {
            schema_type: "struct".to_string(),
            schema_id: schema.id,
            fields: schema
                .fields()
                .iter()
                .map(|f| SchemaField {
                    id: f.id,
                    name: f.name.clone(),
                    required: !f.nullable,
                    field_type: f.field_type.iceberg_name(),
                })
                .collect(),
        }
    }
}

/// A snapshot as listed in table metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Snapshot {
    /// Snapshot id
    pub snapshot_id: i64,
    /// Previous snapshot, if any
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub parent_snapshot_id: Option<i64>,
    /// Commit time, milliseconds since the Unix epoch
    pub timestamp_ms: i64,
    /// Operation and counters
    pub summary: BTreeMap<String, String>,
    /// Manifest list path relative to the table root
    pub manifest_list: String,
}

/// One entry of the snapshot log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SnapshotLogEntry {
    /// Commit time, milliseconds since the Unix epoch
    pub timestamp_ms: i64,
    /// Snapshot that became current
    pub snapshot_id: i64,
}

/// Content of `metadata/v<id>.metadata.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TableMetadata {
    /// Layout version
    pub format_version: i32,
    /// Identity of the table
    pub table_uuid: String,
    /// Table root
    pub location: String,
    /// Time of the last change, milliseconds since the Unix epoch
    pub last_updated_ms: i64,
    /// Highest column id in use
    pub last_column_id: i32,
    /// The table schema
    pub schema: Schema,
    /// Current snapshot
    pub current_snapshot_id: i64,
    /// All snapshots
    pub snapshots: Vec<Snapshot>,
    /// Current-snapshot history
    pub snapshot_log: Vec<SnapshotLogEntry>,
    /// Previous metadata files
    pub metadata_log: Vec<String>,
    /// Sort orders; always empty
    pub sort_orders: Vec<serde_json::Value>,
}
