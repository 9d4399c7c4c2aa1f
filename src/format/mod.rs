//! # Table Formats
//!
//! A table format decides the directory layout and the metadata artifacts
//! of a table. The commit protocol itself is shared (see
//! [`crate::commit::SnapshotCommitter`]); each format only knows how to
//! build its own artifacts:
//!
//! | Step | Paimon | Iceberg |
//! |------|--------|---------|
//! | manifest | `manifest/manifest-<uuid>-0` (container) | `metadata/manifest-<id>.json` |
//! | manifest list | `manifest/manifest-list-<uuid>-0` (container) | `metadata/snap-<id>.manifest-list.json` |
//! | snapshot | `snapshot/snapshot-<id>` | `metadata/v<id>.metadata.json` |
//! | hints | `snapshot/EARLIEST`, `snapshot/LATEST` | `metadata/version-hint.text` |

pub mod iceberg;
pub mod paimon;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::schema::TableSchema;
use crate::writer::{DataFileInfo, TableError};

pub use iceberg::IcebergFormat;
pub use paimon::PaimonFormat;

/// Table format variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatKind {
    /// Apache Paimon append-only table with container manifests
    #[default]
    Paimon,
    /// Apache Iceberg table with JSON metadata
    Iceberg,
}

impl FormatKind {
    /// Create the format implementation for a table rooted at `root`.
    pub fn create(self, root: &Path) -> Box<dyn TableFormat> {
        match self {
            Self::Paimon => Box::new(PaimonFormat::new(root)),
            Self::Iceberg => Box::new(IcebergFormat::new(root)),
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paimon => f.write_str("paimon"),
            Self::Iceberg => f.write_str("iceberg"),
        }
    }
}

impl FromStr for FormatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "paimon" => Ok(Self::Paimon),
            "iceberg" => Ok(Self::Iceberg),
            other => Err(format!("unknown table format: {other}")),
        }
    }
}

/// Inputs shared by every artifact of one commit
#[derive(Debug, Clone)]
pub struct CommitContext<'a> {
    /// The locked table schema
    pub schema: &'a TableSchema,
    /// Id of the snapshot being written
    pub snapshot_id: i64,
    /// Manifest list of the previous snapshot, if any
    pub base_manifest_list: Option<&'a str>,
    /// Rows added by this commit
    pub delta_record_count: i64,
    /// Rows visible once this commit is published
    pub total_record_count: i64,
    /// Commit time, milliseconds since the Unix epoch
    pub timestamp_ms: i64,
}

/// A manifest written by [`TableFormat::build_manifest`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestFile {
    /// File name, relative to the format's metadata directory
    pub name: String,
    /// Size on disk in bytes
    pub size_bytes: i64,
    /// Data files the manifest adds
    pub num_added_files: i64,
    /// Rows the manifest adds
    pub num_added_rows: i64,
}

/// Format-specific half of the commit protocol.
///
/// The committer calls the `build_*` methods in declaration order and
/// [`TableFormat::publish_hints`] last; an implementation may rely on that
/// order but must not publish anything a reader follows before
/// `publish_hints`.
pub trait TableFormat: Send {
    /// Which variant this is
    fn kind(&self) -> FormatKind;

    /// Table root directory
    fn root(&self) -> &Path;

    /// Directory holding data files, relative to the root
    fn data_dir(&self) -> &'static str;

    /// Name of the `seq`-th data file of this writer
    fn data_file_name(&self, seq: u32, extension: &str) -> String;

    /// Create the directory layout and schema artifacts.
    ///
    /// Fails with [`TableError::AlreadyCommitted`] when the root already
    /// holds a committed table.
    fn initialize(&mut self, schema: &TableSchema) -> Result<(), TableError>;

    /// Write the manifest describing `files`.
    fn build_manifest(
        &mut self,
        ctx: &CommitContext<'_>,
        files: &[DataFileInfo],
    ) -> Result<ManifestFile, TableError>;

    /// Write the manifest list referencing exactly `manifests`; returns its name.
    fn build_manifest_list(
        &mut self,
        ctx: &CommitContext<'_>,
        manifests: &[ManifestFile],
    ) -> Result<String, TableError>;

    /// Durably write the snapshot descriptor pointing at `manifest_list`.
    fn build_snapshot(
        &mut self,
        ctx: &CommitContext<'_>,
        manifest_list: &str,
    ) -> Result<(), TableError>;

    /// Advance the pointer file(s) to `ctx.snapshot_id`.
    fn publish_hints(&mut self, ctx: &CommitContext<'_>) -> Result<(), TableError>;
}

/// Create `dir` (and parents), mapping failures to an initialization error.
pub(crate) fn create_table_dir(dir: &Path) -> Result<(), TableError> {
    std::fs::create_dir_all(dir).map_err(|source| TableError::Initialization {
        path: dir.to_path_buf(),
        source,
    })
}
