use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Snapshot descriptor layout version
pub const SNAPSHOT_VERSION: i32 = 3;

/// Commit identifier of a batch (non-streaming) commit
pub const BATCH_COMMIT_IDENTIFIER: i64 = i64::MAX;

/// Kind of change a snapshot records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommitKind {
    /// New data files were added
    Append,
    /// Files were rewritten without changing data
    Compact,
    /// Data was replaced
    Overwrite,
}

/// Content of `snapshot/snapshot-<id>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Descriptor layout version
    pub version: i32,
    /// Snapshot id, starting at 1
    pub id: i64,
    /// Schema the snapshot was written with
    pub schema_id: i64,
    /// Manifest list of all files before this snapshot
    pub base_manifest_list: Option<String>,
    /// Manifest list of the files this snapshot adds
    pub delta_manifest_list: String,
    /// Manifest list of changelog files
    pub changelog_manifest_list: Option<String>,
    /// Index manifest
    pub index_manifest: Option<String>,
    /// Identity of the committing writer
    pub commit_user: String,
    /// Commit identifier within `commit_user`
    pub commit_identifier: i64,
    /// Kind of change
    pub commit_kind: CommitKind,
    /// Commit time, milliseconds since the Unix epoch
    pub time_millis: i64,
    /// Log system offsets per bucket
    pub log_offsets: BTreeMap<i32, i64>,
    /// Rows visible in this snapshot
    pub total_record_count: i64,
    /// Rows added by this snapshot
    pub delta_record_count: i64,
    /// Rows in changelog files
    pub changelog_record_count: i64,
    /// Event-time watermark
    pub watermark: i64,
    /// Statistics file
    pub statistics: Option<String>,
}

impl Snapshot {
    /// Descriptor of an append commit
    pub fn append(
        id: i64,
        schema_id: i64,
        commit_user: impl Into<String>,
        base_manifest_list: Option<String>,
        delta_manifest_list: impl Into<String>,
    ) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            id,
            schema_id,
            base_manifest_list,
            delta_manifest_list: delta_manifest_list.into(),
            changelog_manifest_list: None,
            index_manifest: None,
            commit_user: commit_user.into(),
            commit_identifier: BATCH_COMMIT_IDENTIFIER,
            commit_kind: CommitKind::Append,
            time_millis: 0,
            log_offsets: BTreeMap::new(),
            total_record_count: 0,
            delta_record_count: 0,
            changelog_record_count: 0,
            watermark: i64::MIN,
            statistics: None,
        }
    }
}
