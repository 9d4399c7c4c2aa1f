//! # Snapshot Commit
//!
//! Publishes a set of data files as a new snapshot. The order is fixed:
//!
//! 1. manifest
//! 2. manifest list
//! 3. snapshot descriptor
//! 4. hint files
//!
//! Readers only discover snapshots through the hints, so a failure at any
//! step leaves the table at its previous snapshot. Artifacts written before
//! the failure are unreferenced and harmless.

use chrono::Utc;

use crate::format::{CommitContext, TableFormat};
use crate::schema::TableSchema;
use crate::writer::{CommitInfo, DataFileInfo, TableError};

/// Head of a table's snapshot history as seen by one writer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotChain {
    latest_id: Option<i64>,
    manifest_list: Option<String>,
    total_record_count: i64,
}

impl SnapshotChain {
    /// Chain of a table with no snapshots
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the newest snapshot
    pub fn latest_id(&self) -> Option<i64> {
        self.latest_id
    }

    /// Id the next snapshot gets
    pub fn next_id(&self) -> i64 {
        self.latest_id.map_or(1, |id| id + 1)
    }

    /// Manifest list of the newest snapshot
    pub fn manifest_list(&self) -> Option<&str> {
        self.manifest_list.as_deref()
    }

    /// Rows visible in the newest snapshot
    pub fn total_record_count(&self) -> i64 {
        self.total_record_count
    }

    fn advance(&mut self, info: &CommitInfo) {
        self.latest_id = Some(info.snapshot_id);
        self.manifest_list = Some(info.manifest_list.clone());
        self.total_record_count = info.total_record_count;
    }
}

/// Drives one format through the commit sequence.
#[derive(Debug, Default)]
pub struct SnapshotCommitter {
    chain: SnapshotChain,
}

impl SnapshotCommitter {
    /// Committer for a table with no snapshots
    pub fn new() -> Self {
        Self::default()
    }

    /// Current head of the chain
    pub fn chain(&self) -> &SnapshotChain {
        &self.chain
    }

    /// Commit `files` as the next snapshot.
    ///
    /// The chain only advances once the hints are published; on error it is
    /// unchanged and the commit can be retried.
    pub fn commit(
        &mut self,
        format: &mut dyn TableFormat,
        schema: &TableSchema,
        files: &[DataFileInfo],
    ) -> Result<CommitInfo, TableError> {
        let delta_record_count: i64 = files.iter().map(|f| f.row_count).sum();
        let ctx = CommitContext {
            schema,
            snapshot_id: self.chain.next_id(),
            base_manifest_list: self.chain.manifest_list(),
            delta_record_count,
            total_record_count: self.chain.total_record_count() + delta_record_count,
            timestamp_ms: Utc::now().timestamp_millis(),
        };

        let manifest = format.build_manifest(&ctx, files)?;
        log::debug!(
            "Wrote manifest {} ({} files, {} rows)",
            manifest.name,
            manifest.num_added_files,
            manifest.num_added_rows
        );
        let manifest_list = format.build_manifest_list(&ctx, std::slice::from_ref(&manifest))?;
        format.build_snapshot(&ctx, &manifest_list)?;
        format.publish_hints(&ctx)?;

        let info = CommitInfo {
            snapshot_id: ctx.snapshot_id,
            manifest: manifest.name,
            manifest_list,
            delta_record_count,
            total_record_count: ctx.total_record_count,
        };
        self.chain.advance(&info);

        log::info!(
            "Committed {} snapshot {} at {} ({} rows added, {} total)",
            format.kind(),
            info.snapshot_id,
            format.root().display(),
            info.delta_record_count,
            info.total_record_count
        );
        Ok(info)
    }
}
