use std::fmt;

use super::data_file::DataFileInfo;

/// What a successful commit produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Id of the snapshot written
    pub snapshot_id: i64,
    /// Manifest file name, relative to the format's metadata directory
    pub manifest: String,
    /// Manifest list file name, relative to the format's metadata directory
    pub manifest_list: String,
    /// Rows added by this commit
    pub delta_record_count: i64,
    /// Rows visible in the snapshot
    pub total_record_count: i64,
}

/// Statistics from a closed table writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterStats {
    /// Batches accepted (zero-row batches are not counted)
    pub batches_written: usize,
    /// Rows written across all data files
    pub rows_written: i64,
    /// Data files written, in flush order
    pub data_files: Vec<DataFileInfo>,
    /// The commit, or `None` when no data was written
    pub commit: Option<CommitInfo>,
}

impl WriterStats {
    /// Total bytes across data files
    pub fn data_bytes(&self) -> i64 {
        self.data_files.iter().map(|f| f.size_bytes).sum()
    }
}

impl fmt::Display for WriterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} rows from {} batches in {} data file(s), {} bytes",
            self.rows_written,
            self.batches_written,
            self.data_files.len(),
            self.data_bytes()
        )?;
        match &self.commit {
            Some(commit) => write!(f, "; committed snapshot {}", commit.snapshot_id),
            None => write!(f, "; nothing committed"),
        }
    }
}
