//! Blocking file helpers for table metadata.
//!
//! Metadata artifacts are small and written whole. Files that readers treat
//! as immutable once referenced (snapshots, schema files) go through
//! [`write_durable`]; pointer files that are overwritten in place (hints)
//! go through [`write_atomic`] so a reader never sees a partial value.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Create or truncate `path`, write `contents` and fsync the file.
pub fn write_durable(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

/// Replace `path` with `contents` via a synced temporary sibling and a rename.
///
/// On failure the temporary file is removed and `path` keeps its old value.
pub fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let tmp_path = tmp_sibling(path);
    let result = write_durable(&tmp_path, contents).and_then(|_| fs::rename(&tmp_path, path));
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

/// Read a hint file holding a decimal snapshot id.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn read_hint(path: &Path) -> Result<Option<i64>, crate::writer::TableError> {
    let contents = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let trimmed = contents.trim();
    trimmed.parse::<i64>().map(Some).map_err(|e| {
        crate::writer::TableError::CorruptMetadata(format!(
            "hint {} has invalid content {trimmed:?}: {e}",
            path.display()
        ))
    })
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
