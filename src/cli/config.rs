//! TOML configuration file support for power users.
//!
//! Instead of passing many CLI flags, users can specify settings in a config file:
//!
//! ```toml
//! # lakewriter.toml
//! [writer]
//! format = "iceberg"
//! flush_rows = 5000000
//! compression = "zstd"
//! compression_level = 6
//! row_group_size = 500000
//! data_page_size = 1048576
//! write_statistics = true
//! ```
//!
//! Values in the file override the selected profile; CLI flags override the file.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

use lakewriter::format::FormatKind;
use lakewriter::writer::{CompressionType, WriterConfig};

/// Root configuration structure for lakewriter.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Writer settings.
    #[serde(default)]
    pub writer: WriterSection,
}

/// Configuration for the ingest command.
#[derive(Debug, Default, Deserialize)]
pub struct WriterSection {
    /// Table format: "paimon" or "iceberg".
    pub format: Option<String>,

    /// Rows buffered before a data file is written.
    pub flush_rows: Option<usize>,

    /// Data file compression: "snappy", "zstd" or "none".
    pub compression: Option<String>,

    /// ZSTD compression level (1-22), used with compression = "zstd".
    pub compression_level: Option<i32>,

    /// Rows per Parquet row group.
    pub row_group_size: Option<usize>,

    /// Parquet data page size in bytes.
    pub data_page_size: Option<usize>,

    /// Write column chunk statistics.
    pub write_statistics: Option<bool>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// The table format named in the file, if any.
    pub fn format(&self) -> Result<Option<FormatKind>> {
        self.writer
            .format
            .as_deref()
            .map(|s| s.parse::<FormatKind>().map_err(anyhow::Error::msg))
            .transpose()
    }

    /// Apply the file's settings on top of `base`.
    pub fn apply(&self, mut base: WriterConfig) -> Result<WriterConfig> {
        let w = &self.writer;
        if let Some(rows) = w.flush_rows {
            base.flush_threshold_rows = rows;
        }
        match (w.compression.as_deref(), w.compression_level) {
            (None, None) => {}
            (None, Some(level)) | (Some("zstd"), Some(level)) => {
                base.compression = CompressionType::Zstd(level)
            }
            (Some("zstd"), None) => base.compression = CompressionType::Zstd(3),
            (Some("snappy"), _) => base.compression = CompressionType::Snappy,
            (Some("none") | Some("uncompressed"), _) => {
                base.compression = CompressionType::Uncompressed
            }
            (Some(other), _) => bail!("Unknown compression '{other}'"),
        }
        if let Some(size) = w.row_group_size {
            base.row_group_size = size;
        }
        if let Some(size) = w.data_page_size {
            base.data_page_size = size;
        }
        if let Some(stats) = w.write_statistics {
            base.write_statistics = stats;
        }
        Ok(base)
    }
}
