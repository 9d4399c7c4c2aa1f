use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::{EnabledStatistics, WriterProperties};

/// Rows buffered before a data file is written
pub const DEFAULT_FLUSH_THRESHOLD_ROWS: usize = 10_000_000;

/// Compression options for Parquet data files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionType {
    /// ZSTD compression at the given level
    Zstd(i32),
    /// Snappy compression (faster, slightly larger files)
    Snappy,
    /// No compression (fastest write, largest files)
    Uncompressed,
}

impl Default for CompressionType {
    fn default() -> Self {
        Self::Snappy
    }
}

/// Configuration for a table writer
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Buffered row count at which a data file is written
    pub flush_threshold_rows: usize,

    /// Compression type for data files
    pub compression: CompressionType,

    /// Target row group size (number of rows per group)
    pub row_group_size: usize,

    /// Data page size in bytes
    pub data_page_size: usize,

    /// Whether to write column chunk statistics
    pub write_statistics: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            flush_threshold_rows: DEFAULT_FLUSH_THRESHOLD_ROWS,
            // Snappy is what lakehouse engines default to for Parquet
            compression: CompressionType::Snappy,
            row_group_size: 1024 * 1024,
            data_page_size: 1024 * 1024,
            write_statistics: true,
        }
    }
}

impl WriterConfig {
    /// Configuration favouring small files over write speed
    pub fn max_compression() -> Self {
        Self {
            compression: CompressionType::Zstd(9),
            data_page_size: 2 * 1024 * 1024,
            ..Self::default()
        }
    }

    /// Configuration favouring write speed
    pub fn fast_write() -> Self {
        Self {
            compression: CompressionType::Uncompressed,
            write_statistics: false,
            ..Self::default()
        }
    }

    /// Set the flush threshold, keeping the other settings
    pub fn with_flush_threshold(mut self, rows: usize) -> Self {
        self.flush_threshold_rows = rows;
        self
    }

    /// Create Parquet writer properties from this configuration
    pub(crate) fn to_writer_properties(&self) -> WriterProperties {
        let compression = match self.compression {
            CompressionType::Zstd(level) => {
                Compression::ZSTD(ZstdLevel::try_new(level).unwrap_or_default())
            }
            CompressionType::Snappy => Compression::SNAPPY,
            CompressionType::Uncompressed => Compression::UNCOMPRESSED,
        };

        let statistics = if self.write_statistics {
            EnabledStatistics::Chunk
        } else {
            EnabledStatistics::None
        };

        WriterProperties::builder()
            .set_compression(compression)
            .set_data_page_size_limit(self.data_page_size)
            .set_statistics_enabled(statistics)
            .set_max_row_group_size(self.row_group_size)
            .set_created_by(format!("lakewriter version {}", env!("CARGO_PKG_VERSION")))
            .build()
    }
}
