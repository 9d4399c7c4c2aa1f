//! # Table Writer Module
//!
//! Streams Arrow record batches into an append-only table.
//!
//! ## Design Principles
//!
//! 1. **Lazy Creation**: Nothing touches the filesystem until the first
//!    non-empty batch arrives; its schema becomes the table schema.
//!
//! 2. **Bounded Buffering**: Batches are held in memory until the flush
//!    threshold is reached, then written as one Parquet data file.
//!
//! 3. **Single Commit**: All data files of a writer are published together
//!    as one snapshot when the writer is closed.
//!
//! 4. **Configurable Compression**: Supports Snappy (default), ZSTD and
//!    uncompressed data files.

mod accumulator;
mod config;
mod data_file;
mod error;
mod stats;
mod table_writer;

#[cfg(test)]
mod tests;

pub use accumulator::BatchAccumulator;
pub use config::{CompressionType, WriterConfig, DEFAULT_FLUSH_THRESHOLD_ROWS};
pub use data_file::{DataFileInfo, DataFileWriter, ParquetFileWriter};
pub use error::TableError;
pub use stats::{CommitInfo, WriterStats};
pub use table_writer::{TableWriter, WriterState};
