//! # lakewriter - Append-Only Lakehouse Table Writer
//!
//! `lakewriter` turns a stream of Arrow record batches into a committed,
//! append-only lakehouse table on the local filesystem: Parquet data files
//! plus the manifest, manifest-list and snapshot metadata a table reader
//! needs to discover them.
//!
//! ## Key Features
//!
//! - **Two Table Formats**: Apache Paimon append-only tables with binary
//!   container manifests, or Apache Iceberg tables with JSON metadata.
//!
//! - **Streaming Ingest**: Batches are buffered up to a row threshold and
//!   written as Parquet data files, so memory stays bounded.
//!
//! - **Crash-Safe Commits**: Artifacts are written in dependency order and the
//!   snapshot only becomes visible when the hint file is atomically replaced.
//!
//! - **Hand-Written Codec**: The container encoder in [`avro`] has no
//!   dependencies beyond `uuid` and is property-tested.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use arrow::array::{Float64Array, Int64Array};
//! use arrow::datatypes::{DataType, Field, Schema};
//! use arrow::record_batch::RecordBatch;
//! use lakewriter::prelude::*;
//!
//! let schema = Arc::new(Schema::new(vec![
//!     Field::new("l_orderkey", DataType::Int64, false),
//!     Field::new("l_extendedprice", DataType::Float64, false),
//! ]));
//! let batch = RecordBatch::try_new(
//!     schema,
//!     vec![
//!         Arc::new(Int64Array::from(vec![1, 2])),
//!         Arc::new(Float64Array::from(vec![17.5, 3.25])),
//!     ],
//! )?;
//!
//! let mut writer = TableWriter::new("lineitem", FormatKind::Paimon, WriterConfig::default());
//! writer.write_batch(&batch)?;
//! let stats = writer.close()?;
//! println!("{stats}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! This creates a directory structure:
//! ```text
//! lineitem/
//! ├── OPTIONS
//! ├── schema/schema-0
//! ├── bucket-0/data-<uuid>-0.parquet
//! ├── manifest/manifest-<uuid>-0
//! ├── manifest/manifest-list-<uuid>-0
//! └── snapshot/{snapshot-1, EARLIEST, LATEST}
//! ```
//!
//! ## Architecture
//!
//! - [`avro`]: zigzag primitives and the object-container file writer/reader
//! - [`schema`]: the table schema derived from the first batch
//! - [`writer`]: batch accumulation, Parquet data files and [`writer::TableWriter`]
//! - [`format`]: per-format layout and metadata artifacts
//! - [`commit`]: the commit sequence and snapshot chain
//! - [`storage`]: durable and atomic file writes

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod avro;
pub mod commit;
pub mod format;
pub mod schema;
pub mod storage;
pub mod writer;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::format::FormatKind;
    pub use crate::schema::{FieldType, TableSchema};
    pub use crate::writer::{
        CommitInfo, CompressionType, DataFileInfo, TableError, TableWriter, WriterConfig,
        WriterStats,
    };
}
