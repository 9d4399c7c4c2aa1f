//! # Binary Container Codec
//!
//! A restricted, hand-written implementation of the Avro binary encoding and
//! object-container file layout, sufficient for the manifest artifacts of a
//! lakehouse table.
//!
//! ## Layout of a container file
//!
//! ```text
//! magic            "Obj" 0x01
//! metadata         map<string, bytes>: avro.schema, avro.codec ("null")
//! sync marker      16 random bytes
//! data block       zigzag(record count) zigzag(byte length) records... sync marker
//! ```
//!
//! Only the `null` codec is written and every file holds exactly one data
//! block. Records are encoded by the caller with the primitives in
//! [`encoding`] in the exact field order of the declared schema.
//!
//! The [`decode`] and [`reader`] modules are the inverse, used to inspect
//! committed tables and to verify written files.

pub mod container;
pub mod decode;
pub mod encoding;
mod error;
pub mod reader;


pub use container::{ContainerWriter, CODEC_NULL, MAGIC, SYNC_MARKER_LEN};
pub use decode::Decoder;
pub use error::AvroError;
pub use reader::{ContainerFile, DataBlock};
