//! Write profiles for common use cases.
//!
//! Profiles provide sensible defaults for data file compression, hiding
//! low-level Parquet settings from end users.

use std::fmt;
use std::str::FromStr;

use lakewriter::writer::WriterConfig;

/// Write profiles for common use cases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Profile {
    /// Prioritize speed over file size.
    ///
    /// - Compression: none
    /// - Column statistics: off
    Fast,

    /// Balance between speed and file size (default).
    ///
    /// - Compression: Snappy
    /// - Column statistics: on
    #[default]
    Balanced,

    /// Smallest files, slower writes.
    ///
    /// - Compression: ZSTD level 9
    /// - Data page size: 2 MiB
    MaxCompression,
}

impl Profile {
    /// Returns the writer configuration for this profile.
    pub fn writer_config(&self) -> WriterConfig {
        match self {
            Profile::Fast => WriterConfig::fast_write(),
            Profile::Balanced => WriterConfig::default(),
            Profile::MaxCompression => WriterConfig::max_compression(),
        }
    }

    /// Returns all available profile names.
    pub fn variants() -> &'static [&'static str] {
        &["fast", "balanced", "max-compression"]
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Fast => write!(f, "fast"),
            Profile::Balanced => write!(f, "balanced"),
            Profile::MaxCompression => write!(f, "max-compression"),
        }
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(Profile::Fast),
            "balanced" | "default" => Ok(Profile::Balanced),
            "max-compression" | "maxcompression" | "max" => Ok(Profile::MaxCompression),
            _ => Err(format!(
                "Unknown profile '{}'. Valid options: {}",
                s,
                Profile::variants().join(", ")
            )),
        }
    }
}
