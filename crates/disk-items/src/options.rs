//! Configuration options for a filesystem.
//!
//! This module provides the `FileSystemOptions` struct which controls the
//! size limit for files and where timestamps come from.

use serde::{Deserialize, Deserializer, Serialize};

/// Largest size a file may ever have, in bytes.
pub const MAX_FILE_SIZE: u64 = i64::MAX as u64;

/// Configuration options for a [`FileSystem`](crate::FileSystem).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSystemOptions {
    /// Maximum file size in bytes (at most [`MAX_FILE_SIZE`]).
    #[serde(deserialize_with = "capped_file_size")]
    pub max_file_size: u64,

    /// Source of creation and modification timestamps.
    pub clock: ClockMode,
}

impl Default for FileSystemOptions {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
            clock: ClockMode::default(),
        }
    }
}

impl FileSystemOptions {
    /// Create new options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum file size, capped at [`MAX_FILE_SIZE`].
    pub fn max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size.min(MAX_FILE_SIZE);
        self
    }

    /// Set the timestamp source.
    pub fn clock(mut self, clock: ClockMode) -> Self {
        self.clock = clock;
        self
    }
}

fn capped_file_size<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(u64::deserialize(deserializer)?.min(MAX_FILE_SIZE))
}

/// Where timestamps come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockMode {
    /// Wall-clock time (default).
    #[default]
    System,

    /// One second past the epoch for the first reading, then one more
    /// second for every following reading.
    Logical,
}
