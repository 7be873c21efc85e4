//! WAL (Write-Ahead Log) module
//!
//! - `writer`: frame encoding and appends (WalWriter)
//! - `reader`: frame decoding with corruption detection (WalReader)
//!
//! # Frame format
//!
//! ```text
//! [u32 LE payload length][u32 LE crc32(payload)][payload: msgpack WalEntry]
//! ```
//!
//! A frame is the unit of atomicity: a torn or corrupted frame and
//! everything after it is discarded on recovery.

pub mod reader;
pub mod writer;

pub use reader::{TruncateInfo, WalCorruptionInfo, WalReadResult, WalReader};
pub use writer::WalWriter;

use niaga_core::{Key, NiagaError, NiagaResult, Row};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// File name of the WAL inside the data directory
pub const WAL_FILE: &str = "niaga.wal";

/// Bytes of frame header (length + checksum)
pub const FRAME_HEADER_LEN: usize = 8;

/// Upper bound on a single frame payload; larger lengths are corruption
pub const MAX_FRAME_LEN: usize = 64 * 1024 * 1024;

/// When committed transactions reach the disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurabilityMode {
    /// fsync after every commit
    #[default]
    Strict,
    /// Flush to the OS after every commit, fsync on checkpoint and close
    Buffered,
    /// No files at all (tests, scratch databases)
    InMemory,
}

impl DurabilityMode {
    /// Whether the mode writes files
    pub fn is_persistent(&self) -> bool {
        !matches!(self, DurabilityMode::InMemory)
    }

    /// Config-file name
    pub fn as_str(&self) -> &'static str {
        match self {
            DurabilityMode::Strict => "strict",
            DurabilityMode::Buffered => "buffered",
            DurabilityMode::InMemory => "in_memory",
        }
    }
}

impl fmt::Display for DurabilityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DurabilityMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(DurabilityMode::Strict),
            "buffered" => Ok(DurabilityMode::Buffered),
            "in_memory" | "memory" => Ok(DurabilityMode::InMemory),
            other => Err(format!("unknown durability mode '{}'", other)),
        }
    }
}

/// One committed transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalEntry {
    /// Commit version
    pub version: u64,
    /// Commit time, milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Rows written
    pub writes: Vec<(Key, Row)>,
    /// Keys deleted
    pub deletes: Vec<Key>,
}

impl WalEntry {
    /// Encode the msgpack payload of a frame
    pub fn encode(&self) -> NiagaResult<Vec<u8>> {
        rmp_serde::to_vec_named(self).map_err(NiagaError::serialization)
    }

    /// Decode a frame payload
    pub fn decode(bytes: &[u8]) -> NiagaResult<Self> {
        rmp_serde::from_slice(bytes).map_err(NiagaError::serialization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_durability_mode_names() {
        for mode in [DurabilityMode::Strict, DurabilityMode::Buffered, DurabilityMode::InMemory] {
            assert_eq!(mode.as_str().parse::<DurabilityMode>().unwrap(), mode);
        }
        assert!("fast".parse::<DurabilityMode>().is_err());
        assert!(!DurabilityMode::InMemory.is_persistent());
    }
}
