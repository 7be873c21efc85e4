//! WAL reader
//!
//! Reads frames in order and stops at the first frame that is truncated,
//! fails its checksum or does not decode. Everything before that point is
//! returned; the byte offset of the last good frame lets recovery cut the
//! bad tail off so new appends follow valid data.

use super::{WalEntry, FRAME_HEADER_LEN, MAX_FRAME_LEN};
use byteorder::{ByteOrder, LittleEndian};
use niaga_core::{NiagaError, NiagaResult};
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;
use tracing::warn;

/// Where and why reading stopped early
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalCorruptionInfo {
    /// Byte offset of the bad frame
    pub offset: u64,
    /// What was wrong with it
    pub reason: String,
}

/// Outcome of reading a WAL file
#[derive(Debug, Clone, Default)]
pub struct WalReadResult {
    /// Entries of every valid frame, in file order
    pub entries: Vec<WalEntry>,
    /// Length of the valid prefix in bytes
    pub valid_bytes: u64,
    /// Total file length in bytes
    pub file_bytes: u64,
    /// Set when reading stopped before the end of the file
    pub corruption: Option<WalCorruptionInfo>,
}

impl WalReadResult {
    /// Whether the whole file was valid
    pub fn is_clean(&self) -> bool {
        self.corruption.is_none()
    }
}

/// Result of cutting a bad tail off the WAL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncateInfo {
    /// File length before
    pub original_len: u64,
    /// File length after
    pub truncated_to: u64,
}

impl TruncateInfo {
    /// Bytes discarded
    pub fn discarded(&self) -> u64 {
        self.original_len - self.truncated_to
    }
}

/// Decodes WAL files
pub struct WalReader;

impl WalReader {
    /// Read every valid frame of the WAL at `path`
    ///
    /// A missing file reads as empty.
    pub fn read(path: impl AsRef<Path>) -> NiagaResult<WalReadResult> {
        let path = path.as_ref();
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(WalReadResult::default()),
            Err(e) => return Err(NiagaError::storage(format!("read WAL {}", path.display()), e)),
        };
        let result = Self::decode_frames(&bytes);
        if let Some(info) = &result.corruption {
            warn!(
                offset = info.offset,
                reason = %info.reason,
                entries = result.entries.len(),
                "WAL read stopped at bad frame"
            );
        }
        Ok(result)
    }

    /// Decode frames from an in-memory buffer
    pub fn decode_frames(bytes: &[u8]) -> WalReadResult {
        let mut result = WalReadResult {
            file_bytes: bytes.len() as u64,
            ..Default::default()
        };
        let mut offset = 0usize;

        while offset < bytes.len() {
            let remaining = bytes.len() - offset;
            let stop = |reason: String| WalCorruptionInfo {
                offset: offset as u64,
                reason,
            };

            if remaining < FRAME_HEADER_LEN {
                result.corruption = Some(stop(format!("truncated frame header ({} bytes)", remaining)));
                break;
            }
            let len = LittleEndian::read_u32(&bytes[offset..offset + 4]) as usize;
            let crc = LittleEndian::read_u32(&bytes[offset + 4..offset + 8]);
            if len > MAX_FRAME_LEN {
                result.corruption = Some(stop(format!("frame length {} exceeds limit", len)));
                break;
            }
            if remaining - FRAME_HEADER_LEN < len {
                result.corruption = Some(stop(format!(
                    "truncated payload: expected {} bytes, found {}",
                    len,
                    remaining - FRAME_HEADER_LEN
                )));
                break;
            }

            let payload = &bytes[offset + FRAME_HEADER_LEN..offset + FRAME_HEADER_LEN + len];
            let actual = crc32fast::hash(payload);
            if actual != crc {
                result.corruption = Some(stop(format!(
                    "checksum mismatch: stored {:08x}, computed {:08x}",
                    crc, actual
                )));
                break;
            }
            match WalEntry::decode(payload) {
                Ok(entry) => result.entries.push(entry),
                Err(e) => {
                    result.corruption = Some(stop(format!("undecodable entry: {}", e)));
                    break;
                }
            }
            offset += FRAME_HEADER_LEN + len;
            result.valid_bytes = offset as u64;
        }

        result
    }

    /// Cut the WAL back to its valid prefix
    pub fn truncate_to_valid(path: impl AsRef<Path>, read: &WalReadResult) -> NiagaResult<TruncateInfo> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .write(true)
            .open(path)
            .map_err(|e| NiagaError::storage(format!("open WAL {}", path.display()), e))?;
        file.set_len(read.valid_bytes)
            .map_err(|e| NiagaError::storage("truncate WAL", e))?;
        file.sync_all()
            .map_err(|e| NiagaError::storage("fsync WAL", e))?;
        let info = TruncateInfo {
            original_len: read.file_bytes,
            truncated_to: read.valid_bytes,
        };
        warn!(
            discarded = info.discarded(),
            truncated_to = info.truncated_to,
            "WAL tail truncated"
        );
        Ok(info)
    }
}
