//! Snapshot files
//!
//! # Format
//!
//! ```text
//! [8 bytes magic "NIAGASNP"][u32 LE format][u32 LE crc32(body)][u64 LE body length]
//! [body: zstd(msgpack SnapshotData)]
//! ```
//!
//! Snapshots are written to a temporary file, fsynced and renamed over
//! the previous snapshot, so a crash leaves either the old or the new
//! snapshot in place, never a partial one.

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use niaga_core::{Key, NiagaError, NiagaResult, Versioned};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tracing::info;

/// File name of the snapshot inside the data directory
pub const SNAPSHOT_FILE: &str = "niaga.snapshot";

const MAGIC: &[u8; 8] = b"NIAGASNP";
const FORMAT: u32 = 1;
const HEADER_LEN: usize = 8 + 4 + 4 + 8;
const ZSTD_LEVEL: i32 = 3;

/// Every row as of one committed version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotData {
    /// Last commit included
    pub version: u64,
    /// When the snapshot was taken, milliseconds since the Unix epoch
    pub created_at: i64,
    /// All rows, sorted by key
    pub rows: Vec<(Key, Versioned)>,
}

/// Encode a snapshot to bytes
pub fn encode_snapshot(data: &SnapshotData) -> NiagaResult<Vec<u8>> {
    let packed = rmp_serde::to_vec_named(data).map_err(NiagaError::serialization)?;
    let body = zstd::encode_all(packed.as_slice(), ZSTD_LEVEL)
        .map_err(|e| NiagaError::storage("compress snapshot", e))?;

    let mut out = Vec::with_capacity(HEADER_LEN + body.len());
    out.extend_from_slice(MAGIC);
    out.write_u32::<LittleEndian>(FORMAT)?;
    out.write_u32::<LittleEndian>(crc32fast::hash(&body))?;
    out.write_u64::<LittleEndian>(body.len() as u64)?;
    out.extend_from_slice(&body);
    Ok(out)
}

/// Decode snapshot bytes, validating magic, format and checksum
pub fn decode_snapshot(bytes: &[u8]) -> NiagaResult<SnapshotData> {
    if bytes.len() < HEADER_LEN || &bytes[..8] != MAGIC {
        return Err(NiagaError::corruption("snapshot header missing or invalid"));
    }
    let format = LittleEndian::read_u32(&bytes[8..12]);
    if format != FORMAT {
        return Err(NiagaError::corruption(format!(
            "unsupported snapshot format {}",
            format
        )));
    }
    let crc = LittleEndian::read_u32(&bytes[12..16]);
    let len = LittleEndian::read_u64(&bytes[16..24]) as usize;
    let body = &bytes[HEADER_LEN..];
    if body.len() != len {
        return Err(NiagaError::corruption(format!(
            "snapshot body is {} bytes, header says {}",
            body.len(),
            len
        )));
    }
    if crc32fast::hash(body) != crc {
        return Err(NiagaError::corruption("snapshot checksum mismatch"));
    }
    let packed = zstd::decode_all(body).map_err(|e| NiagaError::storage("decompress snapshot", e))?;
    rmp_serde::from_slice(&packed).map_err(NiagaError::serialization)
}

/// Atomically replace the snapshot at `path`
pub fn write_snapshot(path: impl AsRef<Path>, data: &SnapshotData) -> NiagaResult<u64> {
    let path = path.as_ref();
    let bytes = encode_snapshot(data)?;
    let tmp = path.with_extension("snapshot.tmp");
    {
        let mut file = File::create(&tmp)
            .map_err(|e| NiagaError::storage(format!("create {}", tmp.display()), e))?;
        file.write_all(&bytes)
            .map_err(|e| NiagaError::storage("write snapshot", e))?;
        file.sync_all()
            .map_err(|e| NiagaError::storage("fsync snapshot", e))?;
    }
    std::fs::rename(&tmp, path)
        .map_err(|e| NiagaError::storage(format!("install snapshot {}", path.display()), e))?;
    info!(
        version = data.version,
        rows = data.rows.len(),
        bytes = bytes.len(),
        "snapshot written"
    );
    Ok(bytes.len() as u64)
}

/// Read the snapshot at `path`; `None` when there is none
pub fn read_snapshot(path: impl AsRef<Path>) -> NiagaResult<Option<SnapshotData>> {
    let path = path.as_ref();
    match std::fs::read(path) {
        Ok(bytes) => decode_snapshot(&bytes).map(Some),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(NiagaError::storage(format!("read {}", path.display()), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use niaga_core::{Row, Table};
    use serde_json::json;
    use tempfile::TempDir;

    fn sample() -> SnapshotData {
        SnapshotData {
            version: 42,
            created_at: 1_700_000_000_000,
            rows: vec![
                (
                    Key::sequence(Table::Sales),
                    Versioned::new(Row::from_value(json!(7)), 40, 0),
                ),
                (
                    Key::new(Table::Products, "PRD001"),
                    Versioned::new(Row::from_value(json!({"name": "Kopi", "price": 5000})), 42, 1),
                ),
            ],
        }
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SNAPSHOT_FILE);
        write_snapshot(&path, &sample()).unwrap();
        assert_eq!(read_snapshot(&path).unwrap(), Some(sample()));
        assert!(!path.with_extension("snapshot.tmp").exists());
    }

    #[test]
    fn test_missing_snapshot_is_none() {
        let dir = TempDir::new().unwrap();
        assert_eq!(read_snapshot(dir.path().join(SNAPSHOT_FILE)).unwrap(), None);
    }

    #[test]
    fn test_bit_flip_is_detected() {
        let mut bytes = encode_snapshot(&sample()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let err = decode_snapshot(&bytes).unwrap_err();
        assert!(matches!(err, NiagaError::Corruption { .. }));
    }

    #[test]
    fn test_bad_magic_is_detected() {
        let mut bytes = encode_snapshot(&sample()).unwrap();
        bytes[0] = b'X';
        assert!(decode_snapshot(&bytes).is_err());
        assert!(decode_snapshot(b"short").is_err());
    }
}
