//! Recovery: rebuild the store from the snapshot and the WAL
//!
//! 1. Load the snapshot, if present, into an empty store
//! 2. Read the WAL; apply every entry newer than the store's version
//! 3. If the WAL ends in a bad frame, cut it back to the last good frame
//!
//! Entries at or below the snapshot version are skipped, which makes a
//! crash between "snapshot installed" and "WAL truncated" harmless.

use niaga_core::{NiagaError, NiagaResult};
use niaga_durability::{read_snapshot, WalReader, SNAPSHOT_FILE, WAL_FILE};
use niaga_storage::ShardedStore;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// What recovery found and did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryInfo {
    /// Version of the loaded snapshot
    pub snapshot_version: Option<u64>,
    /// Rows loaded from the snapshot
    pub snapshot_rows: usize,
    /// WAL entries applied
    pub wal_replayed: usize,
    /// WAL entries already covered by the snapshot
    pub wal_skipped: usize,
    /// Bytes cut from a corrupted WAL tail
    pub wal_truncated_bytes: u64,
    /// Store version after recovery
    pub version: u64,
}

/// Recover `store` from the files in `dir`
pub fn recover(dir: &Path, store: &ShardedStore) -> NiagaResult<RecoveryInfo> {
    let mut info = RecoveryInfo::default();

    if let Some(snapshot) = read_snapshot(dir.join(SNAPSHOT_FILE))? {
        info.snapshot_version = Some(snapshot.version);
        info.snapshot_rows = snapshot.rows.len();
        for (key, versioned) in snapshot.rows {
            store.put(key, versioned);
        }
        store.set_version(snapshot.version);
    }

    let wal_path = dir.join(WAL_FILE);
    let read = WalReader::read(&wal_path)?;
    for entry in &read.entries {
        let current = store.version();
        if entry.version <= current {
            info.wal_skipped += 1;
            continue;
        }
        if entry.version != current + 1 {
            return Err(NiagaError::corruption(format!(
                "WAL version gap: expected {}, found {}",
                current + 1,
                entry.version
            )));
        }
        store.apply_batch(&entry.writes, &entry.deletes, entry.version, entry.timestamp);
        info.wal_replayed += 1;
    }

    if read.corruption.is_some() {
        let cut = WalReader::truncate_to_valid(&wal_path, &read)?;
        info.wal_truncated_bytes = cut.discarded();
    }

    info.version = store.version();
    if info.wal_skipped > 0 {
        warn!(skipped = info.wal_skipped, "WAL entries already in snapshot");
    }
    info!(
        version = info.version,
        snapshot_rows = info.snapshot_rows,
        replayed = info.wal_replayed,
        "recovery complete"
    );
    Ok(info)
}
