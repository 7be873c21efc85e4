//! Durability for niaga
//!
//! - `wal`: append-only write-ahead log of committed transactions
//! - `snapshot`: compressed point-in-time image of every row
//!
//! Recovery loads the snapshot (if any) and replays WAL entries with a
//! newer version on top of it. A checkpoint writes a fresh snapshot and
//! truncates the WAL.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod snapshot;
pub mod wal;

pub use snapshot::{read_snapshot, write_snapshot, SnapshotData, SNAPSHOT_FILE};
pub use wal::{
    DurabilityMode, TruncateInfo, WalCorruptionInfo, WalEntry, WalReadResult, WalReader,
    WalWriter, WAL_FILE,
};
