//! The database: committed store, WAL and commit protocol
//!
//! # Design
//!
//! - Transactions run without locks against the committed store and
//!   buffer their writes ([`TransactionContext`])
//! - Commit takes one mutex that also guards the WAL writer, validates the
//!   transaction's read and scan sets, assigns the next version, appends
//!   the WAL frame and only then applies the batch to the store
//! - A conflicting commit is retried by [`Database::transaction`], which
//!   re-runs the closure against fresh state
//! - Applying a batch takes the apply gate exclusively and closures run
//!   with it shared, so no closure sees half of a commit
//!
//! Business time comes from a [`Clock`], so tests can pin dates.

use crate::config::NiagaConfig;
use crate::recovery::{recover, RecoveryInfo};
use niaga_concurrency::{validate_transaction, TransactionContext};
use niaga_core::{Clock, NiagaError, NiagaResult, SystemClock, Table};
use niaga_durability::{
    write_snapshot, DurabilityMode, SnapshotData, WalEntry, WalWriter, SNAPSHOT_FILE, WAL_FILE,
};
use niaga_storage::ShardedStore;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a checkpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointInfo {
    /// Version captured by the snapshot
    pub version: u64,
    /// Rows written
    pub rows: usize,
    /// Snapshot size in bytes (0 for in-memory databases)
    pub bytes: u64,
}

/// Size and shape of the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseStats {
    /// Last committed version
    pub version: u64,
    /// Total rows
    pub rows: usize,
    /// Rows per table, tables with no rows omitted
    pub tables: Vec<(Table, usize)>,
    /// Current WAL size in bytes
    pub wal_bytes: u64,
    /// Durability mode in effect
    pub durability: DurabilityMode,
    /// Data directory, if persistent
    pub data_dir: Option<PathBuf>,
}

/// An open niaga database
pub struct Database {
    data_dir: Option<PathBuf>,
    config: NiagaConfig,
    store: Arc<ShardedStore>,
    /// Commit lock; holds the WAL writer of persistent databases
    wal: Mutex<Option<WalWriter>>,
    /// Shared while a closure reads the store, exclusive while a batch lands
    apply_gate: RwLock<()>,
    clock: Arc<dyn Clock>,
    commits_since_checkpoint: AtomicU64,
    recovery: RecoveryInfo,
}

impl Database {
    /// Open (or create) the database in `dir` using `dir/niaga.toml`
    pub fn open(dir: impl AsRef<Path>) -> NiagaResult<Self> {
        let dir = dir.as_ref();
        let config = NiagaConfig::load(dir)?;
        Self::open_with(dir, config, Arc::new(SystemClock))
    }

    /// Open with an explicit config and clock
    ///
    /// An in-memory durability mode ignores `dir`.
    pub fn open_with(
        dir: impl AsRef<Path>,
        config: NiagaConfig,
        clock: Arc<dyn Clock>,
    ) -> NiagaResult<Self> {
        if !config.storage.durability.is_persistent() {
            return Ok(Self::in_memory(config, clock));
        }

        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)
            .map_err(|e| NiagaError::storage(format!("create {}", dir.display()), e))?;

        let store = Arc::new(ShardedStore::new());
        let recovery = recover(&dir, &store)?;
        let writer = WalWriter::open(dir.join(WAL_FILE), config.storage.durability)?;

        info!(
            path = %dir.display(),
            version = recovery.version,
            durability = %config.storage.durability,
            "database opened"
        );

        Ok(Self {
            data_dir: Some(dir),
            config,
            store,
            wal: Mutex::new(Some(writer)),
            apply_gate: RwLock::new(()),
            clock,
            commits_since_checkpoint: AtomicU64::new(recovery.wal_replayed as u64),
            recovery,
        })
    }

    /// A database that never touches the disk
    pub fn ephemeral() -> Self {
        Self::ephemeral_with_clock(Arc::new(SystemClock))
    }

    /// An in-memory database reading time from `clock`
    pub fn ephemeral_with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::in_memory(NiagaConfig::in_memory(), clock)
    }

    fn in_memory(mut config: NiagaConfig, clock: Arc<dyn Clock>) -> Self {
        config.storage.durability = DurabilityMode::InMemory;
        Self {
            data_dir: None,
            config,
            store: Arc::new(ShardedStore::new()),
            wal: Mutex::new(None),
            apply_gate: RwLock::new(()),
            clock,
            commits_since_checkpoint: AtomicU64::new(0),
            recovery: RecoveryInfo::default(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Configuration in effect
    pub fn config(&self) -> &NiagaConfig {
        &self.config
    }

    /// Data directory of a persistent database
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    /// The business clock
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Last committed version
    pub fn version(&self) -> u64 {
        self.store.version()
    }

    /// What recovery did when the database was opened
    pub fn recovery_info(&self) -> &RecoveryInfo {
        &self.recovery
    }

    /// Row counts and WAL size
    pub fn stats(&self) -> DatabaseStats {
        let tables = Table::ALL
            .iter()
            .map(|t| (*t, self.store.table_len(*t)))
            .filter(|(_, n)| *n > 0)
            .collect();
        let wal_bytes = self.wal.lock().as_ref().map(|w| w.size()).unwrap_or(0);
        DatabaseStats {
            version: self.store.version(),
            rows: self.store.total_entries(),
            tables,
            wal_bytes,
            durability: self.config.storage.durability,
            data_dir: self.data_dir.clone(),
        }
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Begin a transaction at the clock's current time
    pub fn begin(&self) -> TransactionContext {
        TransactionContext::new(Arc::clone(&self.store), self.clock.now())
    }

    /// Validate, log and apply a transaction
    ///
    /// Returns the commit version. A transaction that wrote nothing commits
    /// trivially at the current version.
    pub fn commit(&self, txn: TransactionContext) -> NiagaResult<u64> {
        if txn.is_read_only() {
            return Ok(self.store.version());
        }

        let mut wal = self.wal.lock();

        let validation = validate_transaction(&txn, &self.store);
        if !validation.is_valid() {
            return Err(NiagaError::conflict(validation.describe()));
        }

        let version = self.store.version() + 1;
        let timestamp = self.clock.now().and_utc().timestamp_millis();
        let write_set = txn.into_write_set();
        let entry = WalEntry {
            version,
            timestamp,
            writes: write_set.writes,
            deletes: write_set.deletes,
        };

        if let Some(writer) = wal.as_mut() {
            writer.append(&entry)?;
        }
        {
            let _applying = self.apply_gate.write();
            self.store
                .apply_batch(&entry.writes, &entry.deletes, version, timestamp);
        }
        debug!(
            version,
            writes = entry.writes.len(),
            deletes = entry.deletes.len(),
            "commit"
        );

        let since = self.commits_since_checkpoint.fetch_add(1, Ordering::AcqRel) + 1;
        let every = self.config.storage.snapshot_every;
        if every > 0 && since >= every && wal.is_some() {
            if let Err(e) = self.checkpoint_locked(&mut wal) {
                // the commit itself is durable; the next commit tries again
                warn!(error = %e, "automatic checkpoint failed");
            }
        }

        Ok(version)
    }

    /// Run `f` in a transaction and commit, retrying on conflict
    ///
    /// `f` may run several times; it must not have side effects outside
    /// the transaction. An error from `f` aborts without retry.
    pub fn transaction<T, F>(&self, mut f: F) -> NiagaResult<T>
    where
        F: FnMut(&mut TransactionContext) -> NiagaResult<T>,
    {
        let max_retries = self.config.engine.max_commit_retries;
        let mut attempt = 0u32;
        loop {
            let mut txn = self.begin();
            let out = {
                let _reading = self.apply_gate.read_recursive();
                f(&mut txn)?
            };
            match self.commit(txn) {
                Ok(_) => return Ok(out),
                Err(e) if e.is_retryable() && attempt < max_retries => {
                    attempt += 1;
                    warn!(attempt, error = %e, "commit conflict, retrying");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Run `f` against current state without committing anything
    ///
    /// Every row `f` reads comes from the same committed version.
    pub fn read<T, F>(&self, f: F) -> NiagaResult<T>
    where
        F: FnOnce(&mut TransactionContext) -> NiagaResult<T>,
    {
        let _reading = self.apply_gate.read_recursive();
        let mut txn = self.begin();
        f(&mut txn)
    }

    // ========================================================================
    // Durability
    // ========================================================================

    /// Write a snapshot of every row and truncate the WAL
    pub fn checkpoint(&self) -> NiagaResult<CheckpointInfo> {
        let mut wal = self.wal.lock();
        self.checkpoint_locked(&mut wal)
    }

    fn checkpoint_locked(&self, wal: &mut Option<WalWriter>) -> NiagaResult<CheckpointInfo> {
        let version = self.store.version();
        let (Some(dir), Some(writer)) = (self.data_dir.as_ref(), wal.as_mut()) else {
            return Ok(CheckpointInfo {
                version,
                rows: self.store.total_entries(),
                bytes: 0,
            });
        };

        let data = SnapshotData {
            version,
            created_at: self.clock.now().and_utc().timestamp_millis(),
            rows: self.store.dump(),
        };
        let bytes = write_snapshot(dir.join(SNAPSHOT_FILE), &data)?;
        writer.truncate()?;
        self.commits_since_checkpoint.store(0, Ordering::Release);

        info!(version, rows = data.rows.len(), bytes, "checkpoint complete");
        Ok(CheckpointInfo {
            version,
            rows: data.rows.len(),
            bytes,
        })
    }

    /// Force buffered WAL data to disk
    pub fn flush(&self) -> NiagaResult<()> {
        match self.wal.lock().as_mut() {
            Some(writer) => writer.sync(),
            None => Ok(()),
        }
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        if let Some(writer) = self.wal.get_mut().as_mut() {
            if let Err(e) = writer.sync() {
                warn!(error = %e, "WAL sync on close failed");
            }
        }
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("data_dir", &self.data_dir)
            .field("version", &self.store.version())
            .field("durability", &self.config.storage.durability)
            .finish()
    }
}
