//! Sharded table storage
//!
//! # Design
//!
//! - DashMap keyed by Table: one shard per table, tables never contend
//! - FxHashMap inside each shard: O(1) lookups by record id
//! - Per-table version: the last commit that touched the table, used by
//!   the concurrency layer to detect phantoms in table scans
//!
//! Scans return rows sorted by record id, which for sequence ids is
//! creation order.

use dashmap::DashMap;
use niaga_core::{Key, RecordId, Row, Table, Versioned};
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Rows of one table
#[derive(Debug, Default)]
pub struct Shard {
    pub(crate) data: FxHashMap<RecordId, Versioned>,
    /// Last commit version that wrote or deleted a row here
    pub(crate) version: u64,
}

impl Shard {
    /// Create a new empty shard
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if shard is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Committed rows, sharded by table
///
/// # Thread Safety
///
/// - get() / scan(): only read-lock the table's shard
/// - apply_batch(): write-locks each touched shard in turn; the engine
///   serializes commits, so readers outside a transaction may observe a
///   batch half-applied across tables but never a torn row
pub struct ShardedStore {
    shards: DashMap<Table, Shard>,
    /// Last committed version
    version: AtomicU64,
}

impl ShardedStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            shards: DashMap::new(),
            version: AtomicU64::new(0),
        }
    }

    /// Last committed version
    #[inline]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Set version (used during recovery)
    pub fn set_version(&self, version: u64) {
        self.version.store(version, Ordering::Release);
    }

    /// Version of the last commit that touched `table` (0 if never)
    pub fn table_version(&self, table: Table) -> u64 {
        self.shards.get(&table).map(|s| s.version).unwrap_or(0)
    }

    /// Get a row by key
    #[inline]
    pub fn get(&self, key: &Key) -> Option<Versioned> {
        self.shards
            .get(&key.table)
            .and_then(|shard| shard.data.get(&key.id).cloned())
    }

    /// Version of the row at `key`, if present
    pub fn get_version(&self, key: &Key) -> Option<u64> {
        self.shards
            .get(&key.table)
            .and_then(|shard| shard.data.get(&key.id).map(|v| v.version))
    }

    /// Check if a key exists
    #[inline]
    pub fn contains(&self, key: &Key) -> bool {
        self.shards
            .get(&key.table)
            .map(|shard| shard.data.contains_key(&key.id))
            .unwrap_or(false)
    }

    /// All rows of a table, sorted by record id
    pub fn scan(&self, table: Table) -> Vec<(RecordId, Versioned)> {
        self.scan_with_version(table).1
    }

    /// Table version and rows, read under one shard guard
    ///
    /// The version is consistent with the returned rows, so a later change
    /// of [`ShardedStore::table_version`] means the scan result is stale.
    pub fn scan_with_version(&self, table: Table) -> (u64, Vec<(RecordId, Versioned)>) {
        let (version, mut rows) = match self.shards.get(&table) {
            Some(shard) => (
                shard.version,
                shard
                    .data
                    .iter()
                    .map(|(id, v)| (id.clone(), v.clone()))
                    .collect::<Vec<_>>(),
            ),
            None => (0, Vec::new()),
        };
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        (version, rows)
    }

    /// Number of rows in a table
    pub fn table_len(&self, table: Table) -> usize {
        self.shards.get(&table).map(|s| s.len()).unwrap_or(0)
    }

    /// Total rows across all tables
    pub fn total_entries(&self) -> usize {
        self.shards.iter().map(|entry| entry.value().len()).sum()
    }

    /// Insert a row as-is (recovery and snapshot load)
    pub fn put(&self, key: Key, value: Versioned) {
        let mut shard = self.shards.entry(key.table).or_default();
        shard.version = shard.version.max(value.version);
        shard.data.insert(key.id, value);
    }

    /// Apply a committed batch of writes and deletes
    ///
    /// Every written row gets `version` and `timestamp`; every touched table
    /// gets `version` as its table version.
    pub fn apply_batch(&self, writes: &[(Key, Row)], deletes: &[Key], version: u64, timestamp: i64) {
        for (key, row) in writes {
            let mut shard = self.shards.entry(key.table).or_default();
            shard.version = version;
            shard
                .data
                .insert(key.id.clone(), Versioned::new(row.clone(), version, timestamp));
        }
        for key in deletes {
            let mut shard = self.shards.entry(key.table).or_default();
            shard.version = version;
            shard.data.remove(&key.id);
        }
        self.version.fetch_max(version, Ordering::AcqRel);
    }

    /// Every row in the store, sorted by key (snapshot writing)
    pub fn dump(&self) -> Vec<(Key, Versioned)> {
        let mut rows = Vec::with_capacity(self.total_entries());
        for table in Table::ALL {
            for (id, v) in self.scan(table) {
                rows.push((Key { table, id }, v));
            }
        }
        rows
    }
}

impl Default for ShardedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ShardedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardedStore")
            .field("tables", &self.shards.len())
            .field("version", &self.version())
            .field("total_entries", &self.total_entries())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn row(v: serde_json::Value) -> Row {
        Row::from_value(v)
    }

    #[test]
    fn test_store_creation() {
        let store = ShardedStore::new();
        assert_eq!(store.version(), 0);
        assert_eq!(store.total_entries(), 0);
        assert_eq!(store.table_version(Table::Products), 0);
    }

    #[test]
    fn test_apply_batch_writes_and_deletes() {
        let store = ShardedStore::new();
        let k1 = Key::new(Table::Savers, 1u64);
        let k2 = Key::new(Table::Savers, 2u64);
        store.apply_batch(
            &[(k1.clone(), row(json!({"name": "Ani"}))), (k2.clone(), row(json!({"name": "Budi"})))],
            &[],
            1,
            1_000,
        );
        assert_eq!(store.get(&k1).unwrap().row.get("name"), Some(&json!("Ani")));
        assert_eq!(store.get(&k1).unwrap().version, 1);
        assert_eq!(store.version(), 1);

        store.apply_batch(&[], &[k2.clone()], 2, 2_000);
        assert!(!store.contains(&k2));
        assert_eq!(store.table_version(Table::Savers), 2);
        assert_eq!(store.version(), 2);
    }

    #[test]
    fn test_table_versions_are_independent() {
        let store = ShardedStore::new();
        store.apply_batch(&[(Key::new(Table::Sales, 1u64), row(json!({})))], &[], 5, 0);
        store.apply_batch(&[(Key::new(Table::Products, "PRD001"), row(json!({})))], &[], 6, 0);
        assert_eq!(store.table_version(Table::Sales), 5);
        assert_eq!(store.table_version(Table::Products), 6);
        assert_eq!(store.table_version(Table::Invoices), 0);
    }

    #[test]
    fn test_scan_sorted_by_id() {
        let store = ShardedStore::new();
        for id in [10u64, 2, 7] {
            store.put(
                Key::new(Table::Sales, id),
                Versioned::new(row(json!({ "id": id })), id, 0),
            );
        }
        let ids: Vec<u64> = store
            .scan(Table::Sales)
            .into_iter()
            .filter_map(|(id, _)| id.as_num())
            .collect();
        assert_eq!(ids, vec![2, 7, 10]);
        assert_eq!(store.table_len(Table::Sales), 3);
        assert!(store.scan(Table::Debts).is_empty());
    }

    #[test]
    fn test_put_tracks_table_version() {
        let store = ShardedStore::new();
        store.put(Key::new(Table::Users, 1u64), Versioned::new(row(json!({})), 9, 0));
        store.put(Key::new(Table::Users, 2u64), Versioned::new(row(json!({})), 4, 0));
        assert_eq!(store.table_version(Table::Users), 9);
    }

    #[test]
    fn test_dump_covers_all_tables() {
        let store = ShardedStore::new();
        store.apply_batch(
            &[
                (Key::new(Table::Products, "PRD001"), row(json!({}))),
                (Key::new(Table::Sales, 1u64), row(json!({}))),
                (Key::sequence(Table::Sales), row(json!(1))),
            ],
            &[],
            1,
            0,
        );
        let dumped = store.dump();
        assert_eq!(dumped.len(), 3);
        assert_eq!(dumped[0].0, Key::sequence(Table::Sales));
    }

    #[test]
    fn test_concurrent_writes_different_tables() {
        use std::thread;

        let store = Arc::new(ShardedStore::new());
        let tables = [Table::Sales, Table::Savers, Table::Debts, Table::Invoices];
        let handles: Vec<_> = tables
            .into_iter()
            .map(|table| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..100u64 {
                        store.put(Key::new(table, i), Versioned::new(Row::from_value(json!(i)), 1, 0));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        for table in tables {
            assert_eq!(store.table_len(table), 100);
        }
        assert_eq!(store.total_entries(), 400);
    }

    #[test]
    fn test_debug_impl() {
        let debug_str = format!("{:?}", ShardedStore::new());
        assert!(debug_str.contains("ShardedStore"));
    }
}
