//! Transaction context
//!
//! Buffers writes and deletes until commit and records what the
//! transaction observed:
//! - read_set: key -> committed version at first read (0 = absent)
//! - scan_set: table -> table version at first scan
//!
//! Reads see the transaction's own writes first, then committed state.

use chrono::{NaiveDate, NaiveDateTime};
use niaga_core::{EntityRef, Key, NiagaError, NiagaResult, Record, RecordId, Row, Table};
use niaga_storage::ShardedStore;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

/// Buffered changes of a transaction, ready to log and apply
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteSet {
    /// Rows written, sorted by key
    pub writes: Vec<(Key, Row)>,
    /// Keys deleted, sorted
    pub deletes: Vec<Key>,
}

impl WriteSet {
    /// True when the transaction changed nothing
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty() && self.deletes.is_empty()
    }

    /// Number of changed keys
    pub fn len(&self) -> usize {
        self.writes.len() + self.deletes.len()
    }
}

/// An open optimistic transaction
pub struct TransactionContext {
    store: Arc<ShardedStore>,
    start_version: u64,
    now: NaiveDateTime,
    read_set: HashMap<Key, u64>,
    scan_set: HashMap<Table, u64>,
    writes: BTreeMap<Key, Row>,
    deletes: BTreeSet<Key>,
}

impl TransactionContext {
    /// Begin a transaction over `store` at business time `now`
    pub fn new(store: Arc<ShardedStore>, now: NaiveDateTime) -> Self {
        let start_version = store.version();
        Self {
            store,
            start_version,
            now,
            read_set: HashMap::new(),
            scan_set: HashMap::new(),
            writes: BTreeMap::new(),
            deletes: BTreeSet::new(),
        }
    }

    /// Committed version when the transaction began
    pub fn start_version(&self) -> u64 {
        self.start_version
    }

    /// Business time of this transaction (the same for every read)
    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// Business date of this transaction
    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }

    /// Keys read and the versions observed
    pub fn read_set(&self) -> &HashMap<Key, u64> {
        &self.read_set
    }

    /// Tables scanned and the table versions observed
    pub fn scan_set(&self) -> &HashMap<Table, u64> {
        &self.scan_set
    }

    /// True if nothing has been written or deleted
    pub fn is_read_only(&self) -> bool {
        self.writes.is_empty() && self.deletes.is_empty()
    }

    /// Number of buffered changes
    pub fn write_count(&self) -> usize {
        self.writes.len() + self.deletes.len()
    }

    // ========================================================================
    // Raw rows
    // ========================================================================

    /// Read a row
    pub fn get(&mut self, key: &Key) -> Option<Row> {
        if self.deletes.contains(key) {
            return None;
        }
        if let Some(row) = self.writes.get(key) {
            return Some(row.clone());
        }
        let committed = self.store.get(key);
        self.read_set
            .entry(key.clone())
            .or_insert_with(|| committed.as_ref().map(|v| v.version).unwrap_or(0));
        committed.map(|v| v.row)
    }

    /// All rows of a table with this transaction's changes applied,
    /// sorted by record id
    pub fn scan(&mut self, table: Table) -> Vec<(RecordId, Row)> {
        let (version, committed) = self.store.scan_with_version(table);
        self.scan_set.entry(table).or_insert(version);

        let mut merged: BTreeMap<RecordId, Row> =
            committed.into_iter().map(|(id, v)| (id, v.row)).collect();
        for key in self.deletes.iter().filter(|k| k.table == table) {
            merged.remove(&key.id);
        }
        for (key, row) in self.writes.iter().filter(|(k, _)| k.table == table) {
            merged.insert(key.id.clone(), row.clone());
        }
        merged.into_iter().collect()
    }

    /// Buffer a write
    pub fn put(&mut self, key: Key, row: Row) {
        self.deletes.remove(&key);
        self.writes.insert(key, row);
    }

    /// Buffer a delete
    pub fn delete(&mut self, key: Key) {
        self.writes.remove(&key);
        self.deletes.insert(key);
    }

    // ========================================================================
    // Typed records
    // ========================================================================

    /// Read a record by id
    pub fn get_record<T: Record>(&mut self, id: impl Into<RecordId>) -> NiagaResult<Option<T>> {
        let key = Key::new(T::TABLE, id);
        self.get(&key).map(|row| T::from_row(&row)).transpose()
    }

    /// Read a record that must exist
    pub fn require<T: Record>(&mut self, id: impl Into<RecordId>) -> NiagaResult<T> {
        let id = id.into();
        self.get_record::<T>(id.clone())?
            .ok_or_else(|| NiagaError::not_found(EntityRef::new(T::TABLE, id)))
    }

    /// Every record of `T`'s table, in id order
    pub fn scan_records<T: Record>(&mut self) -> NiagaResult<Vec<T>> {
        self.scan(T::TABLE)
            .iter()
            .map(|(_, row)| T::from_row(row))
            .collect()
    }

    /// First record of `T`'s table matching `pred`, in id order
    pub fn find_record<T, F>(&mut self, pred: F) -> NiagaResult<Option<T>>
    where
        T: Record,
        F: Fn(&T) -> bool,
    {
        Ok(self.scan_records::<T>()?.into_iter().find(|r| pred(r)))
    }

    /// Buffer a write of a record
    pub fn put_record<T: Record>(&mut self, record: &T) -> NiagaResult<()> {
        let row = record.to_row()?;
        self.put(record.key(), row);
        Ok(())
    }

    /// Buffer a delete of a record by id
    pub fn delete_record<T: Record>(&mut self, id: impl Into<RecordId>) {
        self.delete(Key::new(T::TABLE, id));
    }

    /// Allocate the next sequence id of `table`
    ///
    /// Counters are rows in the sequences table, so two transactions
    /// allocating from the same table conflict and one of them retries.
    pub fn next_id(&mut self, table: Table) -> NiagaResult<u64> {
        let key = Key::sequence(table);
        let current = match self.get(&key) {
            Some(row) => row.as_u64().ok_or_else(|| {
                NiagaError::corruption(format!("sequence {} is not a number", key))
            })?,
            None => 0,
        };
        let next = current + 1;
        self.put(key, Row::from_value(serde_json::Value::from(next)));
        Ok(next)
    }

    /// Consume the transaction, returning its buffered changes
    pub fn into_write_set(self) -> WriteSet {
        WriteSet {
            writes: self.writes.into_iter().collect(),
            deletes: self.deletes.into_iter().collect(),
        }
    }
}

impl std::fmt::Debug for TransactionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionContext")
            .field("start_version", &self.start_version)
            .field("reads", &self.read_set.len())
            .field("scans", &self.scan_set.len())
            .field("writes", &self.writes.len())
            .field("deletes", &self.deletes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: u64,
        text: String,
    }

    impl Record for Note {
        const TABLE: Table = Table::Customers;

        fn record_id(&self) -> RecordId {
            RecordId::Num(self.id)
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn store_with(notes: &[(u64, &str)]) -> Arc<ShardedStore> {
        let store = Arc::new(ShardedStore::new());
        let writes: Vec<_> = notes
            .iter()
            .map(|(id, text)| {
                let note = Note {
                    id: *id,
                    text: text.to_string(),
                };
                (note.key(), note.to_row().unwrap())
            })
            .collect();
        store.apply_batch(&writes, &[], 1, 0);
        store
    }

    #[test]
    fn test_read_your_writes() {
        let store = store_with(&[]);
        let mut txn = TransactionContext::new(store.clone(), now());
        let note = Note {
            id: 1,
            text: "baru".into(),
        };
        txn.put_record(&note).unwrap();
        assert_eq!(txn.get_record::<Note>(1u64).unwrap(), Some(note));
        // nothing reaches the store before commit
        assert!(store.get(&Key::new(Table::Customers, 1u64)).is_none());
    }

    #[test]
    fn test_delete_hides_committed_row() {
        let store = store_with(&[(1, "lama")]);
        let mut txn = TransactionContext::new(store, now());
        txn.delete_record::<Note>(1u64);
        assert_eq!(txn.get_record::<Note>(1u64).unwrap(), None);
        assert!(txn.scan_records::<Note>().unwrap().is_empty());
    }

    #[test]
    fn test_reads_are_tracked_with_versions() {
        let store = store_with(&[(1, "a")]);
        let mut txn = TransactionContext::new(store, now());
        txn.get(&Key::new(Table::Customers, 1u64));
        txn.get(&Key::new(Table::Customers, 2u64));
        assert_eq!(txn.read_set().get(&Key::new(Table::Customers, 1u64)), Some(&1));
        assert_eq!(txn.read_set().get(&Key::new(Table::Customers, 2u64)), Some(&0));
    }

    #[test]
    fn test_scan_merges_local_changes() {
        let store = store_with(&[(1, "a"), (2, "b"), (3, "c")]);
        let mut txn = TransactionContext::new(store, now());
        txn.delete_record::<Note>(2u64);
        txn.put_record(&Note {
            id: 3,
            text: "c2".into(),
        })
        .unwrap();
        txn.put_record(&Note {
            id: 4,
            text: "d".into(),
        })
        .unwrap();
        let texts: Vec<String> = txn
            .scan_records::<Note>()
            .unwrap()
            .into_iter()
            .map(|n| n.text)
            .collect();
        assert_eq!(texts, vec!["a", "c2", "d"]);
        assert_eq!(txn.scan_set().get(&Table::Customers), Some(&1));
    }

    #[test]
    fn test_require_missing_is_not_found() {
        let mut txn = TransactionContext::new(store_with(&[]), now());
        let err = txn.require::<Note>(7u64).unwrap_err();
        assert_eq!(err.to_string(), "not found: customers/7");
    }

    #[test]
    fn test_next_id_increments_and_is_buffered() {
        let store = store_with(&[]);
        let mut txn = TransactionContext::new(store, now());
        assert_eq!(txn.next_id(Table::Sales).unwrap(), 1);
        assert_eq!(txn.next_id(Table::Sales).unwrap(), 2);
        assert_eq!(txn.next_id(Table::Debts).unwrap(), 1);
        let ws = txn.into_write_set();
        assert_eq!(ws.writes.len(), 2);
        assert!(ws
            .writes
            .iter()
            .any(|(k, r)| *k == Key::sequence(Table::Sales) && **r == json!(2)));
    }

    #[test]
    fn test_write_then_delete_leaves_only_delete() {
        let mut txn = TransactionContext::new(store_with(&[]), now());
        let key = Key::new(Table::Customers, 5u64);
        txn.put(key.clone(), Row::from_value(json!({})));
        txn.delete(key.clone());
        let ws = txn.into_write_set();
        assert!(ws.writes.is_empty());
        assert_eq!(ws.deletes, vec![key]);
    }
}
