//! Transaction validation for OCC
//!
//! Rules:
//! - First-committer-wins based on the READ-SET and SCAN-SET, not the write-set
//! - Blind writes (write without read) do NOT conflict
//! - A scanned table conflicts when any commit touched it after the scan,
//!   which also catches rows inserted into the scanned range (phantoms)

use crate::transaction::TransactionContext;
use niaga_core::{Key, Table};
use niaga_storage::ShardedStore;
use std::collections::HashMap;
use std::fmt;

/// Types of conflicts that can occur during transaction validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictType {
    /// A key was read at one version but the committed version differs
    ReadWriteConflict {
        /// The key that has a conflict
        key: Key,
        /// Version recorded when read (0 = absent)
        read_version: u64,
        /// Current version in storage at validation time
        current_version: u64,
    },

    /// A table was scanned and has been written since
    ScanConflict {
        /// The scanned table
        table: Table,
        /// Table version when scanned
        read_version: u64,
        /// Table version at validation time
        current_version: u64,
    },
}

impl fmt::Display for ConflictType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictType::ReadWriteConflict {
                key,
                read_version,
                current_version,
            } => write!(f, "{} changed (read v{}, now v{})", key, read_version, current_version),
            ConflictType::ScanConflict {
                table,
                read_version,
                current_version,
            } => write!(
                f,
                "table {} changed (scanned v{}, now v{})",
                table, read_version, current_version
            ),
        }
    }
}

/// Result of transaction validation
///
/// A transaction commits only if is_valid() returns true.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// All conflicts detected during validation
    pub conflicts: Vec<ConflictType>,
}

impl ValidationResult {
    /// Create a successful validation result (no conflicts)
    pub fn ok() -> Self {
        ValidationResult {
            conflicts: Vec::new(),
        }
    }

    /// Create a validation result with a single conflict
    pub fn conflict(conflict: ConflictType) -> Self {
        ValidationResult {
            conflicts: vec![conflict],
        }
    }

    /// Check if validation passed (no conflicts)
    pub fn is_valid(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Merge another validation result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.conflicts.extend(other.conflicts);
    }

    /// Get the number of conflicts
    pub fn conflict_count(&self) -> usize {
        self.conflicts.len()
    }

    /// One-line description of the first conflict
    pub fn describe(&self) -> String {
        match self.conflicts.first() {
            Some(first) if self.conflicts.len() > 1 => {
                format!("{} (+{} more)", first, self.conflicts.len() - 1)
            }
            Some(first) => first.to_string(),
            None => "no conflict".to_string(),
        }
    }
}

/// Validate the read-set against the committed store
///
/// A key that did not exist when read is recorded at version 0; if it
/// exists now, that is a conflict.
pub fn validate_read_set(read_set: &HashMap<Key, u64>, store: &ShardedStore) -> ValidationResult {
    let mut result = ValidationResult::ok();

    for (key, read_version) in read_set {
        let current_version = store.get_version(key).unwrap_or(0);
        if current_version != *read_version {
            result.conflicts.push(ConflictType::ReadWriteConflict {
                key: key.clone(),
                read_version: *read_version,
                current_version,
            });
        }
    }

    result
}

/// Validate scanned tables against their current table versions
pub fn validate_scan_set(scan_set: &HashMap<Table, u64>, store: &ShardedStore) -> ValidationResult {
    let mut result = ValidationResult::ok();

    for (table, read_version) in scan_set {
        let current_version = store.table_version(*table);
        if current_version != *read_version {
            result.conflicts.push(ConflictType::ScanConflict {
                table: *table,
                read_version: *read_version,
                current_version,
            });
        }
    }

    result
}

/// Validate everything a transaction observed
///
/// Must run under the engine's commit lock so no commit can land between
/// validation and apply.
pub fn validate_transaction(txn: &TransactionContext, store: &ShardedStore) -> ValidationResult {
    let mut result = validate_read_set(txn.read_set(), store);
    result.merge(validate_scan_set(txn.scan_set(), store));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use niaga_core::Row;
    use serde_json::json;

    fn key(id: u64) -> Key {
        Key::new(Table::Savers, id)
    }

    fn write(store: &ShardedStore, key: &Key, version: u64) {
        store.apply_batch(&[(key.clone(), Row::from_value(json!({})))], &[], version, 0);
    }

    #[test]
    fn test_validation_result_merge() {
        let mut result = ValidationResult::conflict(ConflictType::ReadWriteConflict {
            key: key(1),
            read_version: 1,
            current_version: 2,
        });
        result.merge(ValidationResult::conflict(ConflictType::ScanConflict {
            table: Table::Sales,
            read_version: 0,
            current_version: 3,
        }));
        assert_eq!(result.conflict_count(), 2);
        assert!(!result.is_valid());
        assert!(result.describe().contains("(+1 more)"));
    }

    #[test]
    fn test_validate_read_set_unchanged() {
        let store = ShardedStore::new();
        write(&store, &key(1), 1);
        let read_set = HashMap::from([(key(1), 1), (key(2), 0)]);
        assert!(validate_read_set(&read_set, &store).is_valid());
    }

    #[test]
    fn test_validate_read_set_changed() {
        let store = ShardedStore::new();
        write(&store, &key(1), 1);
        let read_set = HashMap::from([(key(1), 1)]);
        write(&store, &key(1), 2);
        let result = validate_read_set(&read_set, &store);
        assert_eq!(
            result.conflicts,
            vec![ConflictType::ReadWriteConflict {
                key: key(1),
                read_version: 1,
                current_version: 2
            }]
        );
    }

    #[test]
    fn test_absent_key_created_later_conflicts() {
        let store = ShardedStore::new();
        let read_set = HashMap::from([(key(9), 0)]);
        write(&store, &key(9), 4);
        assert!(!validate_read_set(&read_set, &store).is_valid());
    }

    #[test]
    fn test_deleted_key_conflicts() {
        let store = ShardedStore::new();
        write(&store, &key(1), 1);
        let read_set = HashMap::from([(key(1), 1)]);
        store.apply_batch(&[], &[key(1)], 2, 0);
        assert!(!validate_read_set(&read_set, &store).is_valid());
    }

    #[test]
    fn test_scan_set_detects_phantom_insert() {
        let store = ShardedStore::new();
        write(&store, &key(1), 1);
        let scan_set = HashMap::from([(Table::Savers, store.table_version(Table::Savers))]);
        assert!(validate_scan_set(&scan_set, &store).is_valid());

        write(&store, &key(2), 2);
        let result = validate_scan_set(&scan_set, &store);
        assert!(matches!(
            result.conflicts[0],
            ConflictType::ScanConflict {
                table: Table::Savers,
                read_version: 1,
                current_version: 2
            }
        ));
    }

    #[test]
    fn test_other_table_writes_do_not_conflict_with_scan() {
        let store = ShardedStore::new();
        let scan_set = HashMap::from([(Table::Savers, 0)]);
        store.apply_batch(&[(Key::new(Table::Sales, 1u64), Row::from_value(json!({})))], &[], 1, 0);
        assert!(validate_scan_set(&scan_set, &store).is_valid());
    }
}
