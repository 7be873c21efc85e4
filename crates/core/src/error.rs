//! Error type shared by storage, engine and primitives
//!
//! Errors that concern a particular record carry an [`EntityRef`] so the
//! executor can report which record failed without parsing messages.

use crate::money::Rupiah;
use crate::types::{Key, RecordId, Table};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Reference to a record, used in error reporting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    /// Table of the record
    pub table: Table,
    /// Record id (or the lookup value, e.g. a saver name)
    pub id: String,
}

impl EntityRef {
    /// Create a reference.
    pub fn new(table: Table, id: impl fmt::Display) -> Self {
        Self {
            table,
            id: id.to_string(),
        }
    }
}

impl From<&Key> for EntityRef {
    fn from(key: &Key) -> Self {
        Self::new(key.table, &key.id)
    }
}

impl From<(Table, RecordId)> for EntityRef {
    fn from((table, id): (Table, RecordId)) -> Self {
        Self::new(table, id)
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.table, self.id)
    }
}

/// Errors raised below the executor.
#[derive(Debug, Error)]
pub enum NiagaError {
    /// The record does not exist.
    #[error("not found: {entity}")]
    NotFound {
        /// Missing record
        entity: EntityRef,
    },

    /// A record with the same identity already exists.
    #[error("already exists: {entity}")]
    AlreadyExists {
        /// Conflicting record
        entity: EntityRef,
    },

    /// Caller supplied an invalid value.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// What was wrong
        message: String,
    },

    /// A stock decrement would drive the count below zero.
    #[error("insufficient stock for {item}: available {available}, requested {requested}")]
    InsufficientStock {
        /// Item code or name
        item: String,
        /// Units on hand
        available: i64,
        /// Units requested
        requested: i64,
    },

    /// A withdrawal exceeds the saver's balance.
    #[error("insufficient balance for {saver}: balance {balance}, requested {requested}")]
    InsufficientBalance {
        /// Saver name
        saver: String,
        /// Current balance
        balance: Rupiah,
        /// Requested withdrawal
        requested: Rupiah,
    },

    /// Payment tendered is below the sale total.
    #[error("insufficient payment: total {total}, paid {paid}")]
    InsufficientPayment {
        /// Sale total
        total: Rupiah,
        /// Amount tendered
        paid: Rupiah,
    },

    /// A debt payment exceeds what is still owed.
    #[error("payment {amount} exceeds remaining debt {remaining}")]
    Overpayment {
        /// Payment amount
        amount: Rupiah,
        /// Amount still owed
        remaining: Rupiah,
    },

    /// A status change that the record's lifecycle does not allow.
    #[error("invalid transition for {entity}: {from} -> {to}")]
    InvalidTransition {
        /// Record whose status was changed
        entity: EntityRef,
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },

    /// Unknown user, inactive user or wrong password.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Optimistic transaction lost against a concurrent commit.
    #[error("transaction conflict: {reason}")]
    Conflict {
        /// Description of the conflict
        reason: String,
    },

    /// I/O failure in the storage layer.
    #[error("storage error: {message}")]
    Storage {
        /// Context
        message: String,
        /// Underlying I/O error
        #[source]
        source: Option<std::io::Error>,
    },

    /// Encoding or decoding failure.
    #[error("serialization error: {message}")]
    Serialization {
        /// Context
        message: String,
    },

    /// On-disk data failed validation.
    #[error("data corruption: {message}")]
    Corruption {
        /// Context
        message: String,
    },

    /// Bug or broken invariant.
    #[error("internal error: {message}")]
    Internal {
        /// Context
        message: String,
    },
}

/// Result alias used below the executor.
pub type NiagaResult<T> = Result<T, NiagaError>;

impl NiagaError {
    /// Record not found.
    pub fn not_found(entity: impl Into<EntityRef>) -> Self {
        NiagaError::NotFound {
            entity: entity.into(),
        }
    }

    /// Record already exists.
    pub fn already_exists(entity: impl Into<EntityRef>) -> Self {
        NiagaError::AlreadyExists {
            entity: entity.into(),
        }
    }

    /// Invalid caller input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        NiagaError::InvalidInput {
            message: message.into(),
        }
    }

    /// Transaction conflict.
    pub fn conflict(reason: impl Into<String>) -> Self {
        NiagaError::Conflict {
            reason: reason.into(),
        }
    }

    /// Storage failure with an I/O source.
    pub fn storage(message: impl Into<String>, source: std::io::Error) -> Self {
        NiagaError::Storage {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Serialization failure.
    pub fn serialization(message: impl fmt::Display) -> Self {
        NiagaError::Serialization {
            message: message.to_string(),
        }
    }

    /// Corrupted data.
    pub fn corruption(message: impl Into<String>) -> Self {
        NiagaError::Corruption {
            message: message.into(),
        }
    }

    /// Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        NiagaError::Internal {
            message: message.into(),
        }
    }

    /// True for errors a transaction retry may resolve.
    pub fn is_retryable(&self) -> bool {
        matches!(self, NiagaError::Conflict { .. })
    }
}

impl From<std::io::Error> for NiagaError {
    fn from(err: std::io::Error) -> Self {
        NiagaError::Storage {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for NiagaError {
    fn from(err: serde_json::Error) -> Self {
        NiagaError::serialization(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = NiagaError::not_found(EntityRef::new(Table::Savers, "Budi"));
        assert_eq!(err.to_string(), "not found: savers/Budi");
    }

    #[test]
    fn test_entity_ref_from_key() {
        let key = Key::new(Table::Products, "PRD007");
        let entity = EntityRef::from(&key);
        assert_eq!(entity.table, Table::Products);
        assert_eq!(entity.id, "PRD007");
    }

    #[test]
    fn test_only_conflicts_retry() {
        assert!(NiagaError::conflict("read set changed").is_retryable());
        assert!(!NiagaError::invalid_input("bad").is_retryable());
        assert!(!NiagaError::InvalidCredentials.is_retryable());
    }

    #[test]
    fn test_insufficient_balance_formats_rupiah() {
        let err = NiagaError::InsufficientBalance {
            saver: "Siti".into(),
            balance: Rupiah::new(5_000),
            requested: Rupiah::new(12_500),
        };
        assert_eq!(
            err.to_string(),
            "insufficient balance for Siti: balance Rp 5.000, requested Rp 12.500"
        );
    }
}
