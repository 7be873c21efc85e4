//! Optimistic transactions for niaga
//!
//! This crate provides:
//! - TransactionContext: buffered writes, read-your-writes, read and scan tracking
//! - validation: first-committer-wins checks against the committed store
//!
//! A transaction never blocks other transactions while it runs. At commit
//! the engine validates every key it read and every table it scanned; if
//! any of them changed since, the commit fails with a retryable conflict.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod transaction;
pub mod validation;

pub use transaction::{TransactionContext, WriteSet};
pub use validation::{validate_transaction, ConflictType, ValidationResult};
