//! In-memory storage for niaga
//!
//! This crate holds the committed state of the database:
//! - ShardedStore: one shard per table, versioned rows
//!
//! Writes reach the store only through [`ShardedStore::apply_batch`],
//! called by the engine after a transaction has been validated and logged.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod sharded;

pub use sharded::{Shard, ShardedStore};
