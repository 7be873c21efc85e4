//! Database engine for niaga
//!
//! This crate ties the lower layers together:
//! - Database: open/recover, transactions with retry, commit, checkpoint
//! - NiagaConfig: the `niaga.toml` config file
//! - recovery: snapshot load and WAL replay
//!
//! Primitives are stateless facades over `Arc<Database>`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod database;
pub mod recovery;

pub use config::{EngineConfig, NiagaConfig, ServerConfig, StorageConfig, CONFIG_FILE};
pub use database::{CheckpointInfo, Database, DatabaseStats};
pub use niaga_concurrency::TransactionContext;
pub use niaga_durability::DurabilityMode;
pub use recovery::RecoveryInfo;
