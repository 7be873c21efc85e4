//! System command handlers.
//!
//! Handles Ping, Stats, ConfigGet, Checkpoint and VerifyLedger.

use std::sync::Arc;

use tracing::{info, warn};

use crate::bridge::Primitives;
use crate::convert::convert_result;
use crate::{Output, Result};

/// Handle Ping command: return the crate version.
pub fn ping() -> Result<Output> {
    Ok(Output::Pong {
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle Stats command.
pub fn stats(p: &Arc<Primitives>) -> Result<Output> {
    Ok(Output::Stats(p.db.stats()))
}

/// Handle ConfigGet command: return the configuration in effect.
pub fn config_get(p: &Arc<Primitives>) -> Result<Output> {
    Ok(Output::Config(p.db.config().clone()))
}

/// Handle Checkpoint command.
pub fn checkpoint(p: &Arc<Primitives>) -> Result<Output> {
    let info = convert_result(p.db.checkpoint())?;
    Ok(Output::Checkpoint(info))
}

/// Handle VerifyLedger command: replay every saver's entries.
pub fn verify_ledger(p: &Arc<Primitives>) -> Result<Output> {
    let mismatches = convert_result(p.savings.verify_ledger())?;
    if mismatches.is_empty() {
        info!("savings ledger verified");
    } else {
        warn!(mismatches = mismatches.len(), "savings ledger mismatches found");
    }
    Ok(Output::LedgerMismatches(mismatches))
}
