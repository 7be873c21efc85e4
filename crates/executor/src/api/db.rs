//! Database operations: ping, login, settings, checkpoint, configuration.

use super::Niaga;
use crate::{Command, Error, Output, Result};
use niaga_core::model::{BusinessSettings, LedgerMismatch, UserProfile};
use niaga_engine::{CheckpointInfo, DatabaseStats, NiagaConfig};

impl Niaga {
    // =========================================================================
    // Session
    // =========================================================================

    /// Ping the database, returning the crate version.
    pub fn ping(&self) -> Result<String> {
        match self.execute(Command::Ping)? {
            Output::Pong { version } => Ok(version),
            _ => Err(Error::unexpected("Ping")),
        }
    }

    /// Log in; later calls run as this user.
    pub fn login(&self, username: &str, password: &str) -> Result<UserProfile> {
        match self.execute(Command::Login {
            username: username.to_string(),
            password: password.to_string(),
        })? {
            Output::User(user) => Ok(user),
            _ => Err(Error::unexpected("Login")),
        }
    }

    /// Forget the logged-in user.
    pub fn logout(&self) -> Result<()> {
        match self.execute(Command::Logout)? {
            Output::Unit => Ok(()),
            _ => Err(Error::unexpected("Logout")),
        }
    }

    /// The logged-in user, re-read from the database.
    pub fn whoami(&self) -> Result<Option<UserProfile>> {
        if !self.session().is_logged_in() {
            return Ok(None);
        }
        match self.execute(Command::WhoAmI)? {
            Output::MaybeUser(user) => Ok(user),
            _ => Err(Error::unexpected("WhoAmI")),
        }
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Business identity printed on documents.
    pub fn settings(&self) -> Result<BusinessSettings> {
        match self.execute(Command::SettingsGet)? {
            Output::Settings(settings) => Ok(settings),
            _ => Err(Error::unexpected("SettingsGet")),
        }
    }

    /// Replace the business identity (admin only).
    pub fn update_settings(&self, settings: BusinessSettings) -> Result<BusinessSettings> {
        match self.execute(Command::SettingsUpdate { settings })? {
            Output::Settings(saved) => Ok(saved),
            _ => Err(Error::unexpected("SettingsUpdate")),
        }
    }

    // =========================================================================
    // Maintenance
    // =========================================================================

    /// Row counts and storage usage.
    pub fn stats(&self) -> Result<DatabaseStats> {
        match self.execute(Command::Stats)? {
            Output::Stats(stats) => Ok(stats),
            _ => Err(Error::unexpected("Stats")),
        }
    }

    /// Get the current database configuration.
    pub fn config(&self) -> Result<NiagaConfig> {
        match self.execute(Command::ConfigGet)? {
            Output::Config(cfg) => Ok(cfg),
            _ => Err(Error::unexpected("ConfigGet")),
        }
    }

    /// Write a snapshot and truncate the WAL.
    pub fn checkpoint(&self) -> Result<CheckpointInfo> {
        match self.execute(Command::Checkpoint)? {
            Output::Checkpoint(info) => Ok(info),
            _ => Err(Error::unexpected("Checkpoint")),
        }
    }

    /// Recompute every running balance of the savings ledger.
    ///
    /// Returns the entries whose stored balance disagrees; empty means the
    /// ledger is consistent.
    pub fn verify_ledger(&self) -> Result<Vec<LedgerMismatch>> {
        match self.execute(Command::VerifyLedger)? {
            Output::LedgerMismatches(mismatches) => Ok(mismatches),
            _ => Err(Error::unexpected("VerifyLedger")),
        }
    }
}
