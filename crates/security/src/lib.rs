//! Access control and configuration for niaga.
//!
//! This crate provides:
//! - [`AccessMode`] and [`OpenOptions`]: how a database is opened
//! - [`Access`]: the level a command requires, checked against a [`Role`]
//! - [`password`]: salted, iterated password hashes

#![warn(missing_docs)]

pub mod password;

pub use niaga_core::model::Role;
pub use password::{hash_password, verify_password, PasswordHash};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Controls whether the database allows writes or is read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    /// Allow both reads and writes (default).
    #[default]
    ReadWrite,
    /// Read-only mode: all write commands return an error.
    ReadOnly,
}

/// Options for opening a database.
///
/// ```ignore
/// use niaga_security::{OpenOptions, AccessMode};
///
/// let opts = OpenOptions::new().access_mode(AccessMode::ReadOnly);
/// ```
#[derive(Debug, Clone)]
pub struct OpenOptions {
    /// The access mode for the database.
    pub access_mode: AccessMode,
    /// Create the default settings and `admin` account when missing.
    pub bootstrap: bool,
}

impl OpenOptions {
    /// Create a new `OpenOptions` with default settings (read-write, bootstrap).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the access mode for the database.
    pub fn access_mode(mut self, mode: AccessMode) -> Self {
        self.access_mode = mode;
        self
    }

    /// Enable or disable bootstrap of default records.
    pub fn bootstrap(mut self, bootstrap: bool) -> Self {
        self.bootstrap = bootstrap;
        self
    }
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            access_mode: AccessMode::ReadWrite,
            bootstrap: true,
        }
    }
}

/// Level of access a command requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    /// No login needed
    Public,
    /// Any logged-in user
    LoggedIn,
    /// Cashier or above
    Cashier,
    /// Manager or above
    Manager,
    /// Admin only
    Admin,
}

impl Access {
    /// Whether a user with `role` (or nobody, for `None`) may proceed.
    pub fn permits(self, role: Option<Role>) -> bool {
        match (self, role) {
            (Access::Public, _) => true,
            (_, None) => false,
            (Access::LoggedIn, Some(_)) => true,
            (Access::Cashier, Some(r)) => r.rank() >= Role::Cashier.rank(),
            (Access::Manager, Some(r)) => r.rank() >= Role::Manager.rank(),
            (Access::Admin, Some(r)) => r == Role::Admin,
        }
    }

    /// Whether this level needs a logged-in user.
    pub fn needs_login(self) -> bool {
        self != Access::Public
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Access::Public => "public",
            Access::LoggedIn => "logged_in",
            Access::Cashier => "cashier",
            Access::Manager => "manager",
            Access::Admin => "admin",
        };
        f.write_str(name)
    }
}
