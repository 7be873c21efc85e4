//! Login accounts and roles

use crate::record::Record;
use crate::types::{RecordId, Table};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a user. Each role includes the rights of the roles below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access including users, settings and reports
    Admin,
    /// Products, costing and inventory management
    Manager,
    /// Point of sale, savings, invoices and debts
    Cashier,
}

impl Role {
    /// Privilege rank, higher is stronger.
    pub fn rank(&self) -> u8 {
        match self {
            Role::Admin => 3,
            Role::Manager => 2,
            Role::Cashier => 1,
        }
    }

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Cashier => "cashier",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "cashier" => Ok(Role::Cashier),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Sequence id
    pub id: u64,
    /// Unique login name
    pub username: String,
    /// Unique email
    pub email: String,
    /// Encoded password hash
    pub password_hash: String,
    /// Role
    pub role: Role,
    /// Inactive users cannot log in
    pub is_active: bool,
    /// Registration time
    pub created_at: NaiveDateTime,
}

impl User {
    /// The account without its password hash.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
            is_active: self.is_active,
            created_at: self.created_at,
        }
    }
}

impl Record for User {
    const TABLE: Table = Table::Users;

    fn record_id(&self) -> RecordId {
        RecordId::Num(self.id)
    }
}

/// A user as shown to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Sequence id
    pub id: u64,
    /// Login name
    pub username: String,
    /// Email
    pub email: String,
    /// Role
    pub role: Role,
    /// Whether the account may log in
    pub is_active: bool,
    /// Registration time
    pub created_at: NaiveDateTime,
}
