//! Executor error type
//!
//! Every failure a caller can see. Errors raised by the engine and the
//! primitives are converted in `convert.rs`; the session layer adds the
//! authentication and authorization variants.

use niaga_core::Rupiah;
use niaga_security::Access;
use serde::{Deserialize, Serialize};

/// Executor result
pub type Result<T> = std::result::Result<T, Error>;

/// Error returned by [`Executor`](crate::Executor) and the typed API
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum Error {
    /// Record does not exist
    #[error("not found: {entity}")]
    NotFound {
        /// `table/id`
        entity: String,
    },

    /// Record with the same identity exists
    #[error("already exists: {entity}")]
    AlreadyExists {
        /// `table/id`
        entity: String,
    },

    /// Bad argument
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was wrong
        reason: String,
    },

    /// Not enough units on hand
    #[error("insufficient stock for {item}: available {available}, requested {requested}")]
    InsufficientStock {
        /// Item code
        item: String,
        /// Units on hand
        available: i64,
        /// Units requested
        requested: i64,
    },

    /// Withdrawal above the balance
    #[error("insufficient balance for {saver}: balance {balance}, requested {requested}")]
    InsufficientBalance {
        /// Saver name
        saver: String,
        /// Balance
        balance: Rupiah,
        /// Requested amount
        requested: Rupiah,
    },

    /// Payment below the sale total
    #[error("insufficient payment: total {total}, paid {paid}")]
    InsufficientPayment {
        /// Sale total
        total: Rupiah,
        /// Tendered
        paid: Rupiah,
    },

    /// Debt payment above what remains
    #[error("payment {amount} exceeds remaining debt {remaining}")]
    Overpayment {
        /// Payment
        amount: Rupiah,
        /// Remaining
        remaining: Rupiah,
    },

    /// Status change not allowed by the lifecycle
    #[error("invalid transition for {entity}: {from} -> {to}")]
    InvalidTransition {
        /// `table/id`
        entity: String,
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },

    /// Login failed
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The command needs a logged-in user
    #[error("login required")]
    Unauthenticated,

    /// The user's role is below what the command requires
    #[error("access denied: requires {required}")]
    AccessDenied {
        /// Level the command requires
        required: Access,
    },

    /// Write command against a read-only database
    #[error("database is read-only")]
    ReadOnly,

    /// Concurrent commit won, retries exhausted
    #[error("conflict: {reason}")]
    Conflict {
        /// Description
        reason: String,
    },

    /// Disk or data file failure
    #[error("I/O error: {reason}")]
    Io {
        /// Description
        reason: String,
    },

    /// Encoding or decoding failure
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description
        reason: String,
    },

    /// Bug or broken invariant
    #[error("internal error: {reason}")]
    Internal {
        /// Description
        reason: String,
    },
}

impl Error {
    /// Stable snake_case code, as used in the serialized form
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotFound { .. } => "not_found",
            Error::AlreadyExists { .. } => "already_exists",
            Error::InvalidInput { .. } => "invalid_input",
            Error::InsufficientStock { .. } => "insufficient_stock",
            Error::InsufficientBalance { .. } => "insufficient_balance",
            Error::InsufficientPayment { .. } => "insufficient_payment",
            Error::Overpayment { .. } => "overpayment",
            Error::InvalidTransition { .. } => "invalid_transition",
            Error::InvalidCredentials => "invalid_credentials",
            Error::Unauthenticated => "unauthenticated",
            Error::AccessDenied { .. } => "access_denied",
            Error::ReadOnly => "read_only",
            Error::Conflict { .. } => "conflict",
            Error::Io { .. } => "io",
            Error::Serialization { .. } => "serialization",
            Error::Internal { .. } => "internal",
        }
    }

    /// Whether the caller got something wrong, as opposed to the system
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            Error::Io { .. } | Error::Serialization { .. } | Error::Internal { .. }
        )
    }

    pub(crate) fn unexpected(command: &str) -> Self {
        Error::Internal {
            reason: format!("unexpected output for {}", command),
        }
    }
}
