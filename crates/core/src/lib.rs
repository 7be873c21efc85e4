//! Core types for niaga
//!
//! This crate defines the vocabulary shared by every layer:
//! - Rupiah: integral money with Indonesian formatting
//! - Key / Table / RecordId: addressing of stored records
//! - Row / Versioned: the stored representation of a record
//! - Record: typed records that map onto rows
//! - model: the business records (products, stock, savings, sales, invoices, debts)
//! - NiagaError: the error type returned by storage, engine and primitives

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod model;
pub mod money;
pub mod record;
pub mod row;
pub mod time;
pub mod types;

pub use error::{EntityRef, NiagaError, NiagaResult};
pub use money::Rupiah;
pub use record::Record;
pub use row::{Row, Versioned};
pub use time::{Clock, FixedClock, SystemClock};
pub use types::{Key, RecordId, Table};
