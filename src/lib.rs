//! # niaga
//!
//! Embedded ledger for small shops: point of sale, stock, savings
//! accounts, service invoices and customer debts in one directory on disk.
//!
//! ```text
//! use niaga::{Niaga, SavingsRequest, Rupiah};
//!
//! let niaga = Niaga::open("./toko")?;
//! niaga.login("admin", "admin123")?;
//!
//! let receipt = niaga.savings().deposit(SavingsRequest {
//!     saver_name: "Siti".into(),
//!     amount: Rupiah::new(50_000),
//!     ..Default::default()
//! })?;
//! println!("{}", niaga.documents().savings_receipt(receipt.entry.id)?.body);
//! ```
//!
//! Everything goes through [`Niaga`], which runs [`Command`]s in a logged-in
//! [`Session`]. The lower crates (`niaga-engine`, `niaga-primitives`, ...)
//! are implementation details; this crate re-exports what callers need.

#![warn(missing_docs)]

pub mod types;

pub use niaga_executor::{
    Access, AccessMode, Command, Debts, Document, Documents, Error, Executor, Invoices, Niaga,
    OpenOptions, Output, Products, Reports, Result, Sales, Savers, Session, Stock, Users,
};
pub use types::*;
