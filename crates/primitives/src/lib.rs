//! Primitives layer for niaga
//!
//! This crate implements the business facades:
//! - Accounts: registration, login and role management
//! - Settings: the business identity printed on documents
//! - Catalog: products, cost sheets and pricing
//! - Inventory: stock items and the append-only stock ledger
//! - Savings: savers and the append-only savings ledger
//! - Cashier: point-of-sale transactions
//! - Invoices: service invoices and their lifecycle
//! - Debts: customer receivables and payments
//! - Reports: dashboard counters and period reports
//!
//! All primitives are stateless facades over the Database engine. Every
//! operation that touches more than one record runs in one transaction.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod accounts;
pub mod cashier;
pub mod catalog;
pub mod debts;
pub mod inventory;
pub mod invoices;
pub mod reports;
pub mod savings;
pub mod settings;
mod validate;

pub use accounts::{Accounts, Registration};
pub use cashier::Cashier;
pub use catalog::Catalog;
pub use debts::{DebtReceipt, Debts};
pub use inventory::{Inventory, StockChange};
pub use invoices::Invoices;
pub use reports::Reports;
pub use savings::{Savings, SavingsReceipt};
pub use settings::Settings;

#[cfg(test)]
pub(crate) mod test_util {
    use chrono::{NaiveDate, NaiveDateTime};
    use niaga_core::FixedClock;
    use niaga_engine::Database;
    use std::sync::Arc;

    pub fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// In-memory database pinned to 2025-08-03 10:00
    pub fn setup_db() -> (Arc<Database>, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(at(2025, 8, 3, 10)));
        let db = Arc::new(Database::ephemeral_with_clock(clock.clone()));
        (db, clock)
    }
}
