//! Bridge between the executor and the primitives.
//!
//! [`Primitives`] bundles one facade per domain over a shared database, so
//! handlers receive everything through one `Arc`.

use niaga_engine::Database;
use niaga_primitives::{
    Accounts, Cashier, Catalog, Debts, Inventory, Invoices, Reports, Savings, Settings,
};
use std::sync::Arc;

/// The database and its facades
pub struct Primitives {
    pub db: Arc<Database>,
    pub accounts: Accounts,
    pub settings: Settings,
    pub catalog: Catalog,
    pub inventory: Inventory,
    pub savings: Savings,
    pub cashier: Cashier,
    pub invoices: Invoices,
    pub debts: Debts,
    pub reports: Reports,
}

impl Primitives {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            accounts: Accounts::new(db.clone()),
            settings: Settings::new(db.clone()),
            catalog: Catalog::new(db.clone()),
            inventory: Inventory::new(db.clone()),
            savings: Savings::new(db.clone()),
            cashier: Cashier::new(db.clone()),
            invoices: Invoices::new(db.clone()),
            debts: Debts::new(db.clone()),
            reports: Reports::new(db.clone()),
            db,
        }
    }
}
