//! Typed API over the command executor.
//!
//! [`Niaga`] owns one [`Session`] and exposes each domain through a
//! borrowed handle, so callers never build [`Command`]s by hand:
//!
//! ```text
//! use niaga_executor::Niaga;
//!
//! let niaga = Niaga::open("/var/lib/niaga")?;
//! niaga.login("admin", "admin123")?;
//!
//! let receipt = niaga.savings().deposit(request)?;
//! let doc = niaga.documents().savings_receipt(receipt.entry.id)?;
//! ```
//!
//! Every call still goes through [`Executor::execute`], so the same
//! access rules apply as for the CLI and the HTTP server.

mod catalog;
mod db;
mod debts;
mod documents;
mod invoices;
mod reports;
mod sales;
mod savings;
mod stock;
mod users;

pub use catalog::Products;
pub use debts::Debts;
pub use documents::Documents;
pub use invoices::Invoices;
pub use reports::Reports;
pub use sales::Sales;
pub use savings::Savers;
pub use stock::Stock;
pub use users::Users;

use std::path::Path;
use std::sync::Arc;

use niaga_engine::Database;
use niaga_security::OpenOptions;

use crate::convert::convert_result;
use crate::{Command, Executor, Output, Result, Session};

/// An open business database with a login session
pub struct Niaga {
    session: Session,
}

impl Niaga {
    /// Open (or create) the database in `path` with default options.
    ///
    /// Reads `niaga.toml` from the directory when present and creates the
    /// default settings and `admin` account on first use.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, OpenOptions::default())
    }

    /// Open the database in `path` with explicit options
    pub fn open_with(path: impl AsRef<Path>, opts: OpenOptions) -> Result<Self> {
        let db = convert_result(Database::open(path))?;
        Self::from_database(Arc::new(db), opts)
    }

    /// A throwaway in-memory database, bootstrapped like a fresh one on disk
    pub fn ephemeral() -> Result<Self> {
        Self::from_database(Arc::new(Database::ephemeral()), OpenOptions::default())
    }

    /// Wrap an already open database
    pub fn from_database(db: Arc<Database>, opts: OpenOptions) -> Result<Self> {
        let executor = Executor::open(db, &opts)?;
        Ok(Self {
            session: Session::new(Arc::new(executor)),
        })
    }

    /// The session every call runs in
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// A new anonymous session sharing this database
    pub fn new_session(&self) -> Session {
        Session::new(self.session.executor().clone())
    }

    /// The shared executor
    pub fn executor(&self) -> &Arc<Executor> {
        self.session.executor()
    }

    /// The underlying database
    pub fn database(&self) -> &Arc<Database> {
        self.session.executor().database()
    }

    /// Run a raw command in this session
    pub fn execute(&self, cmd: Command) -> Result<Output> {
        self.session.execute(cmd)
    }

    /// User accounts
    pub fn users(&self) -> Users<'_> {
        Users::new(&self.session)
    }

    /// Products, cost sheets and pricing
    pub fn products(&self) -> Products<'_> {
        Products::new(&self.session)
    }

    /// Stock items and movements
    pub fn stock(&self) -> Stock<'_> {
        Stock::new(&self.session)
    }

    /// Savings accounts
    pub fn savings(&self) -> Savers<'_> {
        Savers::new(&self.session)
    }

    /// Point of sale
    pub fn sales(&self) -> Sales<'_> {
        Sales::new(&self.session)
    }

    /// Service invoices
    pub fn invoices(&self) -> Invoices<'_> {
        Invoices::new(&self.session)
    }

    /// Customer debts
    pub fn debts(&self) -> Debts<'_> {
        Debts::new(&self.session)
    }

    /// Dashboard and period reports
    pub fn reports(&self) -> Reports<'_> {
        Reports::new(&self.session)
    }

    /// Printable documents
    pub fn documents(&self) -> Documents<'_> {
        Documents::new(&self.session)
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::Niaga;
    use niaga_primitives::accounts::{DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME};

    /// Fresh in-memory database with the admin logged in
    pub fn admin() -> Niaga {
        let niaga = Niaga::ephemeral().unwrap();
        niaga
            .login(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD)
            .unwrap();
        niaga
    }
}
