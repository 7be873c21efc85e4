//! Savings accounts.
//!
//! Access via `niaga.savings()`. Deposits, withdrawals and balance lookups
//! are open to any logged-in user; the saver list and dashboard need a
//! cashier.

use crate::{Command, Error, Output, Result, Session};
use niaga_core::model::{BalanceLookup, Saver, SavingsDashboard, SavingsRequest, Statement};
use niaga_primitives::SavingsReceipt;

/// Handle for the savings ledger.
pub struct Savers<'a> {
    session: &'a Session,
}

impl<'a> Savers<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Record a deposit, opening the account on first use.
    pub fn deposit(&self, request: SavingsRequest) -> Result<SavingsReceipt> {
        match self.session.execute(Command::SavingsDeposit { request })? {
            Output::SavingsReceipt(receipt) => Ok(receipt),
            _ => Err(Error::unexpected("SavingsDeposit")),
        }
    }

    /// Record a withdrawal; fails when the balance is too low.
    pub fn withdraw(&self, request: SavingsRequest) -> Result<SavingsReceipt> {
        match self.session.execute(Command::SavingsWithdraw { request })? {
            Output::SavingsReceipt(receipt) => Ok(receipt),
            _ => Err(Error::unexpected("SavingsWithdraw")),
        }
    }

    /// One saver.
    pub fn get(&self, saver_id: u64) -> Result<Saver> {
        match self.session.execute(Command::SaverGet { saver_id })? {
            Output::Saver(saver) => Ok(saver),
            _ => Err(Error::unexpected("SaverGet")),
        }
    }

    /// All savers.
    pub fn list(&self) -> Result<Vec<Saver>> {
        match self.session.execute(Command::SaverList)? {
            Output::Savers(savers) => Ok(savers),
            _ => Err(Error::unexpected("SaverList")),
        }
    }

    /// Balance and entries of one saver, newest first.
    pub fn statement(&self, saver_id: u64) -> Result<Statement> {
        match self.session.execute(Command::SavingsStatement { saver_id })? {
            Output::Statement(statement) => Ok(statement),
            _ => Err(Error::unexpected("SavingsStatement")),
        }
    }

    /// A past entry with its saver, for reprinting a receipt.
    pub fn receipt(&self, entry_id: u64) -> Result<SavingsReceipt> {
        match self.session.execute(Command::SavingsReceipt { entry_id })? {
            Output::SavingsReceipt(receipt) => Ok(receipt),
            _ => Err(Error::unexpected("SavingsReceipt")),
        }
    }

    /// Totals, recent entries and savers matching `search`.
    pub fn dashboard(&self, search: &str) -> Result<SavingsDashboard> {
        match self.session.execute(Command::SavingsDashboard {
            search: search.to_string(),
        })? {
            Output::SavingsDashboard(dashboard) => Ok(dashboard),
            _ => Err(Error::unexpected("SavingsDashboard")),
        }
    }

    /// Balance by exact saver name; zero when the saver is unknown.
    pub fn balance(&self, name: &str) -> Result<BalanceLookup> {
        match self.session.execute(Command::SavingsBalance {
            name: name.to_string(),
        })? {
            Output::Balance(lookup) => Ok(lookup),
            _ => Err(Error::unexpected("SavingsBalance")),
        }
    }
}
