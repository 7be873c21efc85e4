//! Customer debts.
//!
//! Access via `niaga.debts()`. Requires a cashier session.

use crate::{Command, Error, Output, Result, Session};
use chrono::NaiveDate;
use niaga_core::model::{Customer, DebtPayment, DebtStatus, DebtView, NewDebt};
use niaga_core::Rupiah;
use niaga_primitives::DebtReceipt;

/// Handle for receivables.
pub struct Debts<'a> {
    session: &'a Session,
}

impl<'a> Debts<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Record a debt, creating the customer on first use.
    pub fn add(&self, debt: NewDebt) -> Result<DebtView> {
        match self.session.execute(Command::DebtAdd { debt })? {
            Output::Debt(view) => Ok(view),
            _ => Err(Error::unexpected("DebtAdd")),
        }
    }

    /// Record a payment. `date` defaults to today.
    pub fn pay(
        &self,
        debt_id: u64,
        amount: Rupiah,
        notes: &str,
        date: Option<NaiveDate>,
    ) -> Result<DebtReceipt> {
        match self.session.execute(Command::DebtPay {
            debt_id,
            amount,
            notes: notes.to_string(),
            date,
        })? {
            Output::DebtReceipt(receipt) => Ok(receipt),
            _ => Err(Error::unexpected("DebtPay")),
        }
    }

    /// Debts newest first, filtered by customer name and status.
    pub fn list(&self, search: Option<&str>, status: Option<DebtStatus>) -> Result<Vec<DebtView>> {
        match self.session.execute(Command::DebtList {
            search: search.map(str::to_string),
            status,
        })? {
            Output::Debts(debts) => Ok(debts),
            _ => Err(Error::unexpected("DebtList")),
        }
    }

    /// One debt.
    pub fn get(&self, debt_id: u64) -> Result<DebtView> {
        match self.session.execute(Command::DebtGet { debt_id })? {
            Output::Debt(view) => Ok(view),
            _ => Err(Error::unexpected("DebtGet")),
        }
    }

    /// Payments of one debt, oldest first.
    pub fn payments(&self, debt_id: u64) -> Result<Vec<DebtPayment>> {
        match self.session.execute(Command::DebtPayments { debt_id })? {
            Output::Payments(payments) => Ok(payments),
            _ => Err(Error::unexpected("DebtPayments")),
        }
    }

    /// Mark active debts past their due date as overdue.
    pub fn refresh_overdue(&self) -> Result<usize> {
        match self.session.execute(Command::DebtRefreshOverdue)? {
            Output::Count(n) => Ok(n),
            _ => Err(Error::unexpected("DebtRefreshOverdue")),
        }
    }

    /// All customers by name.
    pub fn customers(&self) -> Result<Vec<Customer>> {
        match self.session.execute(Command::CustomerList)? {
            Output::Customers(customers) => Ok(customers),
            _ => Err(Error::unexpected("CustomerList")),
        }
    }

    /// What a customer still owes across open debts.
    pub fn customer_total(&self, customer_id: u64) -> Result<Rupiah> {
        match self.session.execute(Command::CustomerTotalDebt { customer_id })? {
            Output::Amount(amount) => Ok(amount),
            _ => Err(Error::unexpected("CustomerTotalDebt")),
        }
    }
}
