//! Point of sale.
//!
//! Access via `niaga.sales()`.

use crate::{Command, Error, Output, Result, Session};
use chrono::NaiveDate;
use niaga_core::model::{CartLine, Sale};
use niaga_core::Rupiah;

/// Handle for the cashier.
pub struct Sales<'a> {
    session: &'a Session,
}

impl<'a> Sales<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Sell a cart, taking stock and recording the sale in one step.
    pub fn process(&self, cart: Vec<CartLine>, payment: Rupiah) -> Result<Sale> {
        match self.session.execute(Command::SaleProcess { cart, payment })? {
            Output::Sale(sale) => Ok(sale),
            _ => Err(Error::unexpected("SaleProcess")),
        }
    }

    /// One sale.
    pub fn get(&self, sale_id: u64) -> Result<Sale> {
        match self.session.execute(Command::SaleGet { sale_id })? {
            Output::Sale(sale) => Ok(sale),
            _ => Err(Error::unexpected("SaleGet")),
        }
    }

    /// Sales between two dates, inclusive, newest first.
    pub fn list(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Vec<Sale>> {
        match self.session.execute(Command::SaleList { start, end })? {
            Output::Sales(sales) => Ok(sales),
            _ => Err(Error::unexpected("SaleList")),
        }
    }

    /// Revenue of one day.
    pub fn revenue_on(&self, date: NaiveDate) -> Result<Rupiah> {
        match self.session.execute(Command::RevenueOn { date })? {
            Output::Amount(amount) => Ok(amount),
            _ => Err(Error::unexpected("RevenueOn")),
        }
    }
}
