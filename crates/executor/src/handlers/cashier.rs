//! Cashier command handlers.

use std::sync::Arc;

use chrono::NaiveDate;
use niaga_core::model::{CartLine, UserProfile};
use niaga_core::Rupiah;

use crate::bridge::Primitives;
use crate::convert::convert_result;
use crate::handlers::actor_id;
use crate::{Output, Result};

/// Handle SaleProcess command: the session's user is the cashier.
pub fn sale_process(
    p: &Arc<Primitives>,
    actor: Option<&UserProfile>,
    cart: Vec<CartLine>,
    payment: Rupiah,
) -> Result<Output> {
    let sale = convert_result(p.cashier.process_sale(actor_id(actor), &cart, payment))?;
    Ok(Output::Sale(sale))
}

/// Handle SaleGet command.
pub fn sale_get(p: &Arc<Primitives>, sale_id: u64) -> Result<Output> {
    Ok(Output::Sale(convert_result(p.cashier.get_sale(sale_id))?))
}

/// Handle SaleList command.
pub fn sale_list(
    p: &Arc<Primitives>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Output> {
    Ok(Output::Sales(convert_result(p.cashier.list_sales(start, end))?))
}

/// Handle RevenueOn command.
pub fn revenue_on(p: &Arc<Primitives>, date: NaiveDate) -> Result<Output> {
    Ok(Output::Amount(convert_result(p.cashier.revenue_on(date))?))
}
