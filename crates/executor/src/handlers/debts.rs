//! Debt command handlers.

use std::sync::Arc;

use chrono::NaiveDate;
use niaga_core::model::{DebtStatus, NewDebt, UserProfile};
use niaga_core::Rupiah;

use crate::bridge::Primitives;
use crate::convert::convert_result;
use crate::handlers::actor_id;
use crate::{Output, Result};

/// Handle DebtAdd command.
pub fn debt_add(p: &Arc<Primitives>, actor: Option<&UserProfile>, debt: NewDebt) -> Result<Output> {
    Ok(Output::Debt(convert_result(
        p.debts.add_debt(&debt, actor_id(actor)),
    )?))
}

/// Handle DebtPay command.
pub fn debt_pay(
    p: &Arc<Primitives>,
    actor: Option<&UserProfile>,
    debt_id: u64,
    amount: Rupiah,
    notes: String,
    date: Option<NaiveDate>,
) -> Result<Output> {
    let receipt = convert_result(p.debts.pay_debt(
        debt_id,
        amount,
        &notes,
        actor_id(actor),
        date,
    ))?;
    Ok(Output::DebtReceipt(receipt))
}

/// Handle DebtList command.
///
/// A read-only executor reports overdue debts without storing the change.
pub fn debt_list(
    p: &Arc<Primitives>,
    search: Option<String>,
    status: Option<DebtStatus>,
    read_only: bool,
) -> Result<Output> {
    let views = if read_only {
        p.debts.view_debts(search.as_deref(), status)
    } else {
        p.debts.list_debts(search.as_deref(), status)
    };
    Ok(Output::Debts(convert_result(views)?))
}

/// Handle DebtGet command.
pub fn debt_get(p: &Arc<Primitives>, debt_id: u64) -> Result<Output> {
    Ok(Output::Debt(convert_result(p.debts.get_debt(debt_id))?))
}

/// Handle DebtPayments command.
pub fn debt_payments(p: &Arc<Primitives>, debt_id: u64) -> Result<Output> {
    Ok(Output::Payments(convert_result(p.debts.payments(debt_id))?))
}

/// Handle DebtRefreshOverdue command, against the business clock.
pub fn debt_refresh_overdue(p: &Arc<Primitives>) -> Result<Output> {
    let today = p.db.clock().today();
    Ok(Output::Count(convert_result(p.debts.refresh_overdue(today))?))
}

/// Handle CustomerList command.
pub fn customer_list(p: &Arc<Primitives>) -> Result<Output> {
    Ok(Output::Customers(convert_result(p.debts.list_customers())?))
}

/// Handle CustomerTotalDebt command.
pub fn customer_total_debt(p: &Arc<Primitives>, customer_id: u64) -> Result<Output> {
    Ok(Output::Amount(convert_result(
        p.debts.customer_total_debt(customer_id),
    )?))
}
