//! Savings command handlers.

use std::sync::Arc;

use niaga_core::model::SavingsRequest;

use crate::bridge::Primitives;
use crate::convert::convert_result;
use crate::{Output, Result};

/// Handle SavingsDeposit command.
pub fn deposit(p: &Arc<Primitives>, request: SavingsRequest) -> Result<Output> {
    Ok(Output::SavingsReceipt(convert_result(
        p.savings.deposit(&request),
    )?))
}

/// Handle SavingsWithdraw command.
pub fn withdraw(p: &Arc<Primitives>, request: SavingsRequest) -> Result<Output> {
    Ok(Output::SavingsReceipt(convert_result(
        p.savings.withdraw(&request),
    )?))
}

/// Handle SaverGet command.
pub fn saver_get(p: &Arc<Primitives>, saver_id: u64) -> Result<Output> {
    Ok(Output::Saver(convert_result(p.savings.get_saver(saver_id))?))
}

/// Handle SaverList command.
pub fn saver_list(p: &Arc<Primitives>) -> Result<Output> {
    Ok(Output::Savers(convert_result(p.savings.list_savers())?))
}

/// Handle SavingsStatement command.
pub fn statement(p: &Arc<Primitives>, saver_id: u64) -> Result<Output> {
    Ok(Output::Statement(convert_result(
        p.savings.statement(saver_id),
    )?))
}

/// Handle SavingsReceipt command.
pub fn receipt(p: &Arc<Primitives>, entry_id: u64) -> Result<Output> {
    Ok(Output::SavingsReceipt(convert_result(
        p.savings.receipt(entry_id),
    )?))
}

/// Handle SavingsDashboard command.
pub fn dashboard(p: &Arc<Primitives>, search: String) -> Result<Output> {
    Ok(Output::SavingsDashboard(convert_result(
        p.savings.dashboard(&search),
    )?))
}

/// Handle SavingsBalance command.
pub fn balance(p: &Arc<Primitives>, name: String) -> Result<Output> {
    Ok(Output::Balance(convert_result(
        p.savings.balance_by_name(&name),
    )?))
}
