//! Report command handlers.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::bridge::Primitives;
use crate::convert::convert_result;
use crate::{Output, Result};

/// Handle Dashboard command for the business clock's today.
pub fn dashboard(p: &Arc<Primitives>) -> Result<Output> {
    let today = p.db.clock().today();
    Ok(Output::Dashboard(convert_result(p.reports.dashboard(today))?))
}

/// Handle PeriodReport command.
pub fn period_report(p: &Arc<Primitives>, start: NaiveDate, end: NaiveDate) -> Result<Output> {
    Ok(Output::Report(convert_result(
        p.reports.period_report(start, end),
    )?))
}
