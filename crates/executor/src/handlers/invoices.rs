//! Invoice command handlers.

use std::sync::Arc;

use niaga_core::model::{InvoiceStatus, NewInvoice};

use crate::bridge::Primitives;
use crate::convert::convert_result;
use crate::{Output, Result};

/// Handle InvoiceCreate command.
pub fn invoice_create(p: &Arc<Primitives>, invoice: NewInvoice) -> Result<Output> {
    Ok(Output::Invoice(convert_result(
        p.invoices.create_invoice(&invoice),
    )?))
}

/// Handle InvoiceGet command.
pub fn invoice_get(p: &Arc<Primitives>, invoice_id: u64) -> Result<Output> {
    Ok(Output::Invoice(convert_result(
        p.invoices.get_invoice(invoice_id),
    )?))
}

/// Handle InvoiceList command.
pub fn invoice_list(p: &Arc<Primitives>) -> Result<Output> {
    Ok(Output::Invoices(convert_result(p.invoices.list_invoices())?))
}

/// Handle InvoiceSearch command.
pub fn invoice_search(p: &Arc<Primitives>, query: String) -> Result<Output> {
    Ok(Output::Invoices(convert_result(
        p.invoices.search_invoices(&query),
    )?))
}

/// Handle InvoiceSetStatus command.
pub fn invoice_set_status(
    p: &Arc<Primitives>,
    invoice_id: u64,
    status: InvoiceStatus,
) -> Result<Output> {
    Ok(Output::Invoice(convert_result(
        p.invoices.set_status(invoice_id, status),
    )?))
}

/// Handle InvoiceRefreshOverdue command, against the business clock.
pub fn invoice_refresh_overdue(p: &Arc<Primitives>) -> Result<Output> {
    let today = p.db.clock().today();
    Ok(Output::Count(convert_result(
        p.invoices.refresh_overdue(today),
    )?))
}
