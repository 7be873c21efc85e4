//! Document rendering handlers.
//!
//! Each handler loads the records through the primitives, then renders them
//! with the business settings in effect.

use std::sync::Arc;

use chrono::NaiveDate;
use niaga_documents as docs;

use crate::bridge::Primitives;
use crate::convert::convert_result;
use crate::{Output, Result};

/// Handle RenderSaleReceipt command.
///
/// A sale whose cashier account no longer exists prints `N/A`.
pub fn sale_receipt(p: &Arc<Primitives>, sale_id: u64) -> Result<Output> {
    let sale = convert_result(p.cashier.get_sale(sale_id))?;
    let settings = convert_result(p.settings.get())?;
    let cashier = match sale.cashier_id {
        Some(id) => p.accounts.get_user(id).ok().map(|u| u.username),
        None => None,
    };
    Ok(Output::Document(docs::sale_receipt(
        &settings,
        &sale,
        cashier.as_deref(),
    )))
}

/// Handle RenderSavingsReceipt command.
pub fn savings_receipt(p: &Arc<Primitives>, entry_id: u64) -> Result<Output> {
    let receipt = convert_result(p.savings.receipt(entry_id))?;
    let settings = convert_result(p.settings.get())?;
    Ok(Output::Document(docs::savings_receipt(
        &settings,
        &receipt.saver,
        &receipt.entry,
    )))
}

/// Handle RenderStatement command.
pub fn statement(p: &Arc<Primitives>, saver_id: u64) -> Result<Output> {
    let statement = convert_result(p.savings.statement(saver_id))?;
    let settings = convert_result(p.settings.get())?;
    Ok(Output::Document(docs::savings_statement(
        &settings,
        &statement,
        p.db.clock().now(),
    )))
}

/// Handle RenderInvoice command.
pub fn invoice(p: &Arc<Primitives>, invoice_id: u64) -> Result<Output> {
    let invoice = convert_result(p.invoices.get_invoice(invoice_id))?;
    let settings = convert_result(p.settings.get())?;
    Ok(Output::Document(docs::invoice(&settings, &invoice)))
}

/// Handle RenderReport command.
pub fn report(p: &Arc<Primitives>, start: NaiveDate, end: NaiveDate) -> Result<Output> {
    let report = convert_result(p.reports.period_report(start, end))?;
    let settings = convert_result(p.settings.get())?;
    Ok(Output::Document(docs::business_report(
        &settings,
        &report,
        p.db.clock().now(),
    )))
}

/// Handle RenderPriceList command.
pub fn price_list(p: &Arc<Primitives>) -> Result<Output> {
    let rows = convert_result(p.catalog.price_list())?;
    let settings = convert_result(p.settings.get())?;
    Ok(Output::Document(docs::price_list(&settings, &rows)))
}

/// Handle RenderLabel command.
pub fn label(p: &Arc<Primitives>, product_id: String) -> Result<Output> {
    let product = convert_result(p.catalog.get_product(&product_id))?;
    Ok(Output::Document(docs::product_label(&product)))
}
