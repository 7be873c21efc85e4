//! Printable documents.
//!
//! Access via `niaga.documents()`. Each call renders with the business
//! settings in effect; the caller decides where the bytes go.

use crate::{Command, Error, Output, Result, Session};
use chrono::NaiveDate;
use niaga_documents::Document;

/// Handle for document rendering.
pub struct Documents<'a> {
    session: &'a Session,
}

impl<'a> Documents<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    fn render(&self, cmd: Command) -> Result<Document> {
        let name = cmd.name();
        match self.session.execute(cmd)? {
            Output::Document(doc) => Ok(doc),
            _ => Err(Error::unexpected(name)),
        }
    }

    /// 40-column receipt of a sale.
    pub fn sale_receipt(&self, sale_id: u64) -> Result<Document> {
        self.render(Command::RenderSaleReceipt { sale_id })
    }

    /// 40-column receipt of a savings entry.
    pub fn savings_receipt(&self, entry_id: u64) -> Result<Document> {
        self.render(Command::RenderSavingsReceipt { entry_id })
    }

    /// Account statement of a saver.
    pub fn statement(&self, saver_id: u64) -> Result<Document> {
        self.render(Command::RenderStatement { saver_id })
    }

    /// Service invoice.
    pub fn invoice(&self, invoice_id: u64) -> Result<Document> {
        self.render(Command::RenderInvoice { invoice_id })
    }

    /// Business report for `start..=end`.
    pub fn report(&self, start: NaiveDate, end: NaiveDate) -> Result<Document> {
        self.render(Command::RenderReport { start, end })
    }

    /// Price list of all products.
    pub fn price_list(&self) -> Result<Document> {
        self.render(Command::RenderPriceList)
    }

    /// Barcode and QR label of a product.
    pub fn label(&self, product_id: &str) -> Result<Document> {
        self.render(Command::RenderLabel {
            product_id: product_id.to_string(),
        })
    }
}
