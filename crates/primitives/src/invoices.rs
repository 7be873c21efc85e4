//! Invoices primitive
//!
//! Service invoices. Line amounts and totals are always computed here from
//! quantity, rate, discount and tax; a caller cannot submit an amount.
//!
//! Status lifecycle:
//!
//! ```text
//! Draft ──> Sent ──> Paid
//!   │         │       ^
//!   │         v       │
//!   └────> Overdue ───┘
//! ```
//!
//! Paid is terminal.

use crate::validate::{contains_ci, non_negative_amount, percentage, positive_quantity, required};
use chrono::NaiveDate;
use niaga_core::model::invoice::invoice_number;
use niaga_core::model::{Invoice, InvoiceLine, InvoiceStatus, InvoiceTotals, NewInvoice};
use niaga_core::{EntityRef, NiagaError, NiagaResult, Table};
use niaga_engine::{Database, TransactionContext};
use std::sync::Arc;
use tracing::info;

/// Invoices primitive
#[derive(Clone)]
pub struct Invoices {
    db: Arc<Database>,
}

impl Invoices {
    /// Create a new invoices facade
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Create a draft invoice numbered `INV-{id:05}`
    pub fn create_invoice(&self, new: &NewInvoice) -> NiagaResult<Invoice> {
        let client_name = required("client name", &new.client_name)?;
        if new.items.is_empty() {
            return Err(NiagaError::invalid_input("invoice needs at least one line"));
        }
        let mut items: Vec<InvoiceLine> = Vec::with_capacity(new.items.len());
        for line in &new.items {
            required("line description", &line.description)?;
            positive_quantity("line quantity", line.quantity)?;
            non_negative_amount("line rate", line.rate)?;
            let priced = line.priced();
            non_negative_amount("line amount", priced.amount)?;
            items.push(priced);
        }
        percentage("discount", new.discount_percent)?;
        percentage("tax rate", new.tax_rate)?;
        if new.due_date < new.issue_date {
            return Err(NiagaError::invalid_input(
                "due date cannot be before the issue date",
            ));
        }
        let totals = InvoiceTotals::compute(&items, new.discount_percent, new.tax_rate)?;

        let invoice = self.db.transaction(|txn| {
            let id = txn.next_id(Table::Invoices)?;
            let now = txn.now();
            let invoice = Invoice {
                id,
                number: invoice_number(id),
                client_name: client_name.clone(),
                client_email: new.client_email.trim().to_string(),
                client_phone: new.client_phone.trim().to_string(),
                client_address: new.client_address.trim().to_string(),
                service_date: new.service_date,
                issue_date: new.issue_date,
                due_date: new.due_date,
                status: InvoiceStatus::Draft,
                notes: new.notes.trim().to_string(),
                items: items.clone(),
                subtotal: totals.subtotal,
                discount_percent: new.discount_percent,
                discount_amount: totals.discount_amount,
                tax_rate: new.tax_rate,
                tax_amount: totals.tax_amount,
                total: totals.total,
                created_at: now,
                updated_at: now,
            };
            txn.put_record(&invoice)?;
            Ok(invoice)
        })?;
        info!(invoice = %invoice.number, total = %invoice.total, "invoice created");
        Ok(invoice)
    }

    /// Move an invoice to `status`
    ///
    /// Setting the current status again is a no-op.
    pub fn set_status(&self, invoice_id: u64, status: InvoiceStatus) -> NiagaResult<Invoice> {
        let invoice = self.db.transaction(|txn| {
            let mut invoice = txn.require::<Invoice>(invoice_id)?;
            if invoice.status == status {
                return Ok(invoice);
            }
            if !invoice.status.can_transition_to(status) {
                return Err(NiagaError::InvalidTransition {
                    entity: EntityRef::new(Table::Invoices, &invoice.number),
                    from: invoice.status.to_string(),
                    to: status.to_string(),
                });
            }
            invoice.status = status;
            invoice.updated_at = txn.now();
            txn.put_record(&invoice)?;
            Ok(invoice)
        })?;
        info!(invoice = %invoice.number, status = %invoice.status, "invoice status set");
        Ok(invoice)
    }

    /// Mark Draft and Sent invoices past their due date as Overdue
    ///
    /// Returns how many changed.
    pub fn refresh_overdue(&self, today: NaiveDate) -> NiagaResult<usize> {
        let changed = self.db.transaction(|txn| mark_overdue(txn, today))?;
        if changed > 0 {
            info!(changed, %today, "invoices marked overdue");
        }
        Ok(changed)
    }

    /// One invoice
    pub fn get_invoice(&self, invoice_id: u64) -> NiagaResult<Invoice> {
        self.db.read(|txn| txn.require::<Invoice>(invoice_id))
    }

    /// All invoices, newest first
    pub fn list_invoices(&self) -> NiagaResult<Vec<Invoice>> {
        let mut invoices = self.db.read(|txn| txn.scan_records::<Invoice>())?;
        invoices.reverse();
        Ok(invoices)
    }

    /// Invoices whose client name (ignoring case) or phone contains `query`
    pub fn search_invoices(&self, query: &str) -> NiagaResult<Vec<Invoice>> {
        let query = query.trim();
        Ok(self
            .list_invoices()?
            .into_iter()
            .filter(|i| contains_ci(&i.client_name, query) || i.client_phone.contains(query))
            .collect())
    }
}

fn mark_overdue(txn: &mut TransactionContext, today: NaiveDate) -> NiagaResult<usize> {
    let now = txn.now();
    let due: Vec<Invoice> = txn
        .scan_records::<Invoice>()?
        .into_iter()
        .filter(|i| i.is_past_due(today))
        .collect();
    for mut invoice in due.iter().cloned() {
        invoice.status = InvoiceStatus::Overdue;
        invoice.updated_at = now;
        txn.put_record(&invoice)?;
    }
    Ok(due.len())
}
