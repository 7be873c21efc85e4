//! Service invoices ("nota")
//!
//! Line amounts and totals are always computed here from quantities, rates
//! and percentages; amounts supplied by a client are never stored.

use crate::error::NiagaResult;
use crate::money::Rupiah;
use crate::record::Record;
use crate::types::{RecordId, Table};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Being prepared
    Draft,
    /// Sent to the client
    Sent,
    /// Settled (terminal)
    Paid,
    /// Past due and unpaid
    Overdue,
}

impl InvoiceStatus {
    /// Whether `self -> next` is an allowed transition.
    pub fn can_transition_to(self, next: InvoiceStatus) -> bool {
        use InvoiceStatus::*;
        matches!(
            (self, next),
            (Draft, Sent) | (Draft, Paid) | (Draft, Overdue) | (Sent, Paid) | (Sent, Overdue) | (Overdue, Paid)
        )
    }

    /// Whether the invoice still expects payment.
    pub fn is_open(self) -> bool {
        matches!(self, InvoiceStatus::Draft | InvoiceStatus::Sent)
    }

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A priced invoice line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// Service description
    pub description: String,
    /// Quantity, may be fractional (hours)
    pub quantity: f64,
    /// Rate per unit
    pub rate: Rupiah,
    /// `round(quantity × rate)`
    pub amount: Rupiah,
}

/// An invoice line as submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInvoiceLine {
    /// Service description
    pub description: String,
    /// Quantity (> 0)
    pub quantity: f64,
    /// Rate per unit (≥ 0)
    pub rate: Rupiah,
}

impl NewInvoiceLine {
    /// Price the line.
    pub fn priced(&self) -> InvoiceLine {
        InvoiceLine {
            description: self.description.trim().to_string(),
            quantity: self.quantity,
            rate: self.rate,
            amount: self.rate.times_quantity(self.quantity),
        }
    }
}

/// Input for a new invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInvoice {
    /// Client name (required)
    pub client_name: String,
    /// Client email
    #[serde(default)]
    pub client_email: String,
    /// Client phone
    #[serde(default)]
    pub client_phone: String,
    /// Client address
    #[serde(default)]
    pub client_address: String,
    /// Date the service was performed
    pub service_date: NaiveDate,
    /// Date of issue
    pub issue_date: NaiveDate,
    /// Payment due date (≥ issue date)
    pub due_date: NaiveDate,
    /// Free text
    #[serde(default)]
    pub notes: String,
    /// Lines (at least one)
    pub items: Vec<NewInvoiceLine>,
    /// Discount percentage, 0..=100
    #[serde(default)]
    pub discount_percent: f64,
    /// Tax percentage, 0..=100
    #[serde(default)]
    pub tax_rate: f64,
}

/// Computed invoice totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    /// Σ line amounts
    pub subtotal: Rupiah,
    /// `round(subtotal × discount%)`
    pub discount_amount: Rupiah,
    /// `round((subtotal − discount) × tax%)`
    pub tax_amount: Rupiah,
    /// `subtotal − discount + tax`
    pub total: Rupiah,
}

impl InvoiceTotals {
    /// Totals of priced lines. The discount applies before tax.
    ///
    /// Fails with `InvalidInput` when a total does not fit in an `i64`.
    pub fn compute(
        lines: &[InvoiceLine],
        discount_percent: f64,
        tax_rate: f64,
    ) -> NiagaResult<Self> {
        let subtotal = Rupiah::checked_sum(lines.iter().map(|l| l.amount))?;
        let discount_amount = subtotal.percent(discount_percent);
        let taxable = subtotal.checked_sub(discount_amount)?;
        let tax_amount = taxable.percent(tax_rate);
        Ok(Self {
            subtotal,
            discount_amount,
            tax_amount,
            total: taxable.checked_add(tax_amount)?,
        })
    }
}

/// A stored invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Sequence id
    pub id: u64,
    /// `INV-00001`
    pub number: String,
    /// Client name
    pub client_name: String,
    /// Client email
    pub client_email: String,
    /// Client phone
    pub client_phone: String,
    /// Client address
    pub client_address: String,
    /// Date the service was performed
    pub service_date: NaiveDate,
    /// Date of issue
    pub issue_date: NaiveDate,
    /// Payment due date
    pub due_date: NaiveDate,
    /// Lifecycle status
    pub status: InvoiceStatus,
    /// Free text
    pub notes: String,
    /// Priced lines
    pub items: Vec<InvoiceLine>,
    /// Σ line amounts
    pub subtotal: Rupiah,
    /// Discount percentage
    pub discount_percent: f64,
    /// Discount in rupiah
    pub discount_amount: Rupiah,
    /// Tax percentage
    pub tax_rate: f64,
    /// Tax in rupiah
    pub tax_amount: Rupiah,
    /// Amount due
    pub total: Rupiah,
    /// Creation time
    pub created_at: NaiveDateTime,
    /// Last change
    pub updated_at: NaiveDateTime,
}

impl Invoice {
    /// Whether the invoice is open and past its due date on `today`.
    pub fn is_past_due(&self, today: NaiveDate) -> bool {
        self.status.is_open() && self.due_date < today
    }
}

impl Record for Invoice {
    const TABLE: Table = Table::Invoices;

    fn record_id(&self) -> RecordId {
        RecordId::Num(self.id)
    }
}

/// `INV-{id:05}`
pub fn invoice_number(id: u64) -> String {
    format!("INV-{:05}", id)
}
