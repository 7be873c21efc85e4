//! Customer receivables

use crate::money::Rupiah;
use crate::record::Record;
use crate::types::{RecordId, Table};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A debtor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Sequence id
    pub id: u64,
    /// Name (lookup key for get-or-create)
    pub name: String,
    /// Phone
    pub phone: String,
    /// Email
    pub email: String,
    /// Address
    pub address: String,
    /// Creation time
    pub created_at: NaiveDateTime,
}

impl Record for Customer {
    const TABLE: Table = Table::Customers;

    fn record_id(&self) -> RecordId {
        RecordId::Num(self.id)
    }
}

/// Status of a receivable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtStatus {
    /// Open, not yet due
    Active,
    /// Open and past due
    Overdue,
    /// Fully paid
    Paid,
}

impl DebtStatus {
    /// Whether money is still owed.
    pub fn is_open(self) -> bool {
        !matches!(self, DebtStatus::Paid)
    }
}

/// A customer receivable.
///
/// `paid_amount + remaining_amount == total_amount` at all times, and the
/// status is `Paid` exactly when nothing remains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debt {
    /// Sequence id
    pub id: u64,
    /// Debtor
    pub customer_id: u64,
    /// Related invoice number, if any
    pub invoice_number: Option<String>,
    /// What the debt is for
    pub description: String,
    /// Original amount
    pub total_amount: Rupiah,
    /// Σ payments
    pub paid_amount: Rupiah,
    /// Still owed
    pub remaining_amount: Rupiah,
    /// Due date
    pub due_date: Option<NaiveDate>,
    /// Status
    pub status: DebtStatus,
    /// Recording user
    pub created_by: Option<u64>,
    /// Creation time
    pub created_at: NaiveDateTime,
}

impl Debt {
    /// Apply a payment. Caller validates the amount.
    pub fn apply_payment(&mut self, amount: Rupiah) {
        self.paid_amount += amount;
        self.remaining_amount = self.total_amount - self.paid_amount;
        if self.remaining_amount.is_zero() {
            self.status = DebtStatus::Paid;
        }
    }

    /// Whether the debt is active and past its due date on `today`.
    pub fn is_past_due(&self, today: NaiveDate) -> bool {
        self.status == DebtStatus::Active && self.due_date.map_or(false, |due| due < today)
    }
}

impl Record for Debt {
    const TABLE: Table = Table::Debts;

    fn record_id(&self) -> RecordId {
        RecordId::Num(self.id)
    }
}

/// A payment against a debt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtPayment {
    /// Sequence id
    pub id: u64,
    /// Debt paid
    pub debt_id: u64,
    /// Amount
    pub amount: Rupiah,
    /// Payment date
    pub date: NaiveDate,
    /// Free text
    pub notes: String,
    /// Recording user
    pub created_by: Option<u64>,
    /// Creation time
    pub created_at: NaiveDateTime,
}

impl Record for DebtPayment {
    const TABLE: Table = Table::DebtPayments;

    fn record_id(&self) -> RecordId {
        RecordId::Num(self.id)
    }
}

/// Input for a new debt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDebt {
    /// Debtor name, created when unknown
    pub customer_name: String,
    /// Phone, used when the customer is created
    #[serde(default)]
    pub phone: String,
    /// Email, used when the customer is created
    #[serde(default)]
    pub email: String,
    /// Address, used when the customer is created
    #[serde(default)]
    pub address: String,
    /// Related invoice number
    #[serde(default)]
    pub invoice_number: Option<String>,
    /// What the debt is for
    pub description: String,
    /// Amount (> 0)
    pub amount: Rupiah,
    /// Due date
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

/// A debt joined with its customer's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtView {
    /// The debt
    pub debt: Debt,
    /// Debtor name
    pub customer_name: String,
}
