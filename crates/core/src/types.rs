//! Record addressing
//!
//! Every stored row lives under a [`Key`]: the [`Table`] it belongs to plus a
//! [`RecordId`]. Numeric ids sort before named ids, and numeric ids sort
//! numerically, so a table scan returns records in creation order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logical tables of the business database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    /// Id counters, one row per table.
    Sequences,
    /// Business identity printed on documents (single row).
    Settings,
    /// Login accounts.
    Users,
    /// Products with pricing and stock counters.
    Products,
    /// Material, service and maintenance cost lines per product.
    CostEntries,
    /// Sellable stock items with their own code.
    InventoryItems,
    /// Append-only stock movements.
    StockMovements,
    /// Savings account holders.
    Savers,
    /// Append-only savings ledger.
    SavingsEntries,
    /// Cashier sales.
    Sales,
    /// Service invoices.
    Invoices,
    /// Debtor customers.
    Customers,
    /// Customer receivables.
    Debts,
    /// Payments against receivables.
    DebtPayments,
}

impl Table {
    /// All tables, in storage order.
    pub const ALL: [Table; 14] = [
        Table::Sequences,
        Table::Settings,
        Table::Users,
        Table::Products,
        Table::CostEntries,
        Table::InventoryItems,
        Table::StockMovements,
        Table::Savers,
        Table::SavingsEntries,
        Table::Sales,
        Table::Invoices,
        Table::Customers,
        Table::Debts,
        Table::DebtPayments,
    ];

    /// Stable snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Sequences => "sequences",
            Table::Settings => "settings",
            Table::Users => "users",
            Table::Products => "products",
            Table::CostEntries => "cost_entries",
            Table::InventoryItems => "inventory_items",
            Table::StockMovements => "stock_movements",
            Table::Savers => "savers",
            Table::SavingsEntries => "savings_entries",
            Table::Sales => "sales",
            Table::Invoices => "invoices",
            Table::Customers => "customers",
            Table::Debts => "debts",
            Table::DebtPayments => "debt_payments",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Table {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Table::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown table '{}'", s))
    }
}

/// Identifier of a record within its table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RecordId {
    /// Sequence-allocated id.
    Num(u64),
    /// Caller-chosen id (product codes, singleton rows, sequence names).
    Name(String),
}

impl RecordId {
    /// Numeric value, if this is a sequence id.
    pub fn as_num(&self) -> Option<u64> {
        match self {
            RecordId::Num(n) => Some(*n),
            RecordId::Name(_) => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Num(n) => write!(f, "{}", n),
            RecordId::Name(s) => f.write_str(s),
        }
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        RecordId::Num(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Name(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::Name(s)
    }
}

/// Storage key: table plus record id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Key {
    /// Table the record lives in
    pub table: Table,
    /// Record id within the table
    pub id: RecordId,
}

impl Key {
    /// Create a key.
    pub fn new(table: Table, id: impl Into<RecordId>) -> Self {
        Self {
            table,
            id: id.into(),
        }
    }

    /// Key of the id counter for `table`.
    pub fn sequence(table: Table) -> Self {
        Self::new(Table::Sequences, table.as_str())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.table, self.id)
    }
}
