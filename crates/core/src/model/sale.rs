//! Cashier sales

use crate::money::Rupiah;
use crate::record::Record;
use crate::types::{RecordId, Table};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One line of a cart submitted to the cashier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Inventory item
    pub item_id: u64,
    /// Units (> 0)
    pub quantity: i64,
}

/// One line of a completed sale, priced at the time of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
    /// Inventory item
    pub item_id: u64,
    /// Item code
    pub code: String,
    /// Product name
    pub name: String,
    /// Buying price per unit
    pub purchase_price: Rupiah,
    /// Selling price per unit
    pub selling_price: Rupiah,
    /// Units sold
    pub quantity: i64,
    /// `selling_price × quantity`
    pub subtotal: Rupiah,
}

impl SaleLine {
    /// `(selling − purchase) × quantity`
    pub fn profit(&self) -> Rupiah {
        (self.selling_price - self.purchase_price).times(self.quantity)
    }
}

/// A completed cashier transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    /// Sequence id
    pub id: u64,
    /// Time of sale
    pub timestamp: NaiveDateTime,
    /// Priced lines
    pub lines: Vec<SaleLine>,
    /// Σ subtotals
    pub total: Rupiah,
    /// Σ line profit
    pub profit: Rupiah,
    /// Amount tendered
    pub payment: Rupiah,
    /// `payment − total`
    pub change: Rupiah,
    /// Cashier who rang it up
    pub cashier_id: Option<u64>,
}

impl Sale {
    /// Reference written on the stock movements of this sale.
    pub fn reference(&self) -> String {
        sale_reference(self.id)
    }

    /// Total units across all lines.
    pub fn units(&self) -> i64 {
        self.lines
            .iter()
            .fold(0i64, |units, l| units.saturating_add(l.quantity))
    }
}

/// `SALE-{id}`
pub fn sale_reference(id: u64) -> String {
    format!("SALE-{}", id)
}

impl Record for Sale {
    const TABLE: Table = Table::Sales;

    fn record_id(&self) -> RecordId {
        RecordId::Num(self.id)
    }
}
