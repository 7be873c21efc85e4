//! Stock items and the stock movement ledger

use crate::money::Rupiah;
use crate::record::Record;
use crate::types::{RecordId, Table};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A sellable stock item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Sequence id
    pub id: u64,
    /// Product this item stocks
    pub product_id: String,
    /// Unique stock code
    pub code: String,
    /// Buying price per unit
    pub purchase_price: Rupiah,
    /// Selling price per unit
    pub selling_price: Rupiah,
    /// Units stocked at creation
    pub initial_stock: i64,
    /// Units on hand, never negative
    pub current_stock: i64,
    /// Reorder threshold
    pub minimum_stock: i64,
    /// Creation time
    pub created_at: NaiveDateTime,
}

impl InventoryItem {
    /// Stock status of this item.
    pub fn status(&self) -> StockStatus {
        StockStatus::classify(self.current_stock, self.minimum_stock)
    }

    /// True when the item needs restocking.
    pub fn is_low(&self) -> bool {
        self.current_stock <= self.minimum_stock
    }

    /// Value of the units on hand at purchase price.
    pub fn stock_value(&self) -> Rupiah {
        self.purchase_price.times(self.current_stock)
    }
}

impl Record for InventoryItem {
    const TABLE: Table = Table::InventoryItems;

    fn record_id(&self) -> RecordId {
        RecordId::Num(self.id)
    }
}

/// Input for a new stock item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    /// Existing product
    pub product_id: String,
    /// Unique stock code
    pub code: String,
    /// Buying price
    pub purchase_price: Rupiah,
    /// Selling price
    pub selling_price: Rupiah,
    /// Opening stock
    #[serde(default)]
    pub initial_stock: i64,
    /// Reorder threshold, configured default when absent
    #[serde(default)]
    pub minimum_stock: Option<i64>,
}

/// A manual stock operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockAction {
    /// Receive `quantity` units
    Add,
    /// Remove `quantity` units
    Subtract,
    /// Change the reorder threshold to `quantity`
    SetMinimum,
    /// Set the on-hand count to `quantity` (stock take)
    Set,
}

/// Kind of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Units received
    In,
    /// Units removed manually
    Out,
    /// Count corrected to an absolute value
    Adjustment,
    /// Units sold at the cashier
    Sale,
    /// Reorder threshold changed, stock untouched
    MinimumChanged,
}

impl MovementKind {
    /// Indonesian label used on documents.
    pub fn label(&self) -> &'static str {
        match self {
            MovementKind::In => "Masuk",
            MovementKind::Out => "Keluar",
            MovementKind::Adjustment => "Penyesuaian",
            MovementKind::Sale => "Penjualan",
            MovementKind::MinimumChanged => "Ubah Minimum",
        }
    }
}

/// One entry of the append-only stock ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    /// Sequence id
    pub id: u64,
    /// Item moved
    pub item_id: u64,
    /// Kind
    pub kind: MovementKind,
    /// Units moved (for `Adjustment`, the absolute delta)
    pub quantity: i64,
    /// On-hand count before
    pub stock_before: i64,
    /// On-hand count after
    pub stock_after: i64,
    /// Short reason
    pub reason: String,
    /// External reference, e.g. `SALE-12`
    pub reference: Option<String>,
    /// Free text
    pub notes: String,
    /// Acting user
    pub created_by: Option<u64>,
    /// Time of the movement
    pub created_at: NaiveDateTime,
}

impl StockMovement {
    /// Signed change of the on-hand count.
    pub fn delta(&self) -> i64 {
        self.stock_after - self.stock_before
    }
}

impl Record for StockMovement {
    const TABLE: Table = Table::StockMovements;

    fn record_id(&self) -> RecordId {
        RecordId::Num(self.id)
    }
}

/// Traffic-light stock status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Nothing on hand
    Empty,
    /// At or below the minimum
    Low,
    /// At or below twice the minimum
    Medium,
    /// Comfortably stocked
    Safe,
}

impl StockStatus {
    /// Classify an on-hand count against its minimum.
    pub fn classify(current: i64, minimum: i64) -> Self {
        if current <= 0 {
            StockStatus::Empty
        } else if current <= minimum {
            StockStatus::Low
        } else if current <= minimum.saturating_mul(2) {
            StockStatus::Medium
        } else {
            StockStatus::Safe
        }
    }

    /// Indonesian label.
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::Empty => "Habis",
            StockStatus::Low => "Rendah",
            StockStatus::Medium => "Sedang",
            StockStatus::Safe => "Aman",
        }
    }
}

/// An item joined with its product name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemView {
    /// The item
    pub item: InventoryItem,
    /// Name of the product it stocks
    pub product_name: String,
    /// Current status
    pub status: StockStatus,
}
