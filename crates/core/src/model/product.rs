//! Products and their cost sheets

use crate::error::{NiagaError, NiagaResult};
use crate::money::Rupiah;
use crate::record::Record;
use crate::types::{RecordId, Table};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Prefix of generated product ids.
pub const PRODUCT_ID_PREFIX: &str = "PRD";

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product code, e.g. `PRD001`
    pub id: String,
    /// Display name
    pub name: String,
    /// Free text
    pub description: String,
    /// Barcode payload `BC{id}{MMDD}`
    pub barcode: String,
    /// QR payload `QR{id}|{name}|{YYYYMMDD}`
    pub qr_code: String,
    /// Buying price per unit
    pub purchase_price: Rupiah,
    /// Selling price per unit
    pub selling_price: Rupiah,
    /// Units stocked at creation
    pub initial_stock: i64,
    /// Units on hand
    pub current_stock: i64,
    /// Realised profit on sold units
    pub profit: Rupiah,
    /// Creation time
    pub created_at: NaiveDateTime,
    /// Last edit
    pub updated_at: NaiveDateTime,
}

impl Product {
    /// Units sold so far (never negative).
    pub fn sold_units(&self) -> i64 {
        (self.initial_stock - self.current_stock).max(0)
    }

    /// Recompute [`Product::profit`] from prices and stock counters.
    pub fn recompute_profit(&mut self) {
        self.profit = product_profit(
            self.purchase_price,
            self.selling_price,
            self.initial_stock,
            self.current_stock,
        );
    }
}

impl Record for Product {
    const TABLE: Table = Table::Products;

    fn record_id(&self) -> RecordId {
        RecordId::from(self.id.as_str())
    }
}

/// `(selling − purchase) × max(initial − current, 0)`
pub fn product_profit(purchase: Rupiah, selling: Rupiah, initial: i64, current: i64) -> Rupiah {
    (selling - purchase).times(initial.saturating_sub(current).max(0))
}

/// Next product id after the highest numeric suffix among `existing`.
///
/// Only the trailing run of digits counts: `A1B2` has suffix 2.
pub fn next_product_id<'a>(existing: impl IntoIterator<Item = &'a str>) -> NiagaResult<String> {
    let max = existing
        .into_iter()
        .filter_map(numeric_suffix)
        .max()
        .unwrap_or(0);
    let next = max.checked_add(1).ok_or_else(|| {
        NiagaError::invalid_input("product ids are exhausted, give an explicit id")
    })?;
    Ok(format!("{}{:03}", PRODUCT_ID_PREFIX, next))
}

fn numeric_suffix(id: &str) -> Option<u64> {
    let start = id
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    id[start..].parse().ok()
}

/// Barcode payload for a product created on `date`.
pub fn barcode_payload(id: &str, date: NaiveDate) -> String {
    format!("BC{}{}", id, date.format("%m%d"))
}

/// QR payload for a product created on `date`.
pub fn qr_payload(id: &str, name: &str, date: NaiveDate) -> String {
    format!("QR{}|{}|{}", id, name, date.format("%Y%m%d"))
}

/// Input for a new product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    /// Explicit id, generated when absent or blank
    #[serde(default)]
    pub id: Option<String>,
    /// Display name
    pub name: String,
    /// Free text
    #[serde(default)]
    pub description: String,
    /// Buying price
    pub purchase_price: Rupiah,
    /// Selling price
    pub selling_price: Rupiah,
    /// Opening stock
    #[serde(default)]
    pub initial_stock: i64,
}

/// Replacement values for an existing product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUpdate {
    /// Display name
    pub name: String,
    /// Free text
    #[serde(default)]
    pub description: String,
    /// Buying price
    pub purchase_price: Rupiah,
    /// Selling price
    pub selling_price: Rupiah,
    /// Opening stock
    pub initial_stock: i64,
    /// Units on hand
    pub current_stock: i64,
}

/// Cost category of a cost sheet line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CostKind {
    /// Raw material
    Material,
    /// Labour or outsourced service
    Service {
        /// e.g. "Jahit", "Desain"
        service_type: String,
    },
    /// Recurring upkeep
    Maintenance {
        /// e.g. "Servis mesin"
        maintenance_type: String,
    },
}

/// One line of a product's cost sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEntry {
    /// Sequence id
    pub id: u64,
    /// Owning product
    pub product_id: String,
    /// Category
    pub kind: CostKind,
    /// Item name
    pub name: String,
    /// Quantity, may be fractional (2.5 kg)
    pub quantity: f64,
    /// Unit label
    pub unit: String,
    /// Price per unit
    pub unit_cost: Rupiah,
    /// `round(quantity × unit_cost)`
    pub total_cost: Rupiah,
    /// Free text
    pub notes: String,
    /// Creation time
    pub created_at: NaiveDateTime,
}

impl Record for CostEntry {
    const TABLE: Table = Table::CostEntries;

    fn record_id(&self) -> RecordId {
        RecordId::Num(self.id)
    }
}

/// Input for a cost sheet line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCost {
    /// Category
    pub kind: CostKind,
    /// Item name
    pub name: String,
    /// Quantity (> 0)
    pub quantity: f64,
    /// Unit label
    #[serde(default)]
    pub unit: String,
    /// Price per unit (≥ 0)
    pub unit_cost: Rupiah,
    /// Free text
    #[serde(default)]
    pub notes: String,
}

/// Cost lines of one product with per-category totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSheet {
    /// Product the sheet belongs to
    pub product_id: String,
    /// Σ material lines
    pub material: Rupiah,
    /// Σ service lines
    pub service: Rupiah,
    /// Σ maintenance lines
    pub maintenance: Rupiah,
    /// Σ all lines
    pub total: Rupiah,
    /// Lines in creation order
    pub entries: Vec<CostEntry>,
}

impl CostSheet {
    /// Build a sheet from its lines.
    pub fn from_entries(product_id: impl Into<String>, entries: Vec<CostEntry>) -> Self {
        let mut material = Rupiah::ZERO;
        let mut service = Rupiah::ZERO;
        let mut maintenance = Rupiah::ZERO;
        for entry in &entries {
            match entry.kind {
                CostKind::Material => material += entry.total_cost,
                CostKind::Service { .. } => service += entry.total_cost,
                CostKind::Maintenance { .. } => maintenance += entry.total_cost,
            }
        }
        Self {
            product_id: product_id.into(),
            material,
            service,
            maintenance,
            total: material + service + maintenance,
            entries,
        }
    }
}

/// A row of the printable price list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceListRow {
    /// Product code
    pub id: String,
    /// Product name
    pub name: String,
    /// Buying price
    pub purchase_price: Rupiah,
    /// Selling price
    pub selling_price: Rupiah,
    /// Units on hand
    pub current_stock: i64,
    /// Cost sheet total
    pub cost_total: Rupiah,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: CostKind, total: i64) -> CostEntry {
        CostEntry {
            id: 1,
            product_id: "PRD001".into(),
            kind,
            name: "x".into(),
            quantity: 1.0,
            unit: "pcs".into(),
            unit_cost: Rupiah::new(total),
            total_cost: Rupiah::new(total),
            notes: String::new(),
            created_at: NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_profit_counts_only_sold_units() {
        let buy = Rupiah::new(8_000);
        let sell = Rupiah::new(10_000);
        assert_eq!(product_profit(buy, sell, 10, 4), Rupiah::new(12_000));
        assert_eq!(product_profit(buy, sell, 10, 10), Rupiah::ZERO);
        // restocked above the opening count
        assert_eq!(product_profit(buy, sell, 10, 15), Rupiah::ZERO);
        // selling at a loss
        assert_eq!(product_profit(sell, buy, 5, 0), Rupiah::new(-10_000));
    }

    #[test]
    fn test_next_product_id_uses_highest_suffix() {
        assert_eq!(next_product_id(Vec::<&str>::new()).unwrap(), "PRD001");
        assert_eq!(
            next_product_id(["PRD001", "PRD009", "PRD003"]).unwrap(),
            "PRD010"
        );
        assert_eq!(next_product_id(["CUSTOM", "PRD041"]).unwrap(), "PRD042");
        assert_eq!(next_product_id(["PRD999"]).unwrap(), "PRD1000");
    }

    #[test]
    fn test_next_product_id_reads_trailing_digits_only() {
        assert_eq!(next_product_id(["A1B2"]).unwrap(), "PRD003");
        assert_eq!(next_product_id(["2024KOPI", "PRD007"]).unwrap(), "PRD008");
        // too long for u64, ignored
        assert_eq!(
            next_product_id(["PRD99999999999999999999", "PRD004"]).unwrap(),
            "PRD005"
        );
        assert!(matches!(
            next_product_id(["PRD18446744073709551615"]),
            Err(NiagaError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_code_payloads() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 3).unwrap();
        assert_eq!(barcode_payload("PRD001", date), "BCPRD0010803");
        assert_eq!(qr_payload("PRD001", "Kopi", date), "QRPRD001|Kopi|20250803");
    }

    #[test]
    fn test_cost_sheet_totals_by_kind() {
        let sheet = CostSheet::from_entries(
            "PRD001",
            vec![
                entry(CostKind::Material, 7_500),
                entry(CostKind::Material, 2_500),
                entry(
                    CostKind::Service {
                        service_type: "Jahit".into(),
                    },
                    15_000,
                ),
                entry(
                    CostKind::Maintenance {
                        maintenance_type: "Mesin".into(),
                    },
                    1_000,
                ),
            ],
        );
        assert_eq!(sheet.material, Rupiah::new(10_000));
        assert_eq!(sheet.service, Rupiah::new(15_000));
        assert_eq!(sheet.maintenance, Rupiah::new(1_000));
        assert_eq!(sheet.total, Rupiah::new(26_000));
    }

    #[test]
    fn test_cost_kind_serde_shape() {
        let json = serde_json::to_value(CostKind::Service {
            service_type: "Desain".into(),
        })
        .unwrap();
        assert_eq!(json["type"], "service");
        assert_eq!(json["service_type"], "Desain");
    }
}
