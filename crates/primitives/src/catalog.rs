//! Catalog primitive
//!
//! Products, their cost sheets and derived prices.
//!
//! Product ids are caller-chosen strings (`PRD001`); when none is given
//! the next id continues from the highest numeric suffix in use.

use crate::inventory::remove_item;
use crate::validate::{
    non_negative_amount, non_negative_count, positive_quantity, required,
};
use niaga_core::model::product::{barcode_payload, next_product_id, qr_payload};
use niaga_core::model::{
    CostEntry, CostSheet, InventoryItem, NewCost, NewProduct, PriceListRow, Product,
    ProductUpdate,
};
use niaga_core::{EntityRef, NiagaError, NiagaResult, Rupiah, Table};
use niaga_engine::{Database, TransactionContext};
use std::sync::Arc;
use tracing::info;

/// Suggested prices are rounded up to a multiple of this amount
pub const PRICE_ROUNDING: i64 = 500;

/// Catalog primitive
#[derive(Clone)]
pub struct Catalog {
    db: Arc<Database>,
}

impl Catalog {
    /// Create a new catalog facade
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// The id a new product would get
    pub fn generate_product_id(&self) -> NiagaResult<String> {
        self.db.read(generate_id)
    }

    /// Create a product
    ///
    /// Barcode and QR payloads are derived from the id and the
    /// transaction date. Current stock starts at the initial stock.
    pub fn add_product(&self, new: &NewProduct) -> NiagaResult<Product> {
        let name = required("name", &new.name)?;
        non_negative_amount("purchase price", new.purchase_price)?;
        non_negative_amount("selling price", new.selling_price)?;
        non_negative_count("initial stock", new.initial_stock)?;
        let explicit_id = new
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        let product = self.db.transaction(|txn| {
            let id = match &explicit_id {
                Some(id) => {
                    if txn.get_record::<Product>(id.as_str())?.is_some() {
                        return Err(NiagaError::already_exists(EntityRef::new(
                            Table::Products,
                            id,
                        )));
                    }
                    id.clone()
                }
                None => generate_id(txn)?,
            };
            let now = txn.now();
            let mut product = Product {
                barcode: barcode_payload(&id, now.date()),
                qr_code: qr_payload(&id, &name, now.date()),
                id,
                name: name.clone(),
                description: new.description.trim().to_string(),
                purchase_price: new.purchase_price,
                selling_price: new.selling_price,
                initial_stock: new.initial_stock,
                current_stock: new.initial_stock,
                profit: Rupiah::ZERO,
                created_at: now,
                updated_at: now,
            };
            product.recompute_profit();
            txn.put_record(&product)?;
            Ok(product)
        })?;
        info!(product_id = %product.id, "product added");
        Ok(product)
    }

    /// Replace a product's editable fields and recompute its profit
    pub fn edit_product(&self, id: &str, update: &ProductUpdate) -> NiagaResult<Product> {
        let name = required("name", &update.name)?;
        non_negative_amount("purchase price", update.purchase_price)?;
        non_negative_amount("selling price", update.selling_price)?;
        non_negative_count("initial stock", update.initial_stock)?;
        non_negative_count("current stock", update.current_stock)?;

        let product = self.db.transaction(|txn| {
            let mut product = txn.require::<Product>(id)?;
            product.name = name.clone();
            product.description = update.description.trim().to_string();
            product.purchase_price = update.purchase_price;
            product.selling_price = update.selling_price;
            product.initial_stock = update.initial_stock;
            product.current_stock = update.current_stock;
            product.recompute_profit();
            product.updated_at = txn.now();
            txn.put_record(&product)?;
            Ok(product)
        })?;
        info!(product_id = %product.id, "product updated");
        Ok(product)
    }

    /// Delete a product with its cost entries and inventory items
    pub fn delete_product(&self, id: &str) -> NiagaResult<Product> {
        let (product, costs, items) = self.db.transaction(|txn| {
            let product = txn.require::<Product>(id)?;
            let cost_ids: Vec<u64> = product_costs(txn, id)?.iter().map(|c| c.id).collect();
            for cost_id in &cost_ids {
                txn.delete_record::<CostEntry>(*cost_id);
            }
            let item_ids: Vec<u64> = txn
                .scan_records::<InventoryItem>()?
                .into_iter()
                .filter(|i| i.product_id == id)
                .map(|i| i.id)
                .collect();
            for item_id in &item_ids {
                remove_item(txn, *item_id)?;
            }
            txn.delete_record::<Product>(id);
            Ok((product, cost_ids.len(), item_ids.len()))
        })?;
        info!(product_id = id, costs, items, "product deleted");
        Ok(product)
    }

    /// One product
    pub fn get_product(&self, id: &str) -> NiagaResult<Product> {
        self.db.read(|txn| txn.require::<Product>(id))
    }

    /// All products, by id
    pub fn list_products(&self) -> NiagaResult<Vec<Product>> {
        self.db.read(|txn| txn.scan_records::<Product>())
    }

    /// Add a cost line to a product's sheet
    ///
    /// `total_cost = quantity × unit_cost`, rounded to whole rupiah.
    pub fn add_cost(&self, product_id: &str, new: &NewCost) -> NiagaResult<CostEntry> {
        let name = required("cost name", &new.name)?;
        positive_quantity("quantity", new.quantity)?;
        non_negative_amount("unit cost", new.unit_cost)?;
        let total_cost = new.unit_cost.times_quantity(new.quantity);
        non_negative_amount("total cost", total_cost)?;

        let entry = self.db.transaction(|txn| {
            txn.require::<Product>(product_id)?;
            let entry = CostEntry {
                id: txn.next_id(Table::CostEntries)?,
                product_id: product_id.to_string(),
                kind: new.kind.clone(),
                name: name.clone(),
                quantity: new.quantity,
                unit: new.unit.trim().to_string(),
                unit_cost: new.unit_cost,
                total_cost,
                notes: new.notes.trim().to_string(),
                created_at: txn.now(),
            };
            txn.put_record(&entry)?;
            Ok(entry)
        })?;
        info!(product_id, cost_id = entry.id, total = %entry.total_cost, "cost added");
        Ok(entry)
    }

    /// Remove a cost line
    pub fn delete_cost(&self, cost_id: u64) -> NiagaResult<CostEntry> {
        self.db.transaction(|txn| {
            let entry = txn.require::<CostEntry>(cost_id)?;
            txn.delete_record::<CostEntry>(cost_id);
            Ok(entry)
        })
    }

    /// Cost lines of a product grouped into category totals
    pub fn cost_sheet(&self, product_id: &str) -> NiagaResult<CostSheet> {
        self.db.read(|txn| {
            txn.require::<Product>(product_id)?;
            Ok(CostSheet::from_entries(product_id, product_costs(txn, product_id)?))
        })
    }

    /// Sheet total divided over `units`, rounded
    pub fn cost_per_unit(&self, product_id: &str, units: u64) -> NiagaResult<Rupiah> {
        let sheet = self.cost_sheet(product_id)?;
        sheet
            .total
            .div_round(units)
            .ok_or_else(|| NiagaError::invalid_input("units must be greater than zero"))
    }

    /// Cost per unit plus `markup_percent`, rounded up to the next Rp 500
    pub fn suggested_price(
        &self,
        product_id: &str,
        units: u64,
        markup_percent: f64,
    ) -> NiagaResult<Rupiah> {
        if !markup_percent.is_finite() || markup_percent < 0.0 {
            return Err(NiagaError::invalid_input("markup cannot be negative"));
        }
        let unit_cost = self.cost_per_unit(product_id, units)?;
        Ok((unit_cost + unit_cost.percent(markup_percent)).round_up_to(PRICE_ROUNDING))
    }

    /// Products sorted by name with their cost sheet totals
    pub fn price_list(&self) -> NiagaResult<Vec<PriceListRow>> {
        self.db.read(|txn| {
            let costs = txn.scan_records::<CostEntry>()?;
            let mut rows: Vec<PriceListRow> = txn
                .scan_records::<Product>()?
                .into_iter()
                .map(|p| PriceListRow {
                    cost_total: costs
                        .iter()
                        .filter(|c| c.product_id == p.id)
                        .map(|c| c.total_cost)
                        .sum(),
                    id: p.id,
                    name: p.name,
                    purchase_price: p.purchase_price,
                    selling_price: p.selling_price,
                    current_stock: p.current_stock,
                })
                .collect();
            rows.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
            Ok(rows)
        })
    }
}

fn generate_id(txn: &mut TransactionContext) -> NiagaResult<String> {
    let products = txn.scan_records::<Product>()?;
    next_product_id(products.iter().map(|p| p.id.as_str()))
}

fn product_costs(txn: &mut TransactionContext, product_id: &str) -> NiagaResult<Vec<CostEntry>> {
    Ok(txn
        .scan_records::<CostEntry>()?
        .into_iter()
        .filter(|c| c.product_id == product_id)
        .collect())
}
