//! Inventory primitive
//!
//! Stock items and the append-only stock ledger.
//!
//! # Invariants
//!
//! - `current_stock` never goes below zero
//! - every change of `current_stock` writes exactly one [`StockMovement`]
//!   whose `stock_before`/`stock_after` match the item before and after
//!
//! Both hold because all stock changes, including cashier sales, go
//! through [`apply_stock_change`] inside the caller's transaction.

use crate::validate::{
    contains_ci, count_in_range, non_negative_amount, non_negative_count, required,
};
use niaga_core::model::{
    InventoryItem, ItemView, MovementKind, NewItem, Product, StockAction, StockMovement,
    StockStatus,
};
use niaga_core::{EntityRef, NiagaError, NiagaResult, Rupiah, Table};
use niaga_engine::{Database, TransactionContext};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Reason written on the opening movement of a new item
pub const OPENING_STOCK_REASON: &str = "Stok awal";

/// An item after a stock operation, with the movement it produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockChange {
    /// Item after the change
    pub item: InventoryItem,
    /// Ledger entry
    pub movement: StockMovement,
}

/// Inventory primitive
#[derive(Clone)]
pub struct Inventory {
    db: Arc<Database>,
}

impl Inventory {
    /// Create a new inventory facade
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Create a stock item for an existing product
    ///
    /// A positive opening stock is recorded as an `In` movement.
    pub fn add_item(&self, new: &NewItem, by: Option<u64>) -> NiagaResult<InventoryItem> {
        let code = required("code", &new.code)?;
        non_negative_amount("purchase price", new.purchase_price)?;
        non_negative_amount("selling price", new.selling_price)?;
        non_negative_count("initial stock", new.initial_stock)?;
        let minimum_stock = new
            .minimum_stock
            .unwrap_or(self.db.config().engine.default_minimum_stock);
        non_negative_count("minimum stock", minimum_stock)?;

        let item = self.db.transaction(|txn| {
            txn.require::<Product>(new.product_id.as_str())?;
            let taken = txn
                .find_record::<InventoryItem, _>(|i| i.code.eq_ignore_ascii_case(&code))?
                .is_some();
            if taken {
                return Err(NiagaError::already_exists(EntityRef::new(
                    Table::InventoryItems,
                    &code,
                )));
            }

            let mut item = InventoryItem {
                id: txn.next_id(Table::InventoryItems)?,
                product_id: new.product_id.clone(),
                code: code.clone(),
                purchase_price: new.purchase_price,
                selling_price: new.selling_price,
                initial_stock: new.initial_stock,
                current_stock: 0,
                minimum_stock,
                created_at: txn.now(),
            };
            if new.initial_stock > 0 {
                apply_stock_change(
                    txn,
                    &mut item,
                    MovementKind::In,
                    new.initial_stock,
                    new.initial_stock,
                    OPENING_STOCK_REASON,
                    None,
                    "",
                    by,
                )?;
            } else {
                txn.put_record(&item)?;
            }
            Ok(item)
        })?;
        info!(item_id = item.id, code = %item.code, "inventory item added");
        Ok(item)
    }

    /// Apply a manual stock operation
    ///
    /// - `Add`: receive `quantity > 0` units
    /// - `Subtract`: remove `0 < quantity <= current` units
    /// - `SetMinimum`: change the reorder threshold, stock untouched
    /// - `Set`: stock take, set the count to `quantity >= 0`
    pub fn adjust_stock(
        &self,
        item_id: u64,
        action: StockAction,
        quantity: i64,
        notes: &str,
        by: Option<u64>,
    ) -> NiagaResult<StockChange> {
        match action {
            StockAction::Add | StockAction::Subtract if quantity <= 0 => {
                return Err(NiagaError::invalid_input("quantity must be greater than zero"));
            }
            StockAction::SetMinimum | StockAction::Set if quantity < 0 => {
                return Err(NiagaError::invalid_input("quantity cannot be negative"));
            }
            _ => {}
        }
        count_in_range("quantity", quantity)?;
        let notes = notes.trim();

        let change = self.db.transaction(|txn| {
            let mut item = txn.require::<InventoryItem>(item_id)?;
            let current = item.current_stock;
            let movement = match action {
                StockAction::Add => {
                    let after = current.checked_add(quantity).unwrap_or(i64::MAX);
                    count_in_range("stock", after)?;
                    apply_stock_change(
                        txn,
                        &mut item,
                        MovementKind::In,
                        quantity,
                        after,
                        "Stok masuk",
                        None,
                        notes,
                        by,
                    )?
                }
                StockAction::Subtract => {
                    if quantity > current {
                        return Err(NiagaError::InsufficientStock {
                            item: item.code.clone(),
                            available: current,
                            requested: quantity,
                        });
                    }
                    apply_stock_change(
                        txn,
                        &mut item,
                        MovementKind::Out,
                        quantity,
                        current - quantity,
                        "Stok keluar",
                        None,
                        notes,
                        by,
                    )?
                }
                StockAction::Set => apply_stock_change(
                    txn,
                    &mut item,
                    MovementKind::Adjustment,
                    (quantity - current).abs(),
                    quantity,
                    "Penyesuaian stok",
                    None,
                    notes,
                    by,
                )?,
                StockAction::SetMinimum => {
                    item.minimum_stock = quantity;
                    apply_stock_change(
                        txn,
                        &mut item,
                        MovementKind::MinimumChanged,
                        quantity,
                        current,
                        "Ubah stok minimum",
                        None,
                        notes,
                        by,
                    )?
                }
            };
            Ok(StockChange { item, movement })
        })?;
        info!(
            item_id,
            action = ?action,
            stock = change.item.current_stock,
            "stock adjusted"
        );
        Ok(change)
    }

    /// One item
    pub fn get_item(&self, item_id: u64) -> NiagaResult<InventoryItem> {
        self.db.read(|txn| txn.require::<InventoryItem>(item_id))
    }

    /// Delete an item and its movements
    pub fn delete_item(&self, item_id: u64) -> NiagaResult<InventoryItem> {
        let item = self.db.transaction(|txn| {
            let item = txn.require::<InventoryItem>(item_id)?;
            remove_item(txn, item_id)?;
            Ok(item)
        })?;
        info!(item_id, code = %item.code, "inventory item deleted");
        Ok(item)
    }

    /// All items with product name and status, in id order
    pub fn list_items(&self) -> NiagaResult<Vec<ItemView>> {
        self.db.read(|txn| item_views(txn, |_| true))
    }

    /// Items at or below their minimum
    pub fn low_stock(&self) -> NiagaResult<Vec<ItemView>> {
        self.db.read(|txn| item_views(txn, InventoryItem::is_low))
    }

    /// Σ current stock × purchase price
    pub fn inventory_value(&self) -> NiagaResult<Rupiah> {
        let items = self.db.read(|txn| txn.scan_records::<InventoryItem>())?;
        Ok(items.iter().map(InventoryItem::stock_value).sum())
    }

    /// Movements of an item, oldest first
    pub fn movements(&self, item_id: u64) -> NiagaResult<Vec<StockMovement>> {
        self.db.read(|txn| {
            txn.require::<InventoryItem>(item_id)?;
            let mut movements: Vec<StockMovement> = txn
                .scan_records::<StockMovement>()?
                .into_iter()
                .filter(|m| m.item_id == item_id)
                .collect();
            movements.sort_by_key(|m| (m.created_at, m.id));
            Ok(movements)
        })
    }

    /// Items that can be sold right now
    pub fn pos_items(&self) -> NiagaResult<Vec<ItemView>> {
        self.db.read(|txn| item_views(txn, |i| i.current_stock > 0))
    }

    /// Sellable items whose code or product name contains `query`
    pub fn search(&self, query: &str) -> NiagaResult<Vec<ItemView>> {
        let query = query.trim();
        let views = self.pos_items()?;
        Ok(views
            .into_iter()
            .filter(|v| contains_ci(&v.item.code, query) || contains_ci(&v.product_name, query))
            .collect())
    }
}

/// Set `item.current_stock` to `stock_after`, writing the item and one
/// movement
///
/// The caller has validated the quantity; this only refuses to go below
/// zero.
#[allow(clippy::too_many_arguments)]
pub(crate) fn apply_stock_change(
    txn: &mut TransactionContext,
    item: &mut InventoryItem,
    kind: MovementKind,
    quantity: i64,
    stock_after: i64,
    reason: &str,
    reference: Option<String>,
    notes: &str,
    by: Option<u64>,
) -> NiagaResult<StockMovement> {
    if stock_after < 0 {
        return Err(NiagaError::InsufficientStock {
            item: item.code.clone(),
            available: item.current_stock,
            requested: item.current_stock - stock_after,
        });
    }
    let movement = StockMovement {
        id: txn.next_id(Table::StockMovements)?,
        item_id: item.id,
        kind,
        quantity,
        stock_before: item.current_stock,
        stock_after,
        reason: reason.to_string(),
        reference,
        notes: notes.to_string(),
        created_by: by,
        created_at: txn.now(),
    };
    item.current_stock = stock_after;
    txn.put_record(&*item)?;
    txn.put_record(&movement)?;
    debug!(
        item_id = item.id,
        kind = ?kind,
        before = movement.stock_before,
        after = movement.stock_after,
        "stock movement"
    );
    Ok(movement)
}

/// Delete an item and every movement that references it
pub(crate) fn remove_item(txn: &mut TransactionContext, item_id: u64) -> NiagaResult<usize> {
    let movement_ids: Vec<u64> = txn
        .scan_records::<StockMovement>()?
        .into_iter()
        .filter(|m| m.item_id == item_id)
        .map(|m| m.id)
        .collect();
    for id in &movement_ids {
        txn.delete_record::<StockMovement>(*id);
    }
    txn.delete_record::<InventoryItem>(item_id);
    Ok(movement_ids.len())
}

/// Items matching `pred` joined with their product names
pub(crate) fn item_views<F>(txn: &mut TransactionContext, pred: F) -> NiagaResult<Vec<ItemView>>
where
    F: Fn(&InventoryItem) -> bool,
{
    let names: HashMap<String, String> = txn
        .scan_records::<Product>()?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();
    Ok(txn
        .scan_records::<InventoryItem>()?
        .into_iter()
        .filter(|i| pred(i))
        .map(|item| ItemView {
            product_name: names.get(&item.product_id).cloned().unwrap_or_default(),
            status: StockStatus::classify(item.current_stock, item.minimum_stock),
            item,
        })
        .collect())
}
