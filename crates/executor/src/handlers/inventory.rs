//! Inventory command handlers.
//!
//! Stock items, manual stock operations and the cashier item lookups.

use std::sync::Arc;

use niaga_core::model::{NewItem, StockAction, UserProfile};

use crate::bridge::Primitives;
use crate::convert::convert_result;
use crate::handlers::actor_id;
use crate::{Output, Result};

/// Handle ItemAdd command.
pub fn item_add(p: &Arc<Primitives>, actor: Option<&UserProfile>, item: NewItem) -> Result<Output> {
    Ok(Output::Item(convert_result(
        p.inventory.add_item(&item, actor_id(actor)),
    )?))
}

/// Handle ItemGet command.
pub fn item_get(p: &Arc<Primitives>, item_id: u64) -> Result<Output> {
    Ok(Output::Item(convert_result(p.inventory.get_item(item_id))?))
}

/// Handle ItemDelete command: returns the deleted item.
pub fn item_delete(p: &Arc<Primitives>, item_id: u64) -> Result<Output> {
    Ok(Output::Item(convert_result(p.inventory.delete_item(item_id))?))
}

/// Handle ItemList command.
pub fn item_list(p: &Arc<Primitives>) -> Result<Output> {
    Ok(Output::Items(convert_result(p.inventory.list_items())?))
}

/// Handle StockAdjust command.
pub fn stock_adjust(
    p: &Arc<Primitives>,
    actor: Option<&UserProfile>,
    item_id: u64,
    action: StockAction,
    quantity: i64,
    notes: String,
) -> Result<Output> {
    let change = convert_result(p.inventory.adjust_stock(
        item_id,
        action,
        quantity,
        &notes,
        actor_id(actor),
    ))?;
    Ok(Output::StockChange(change))
}

/// Handle StockMovements command.
pub fn stock_movements(p: &Arc<Primitives>, item_id: u64) -> Result<Output> {
    Ok(Output::Movements(convert_result(
        p.inventory.movements(item_id),
    )?))
}

/// Handle LowStock command.
pub fn low_stock(p: &Arc<Primitives>) -> Result<Output> {
    Ok(Output::Items(convert_result(p.inventory.low_stock())?))
}

/// Handle InventoryValue command.
pub fn inventory_value(p: &Arc<Primitives>) -> Result<Output> {
    Ok(Output::Amount(convert_result(p.inventory.inventory_value())?))
}

/// Handle PosItems command.
pub fn pos_items(p: &Arc<Primitives>) -> Result<Output> {
    Ok(Output::Items(convert_result(p.inventory.pos_items())?))
}

/// Handle PosSearch command.
pub fn pos_search(p: &Arc<Primitives>, query: String) -> Result<Output> {
    Ok(Output::Items(convert_result(p.inventory.search(&query))?))
}
