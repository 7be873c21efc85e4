//! Catalog command handlers.
//!
//! Products, cost sheets and pricing.

use std::sync::Arc;

use niaga_core::model::{NewCost, NewProduct, ProductUpdate};

use crate::bridge::Primitives;
use crate::convert::convert_result;
use crate::{Output, Result};

/// Handle ProductAdd command.
pub fn product_add(p: &Arc<Primitives>, product: NewProduct) -> Result<Output> {
    Ok(Output::Product(convert_result(p.catalog.add_product(&product))?))
}

/// Handle ProductEdit command.
pub fn product_edit(p: &Arc<Primitives>, id: String, update: ProductUpdate) -> Result<Output> {
    Ok(Output::Product(convert_result(
        p.catalog.edit_product(&id, &update),
    )?))
}

/// Handle ProductDelete command: returns the deleted product.
pub fn product_delete(p: &Arc<Primitives>, id: String) -> Result<Output> {
    Ok(Output::Product(convert_result(p.catalog.delete_product(&id))?))
}

/// Handle ProductGet command.
pub fn product_get(p: &Arc<Primitives>, id: String) -> Result<Output> {
    Ok(Output::Product(convert_result(p.catalog.get_product(&id))?))
}

/// Handle ProductList command.
pub fn product_list(p: &Arc<Primitives>) -> Result<Output> {
    Ok(Output::Products(convert_result(p.catalog.list_products())?))
}

/// Handle ProductNextId command.
pub fn product_next_id(p: &Arc<Primitives>) -> Result<Output> {
    Ok(Output::Id(convert_result(p.catalog.generate_product_id())?))
}

/// Handle CostAdd command.
pub fn cost_add(p: &Arc<Primitives>, product_id: String, cost: NewCost) -> Result<Output> {
    Ok(Output::Cost(convert_result(
        p.catalog.add_cost(&product_id, &cost),
    )?))
}

/// Handle CostDelete command: returns the deleted line.
pub fn cost_delete(p: &Arc<Primitives>, cost_id: u64) -> Result<Output> {
    Ok(Output::Cost(convert_result(p.catalog.delete_cost(cost_id))?))
}

/// Handle CostSheet command.
pub fn cost_sheet(p: &Arc<Primitives>, product_id: String) -> Result<Output> {
    Ok(Output::CostSheet(convert_result(
        p.catalog.cost_sheet(&product_id),
    )?))
}

/// Handle CostPerUnit command.
pub fn cost_per_unit(p: &Arc<Primitives>, product_id: String, units: u64) -> Result<Output> {
    Ok(Output::Amount(convert_result(
        p.catalog.cost_per_unit(&product_id, units),
    )?))
}

/// Handle SuggestedPrice command.
pub fn suggested_price(
    p: &Arc<Primitives>,
    product_id: String,
    units: u64,
    markup_percent: f64,
) -> Result<Output> {
    Ok(Output::Amount(convert_result(p.catalog.suggested_price(
        &product_id,
        units,
        markup_percent,
    ))?))
}

/// Handle PriceList command.
pub fn price_list(p: &Arc<Primitives>) -> Result<Output> {
    Ok(Output::PriceList(convert_result(p.catalog.price_list())?))
}
