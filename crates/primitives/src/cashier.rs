//! Cashier primitive
//!
//! Point-of-sale transactions. A sale prices its lines from the stock
//! items, decrements stock through the stock ledger and stores the sale,
//! all in one transaction: either every line is sold or nothing changes.

use crate::inventory::apply_stock_change;
use crate::validate::{count_in_range, non_negative_amount};
use chrono::NaiveDate;
use niaga_core::model::sale::sale_reference;
use niaga_core::model::{CartLine, InventoryItem, MovementKind, Product, Sale, SaleLine};
use niaga_core::{NiagaError, NiagaResult, Rupiah, Table};
use niaga_engine::Database;
use std::sync::Arc;
use tracing::info;

/// Cashier primitive
#[derive(Clone)]
pub struct Cashier {
    db: Arc<Database>,
}

impl Cashier {
    /// Create a new cashier facade
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Sell the cart
    ///
    /// Lines for the same item are merged. The payment must cover the
    /// total; the change is `payment − total`.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for an empty cart, a non-positive quantity or a
    ///   total too large to represent
    /// - `NotFound` for an unknown item
    /// - `InsufficientStock` when an item has fewer units than requested
    /// - `InsufficientPayment` when the payment is below the total
    pub fn process_sale(
        &self,
        cashier_id: Option<u64>,
        cart: &[CartLine],
        payment: Rupiah,
    ) -> NiagaResult<Sale> {
        let cart = merge_cart(cart)?;
        non_negative_amount("payment", payment)?;

        let sale = self.db.transaction(|txn| {
            let id = txn.next_id(Table::Sales)?;
            let reference = sale_reference(id);

            let mut lines = Vec::with_capacity(cart.len());
            for line in &cart {
                let mut item = txn.require::<InventoryItem>(line.item_id)?;
                if line.quantity > item.current_stock {
                    return Err(NiagaError::InsufficientStock {
                        item: item.code.clone(),
                        available: item.current_stock,
                        requested: line.quantity,
                    });
                }
                let name = txn
                    .get_record::<Product>(item.product_id.as_str())?
                    .map(|p| p.name)
                    .unwrap_or_else(|| item.code.clone());
                let after = item.current_stock - line.quantity;
                apply_stock_change(
                    txn,
                    &mut item,
                    MovementKind::Sale,
                    line.quantity,
                    after,
                    "Penjualan",
                    Some(reference.clone()),
                    "",
                    cashier_id,
                )?;
                lines.push(SaleLine {
                    item_id: item.id,
                    code: item.code.clone(),
                    name,
                    purchase_price: item.purchase_price,
                    selling_price: item.selling_price,
                    quantity: line.quantity,
                    subtotal: item.selling_price.checked_times(line.quantity)?,
                });
            }

            let total = Rupiah::checked_sum(lines.iter().map(|l| l.subtotal))?;
            let profit = Rupiah::checked_sum(
                lines
                    .iter()
                    .map(|l| {
                        l.selling_price
                            .checked_sub(l.purchase_price)?
                            .checked_times(l.quantity)
                    })
                    .collect::<NiagaResult<Vec<_>>>()?,
            )?;
            if payment < total {
                return Err(NiagaError::InsufficientPayment {
                    total,
                    paid: payment,
                });
            }
            let sale = Sale {
                id,
                timestamp: txn.now(),
                profit,
                lines,
                total,
                payment,
                change: payment - total,
                cashier_id,
            };
            txn.put_record(&sale)?;
            Ok(sale)
        })?;
        info!(
            sale_id = sale.id,
            total = %sale.total,
            lines = sale.lines.len(),
            "sale processed"
        );
        Ok(sale)
    }

    /// One sale
    pub fn get_sale(&self, sale_id: u64) -> NiagaResult<Sale> {
        self.db.read(|txn| txn.require::<Sale>(sale_id))
    }

    /// Sales between two dates (inclusive, either bound optional), newest
    /// first
    pub fn list_sales(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> NiagaResult<Vec<Sale>> {
        let mut sales = self.db.read(|txn| txn.scan_records::<Sale>())?;
        sales.retain(|s| {
            let day = s.timestamp.date();
            start.map_or(true, |d| day >= d) && end.map_or(true, |d| day <= d)
        });
        sales.reverse();
        Ok(sales)
    }

    /// Σ totals of sales made on `date`
    pub fn revenue_on(&self, date: NaiveDate) -> NiagaResult<Rupiah> {
        Ok(self
            .list_sales(Some(date), Some(date))?
            .iter()
            .map(|s| s.total)
            .sum())
    }
}

/// Validate the cart and merge lines of the same item, keeping first-seen
/// order
fn merge_cart(cart: &[CartLine]) -> NiagaResult<Vec<CartLine>> {
    if cart.is_empty() {
        return Err(NiagaError::invalid_input("cart is empty"));
    }
    let mut merged: Vec<CartLine> = Vec::with_capacity(cart.len());
    for line in cart {
        if line.quantity <= 0 {
            return Err(NiagaError::invalid_input(format!(
                "quantity for item {} must be greater than zero",
                line.item_id
            )));
        }
        match merged.iter_mut().find(|m| m.item_id == line.item_id) {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .checked_add(line.quantity)
                    .unwrap_or(i64::MAX);
            }
            None => merged.push(*line),
        }
    }
    for line in &merged {
        count_in_range(&format!("quantity for item {}", line.item_id), line.quantity)?;
    }
    Ok(merged)
}
