//! Stock items and the stock ledger.
//!
//! Access via `niaga.stock()`. Item management needs a manager session;
//! point-of-sale lookups only need a cashier.

use crate::{Command, Error, Output, Result, Session};
use niaga_core::model::{InventoryItem, ItemView, NewItem, StockAction, StockMovement};
use niaga_core::Rupiah;
use niaga_primitives::StockChange;

/// Handle for inventory operations.
pub struct Stock<'a> {
    session: &'a Session,
}

impl<'a> Stock<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Create a stock item for a product.
    pub fn add_item(&self, item: NewItem) -> Result<InventoryItem> {
        match self.session.execute(Command::ItemAdd { item })? {
            Output::Item(item) => Ok(item),
            _ => Err(Error::unexpected("ItemAdd")),
        }
    }

    /// One item.
    pub fn get(&self, item_id: u64) -> Result<InventoryItem> {
        match self.session.execute(Command::ItemGet { item_id })? {
            Output::Item(item) => Ok(item),
            _ => Err(Error::unexpected("ItemGet")),
        }
    }

    /// Delete an item and its movements.
    pub fn delete(&self, item_id: u64) -> Result<InventoryItem> {
        match self.session.execute(Command::ItemDelete { item_id })? {
            Output::Item(item) => Ok(item),
            _ => Err(Error::unexpected("ItemDelete")),
        }
    }

    /// All items with product names and status.
    pub fn list(&self) -> Result<Vec<ItemView>> {
        match self.session.execute(Command::ItemList)? {
            Output::Items(items) => Ok(items),
            _ => Err(Error::unexpected("ItemList")),
        }
    }

    /// Apply a manual stock operation.
    pub fn adjust(
        &self,
        item_id: u64,
        action: StockAction,
        quantity: i64,
        notes: &str,
    ) -> Result<StockChange> {
        match self.session.execute(Command::StockAdjust {
            item_id,
            action,
            quantity,
            notes: notes.to_string(),
        })? {
            Output::StockChange(change) => Ok(change),
            _ => Err(Error::unexpected("StockAdjust")),
        }
    }

    /// Ledger entries of one item, oldest first.
    pub fn movements(&self, item_id: u64) -> Result<Vec<StockMovement>> {
        match self.session.execute(Command::StockMovements { item_id })? {
            Output::Movements(movements) => Ok(movements),
            _ => Err(Error::unexpected("StockMovements")),
        }
    }

    /// Items at or below their reorder threshold.
    pub fn low_stock(&self) -> Result<Vec<ItemView>> {
        match self.session.execute(Command::LowStock)? {
            Output::Items(items) => Ok(items),
            _ => Err(Error::unexpected("LowStock")),
        }
    }

    /// Σ current stock × purchase price.
    pub fn value(&self) -> Result<Rupiah> {
        match self.session.execute(Command::InventoryValue)? {
            Output::Amount(amount) => Ok(amount),
            _ => Err(Error::unexpected("InventoryValue")),
        }
    }

    /// Items that can be sold right now.
    pub fn pos_items(&self) -> Result<Vec<ItemView>> {
        match self.session.execute(Command::PosItems)? {
            Output::Items(items) => Ok(items),
            _ => Err(Error::unexpected("PosItems")),
        }
    }

    /// Sellable items matching a code or product name.
    pub fn search(&self, query: &str) -> Result<Vec<ItemView>> {
        match self.session.execute(Command::PosSearch {
            query: query.to_string(),
        })? {
            Output::Items(items) => Ok(items),
            _ => Err(Error::unexpected("PosSearch")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_util::admin;
    use super::*;
    use niaga_core::model::NewProduct;

    fn setup() -> (super::super::Niaga, u64) {
        let niaga = admin();
        let product = niaga
            .products()
            .add(NewProduct {
                id: None,
                name: "Kopi Bubuk".into(),
                description: String::new(),
                purchase_price: Rupiah::new(8_000),
                selling_price: Rupiah::new(12_000),
                initial_stock: 0,
            })
            .unwrap();
        let item = niaga
            .stock()
            .add_item(NewItem {
                product_id: product.id,
                code: "KOPI-250".into(),
                purchase_price: Rupiah::new(8_000),
                selling_price: Rupiah::new(12_000),
                initial_stock: 20,
                minimum_stock: Some(5),
            })
            .unwrap();
        (niaga, item.id)
    }

    #[test]
    fn test_adjust_and_movements() {
        let (niaga, id) = setup();

        let change = niaga.stock().adjust(id, StockAction::Subtract, 16, "rusak").unwrap();
        assert_eq!(change.item.current_stock, 4);

        let low = niaga.stock().low_stock().unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].product_name, "Kopi Bubuk");

        // opening stock plus the subtraction
        assert_eq!(niaga.stock().movements(id).unwrap().len(), 2);
        assert_eq!(niaga.stock().value().unwrap(), Rupiah::new(32_000));
    }

    #[test]
    fn test_subtract_more_than_on_hand() {
        let (niaga, id) = setup();
        let err = niaga
            .stock()
            .adjust(id, StockAction::Subtract, 21, "")
            .unwrap_err();
        assert_eq!(
            err,
            Error::InsufficientStock {
                item: "KOPI-250".into(),
                available: 20,
                requested: 21,
            }
        );
        assert_eq!(niaga.stock().get(id).unwrap().current_stock, 20);
    }

    #[test]
    fn test_search_finds_by_name() {
        let (niaga, _) = setup();
        assert_eq!(niaga.stock().search("kopi").unwrap().len(), 1);
        assert!(niaga.stock().search("teh").unwrap().is_empty());
    }
}
