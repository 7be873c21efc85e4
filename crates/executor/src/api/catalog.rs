//! Products, cost sheets and pricing.
//!
//! Access via `niaga.products()`. Requires a manager session.

use crate::{Command, Error, Output, Result, Session};
use niaga_core::model::{
    CostEntry, CostSheet, NewCost, NewProduct, PriceListRow, Product, ProductUpdate,
};
use niaga_core::Rupiah;

/// Handle for the product catalog.
pub struct Products<'a> {
    session: &'a Session,
}

impl<'a> Products<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// The id the next product would get when none is given.
    pub fn next_id(&self) -> Result<String> {
        match self.session.execute(Command::ProductNextId)? {
            Output::Id(id) => Ok(id),
            _ => Err(Error::unexpected("ProductNextId")),
        }
    }

    /// Add a product.
    pub fn add(&self, product: NewProduct) -> Result<Product> {
        match self.session.execute(Command::ProductAdd { product })? {
            Output::Product(product) => Ok(product),
            _ => Err(Error::unexpected("ProductAdd")),
        }
    }

    /// Replace a product's editable fields.
    pub fn edit(&self, id: &str, update: ProductUpdate) -> Result<Product> {
        match self.session.execute(Command::ProductEdit {
            id: id.to_string(),
            update,
        })? {
            Output::Product(product) => Ok(product),
            _ => Err(Error::unexpected("ProductEdit")),
        }
    }

    /// Delete a product with its cost lines and stock items.
    pub fn delete(&self, id: &str) -> Result<Product> {
        match self.session.execute(Command::ProductDelete { id: id.to_string() })? {
            Output::Product(product) => Ok(product),
            _ => Err(Error::unexpected("ProductDelete")),
        }
    }

    /// One product.
    pub fn get(&self, id: &str) -> Result<Product> {
        match self.session.execute(Command::ProductGet { id: id.to_string() })? {
            Output::Product(product) => Ok(product),
            _ => Err(Error::unexpected("ProductGet")),
        }
    }

    /// All products by id.
    pub fn list(&self) -> Result<Vec<Product>> {
        match self.session.execute(Command::ProductList)? {
            Output::Products(products) => Ok(products),
            _ => Err(Error::unexpected("ProductList")),
        }
    }

    /// Add a line to a product's cost sheet.
    pub fn add_cost(&self, product_id: &str, cost: NewCost) -> Result<CostEntry> {
        match self.session.execute(Command::CostAdd {
            product_id: product_id.to_string(),
            cost,
        })? {
            Output::Cost(entry) => Ok(entry),
            _ => Err(Error::unexpected("CostAdd")),
        }
    }

    /// Remove a cost line.
    pub fn delete_cost(&self, cost_id: u64) -> Result<CostEntry> {
        match self.session.execute(Command::CostDelete { cost_id })? {
            Output::Cost(entry) => Ok(entry),
            _ => Err(Error::unexpected("CostDelete")),
        }
    }

    /// Cost lines grouped into category totals.
    pub fn cost_sheet(&self, product_id: &str) -> Result<CostSheet> {
        match self.session.execute(Command::CostSheet {
            product_id: product_id.to_string(),
        })? {
            Output::CostSheet(sheet) => Ok(sheet),
            _ => Err(Error::unexpected("CostSheet")),
        }
    }

    /// Sheet total spread over `units`.
    pub fn cost_per_unit(&self, product_id: &str, units: u64) -> Result<Rupiah> {
        match self.session.execute(Command::CostPerUnit {
            product_id: product_id.to_string(),
            units,
        })? {
            Output::Amount(amount) => Ok(amount),
            _ => Err(Error::unexpected("CostPerUnit")),
        }
    }

    /// Cost per unit plus markup, rounded up to Rp 500.
    pub fn suggested_price(&self, product_id: &str, units: u64, markup_percent: f64) -> Result<Rupiah> {
        match self.session.execute(Command::SuggestedPrice {
            product_id: product_id.to_string(),
            units,
            markup_percent,
        })? {
            Output::Amount(amount) => Ok(amount),
            _ => Err(Error::unexpected("SuggestedPrice")),
        }
    }

    /// Products by name with cost totals.
    pub fn price_list(&self) -> Result<Vec<PriceListRow>> {
        match self.session.execute(Command::PriceList)? {
            Output::PriceList(rows) => Ok(rows),
            _ => Err(Error::unexpected("PriceList")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_util::admin;
    use super::*;
    use niaga_core::model::CostKind;

    fn kaos() -> NewProduct {
        NewProduct {
            id: None,
            name: "Kaos Sablon".into(),
            description: String::new(),
            purchase_price: Rupiah::new(40_000),
            selling_price: Rupiah::new(65_000),
            initial_stock: 10,
        }
    }

    fn cost(kind: CostKind, name: &str, quantity: f64, unit_cost: i64) -> NewCost {
        NewCost {
            kind,
            name: name.into(),
            quantity,
            unit: "pcs".into(),
            unit_cost: Rupiah::new(unit_cost),
            notes: String::new(),
        }
    }

    #[test]
    fn test_generated_ids_increment() {
        let niaga = admin();
        assert_eq!(niaga.products().next_id().unwrap(), "PRD001");
        let first = niaga.products().add(kaos()).unwrap();
        assert_eq!(first.id, "PRD001");
        assert_eq!(first.profit, Rupiah::ZERO);
        assert_eq!(niaga.products().next_id().unwrap(), "PRD002");
    }

    #[test]
    fn test_cost_sheet_and_pricing() {
        let niaga = admin();
        let id = niaga.products().add(kaos()).unwrap().id;

        niaga
            .products()
            .add_cost(&id, cost(CostKind::Material, "Kaos polos", 10.0, 30_000))
            .unwrap();
        niaga
            .products()
            .add_cost(
                &id,
                cost(
                    CostKind::Service {
                        service_type: "Sablon".into(),
                    },
                    "Sablon depan",
                    10.0,
                    12_000,
                ),
            )
            .unwrap();

        let sheet = niaga.products().cost_sheet(&id).unwrap();
        assert_eq!(sheet.material, Rupiah::new(300_000));
        assert_eq!(sheet.service, Rupiah::new(120_000));
        assert_eq!(sheet.total, Rupiah::new(420_000));

        assert_eq!(
            niaga.products().cost_per_unit(&id, 10).unwrap(),
            Rupiah::new(42_000)
        );
        // 42.000 + 30% = 54.600, rounded up to 55.000
        assert_eq!(
            niaga.products().suggested_price(&id, 10, 30.0).unwrap(),
            Rupiah::new(55_000)
        );
        assert_eq!(
            niaga.products().cost_per_unit(&id, 0).unwrap_err().code(),
            "invalid_input"
        );

        let rows = niaga.products().price_list().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cost_total, Rupiah::new(420_000));
    }

    #[test]
    fn test_delete_product() {
        let niaga = admin();
        let id = niaga.products().add(kaos()).unwrap().id;
        niaga.products().delete(&id).unwrap();
        assert_eq!(niaga.products().get(&id).unwrap_err().code(), "not_found");
        assert!(niaga.products().list().unwrap().is_empty());
    }
}
