//! Dashboard and period reports.
//!
//! Access via `niaga.reports()`. Requires an admin session.

use crate::{Command, Error, Output, Result, Session};
use chrono::NaiveDate;
use niaga_core::model::{DashboardStats, PeriodReport};

/// Handle for business reporting.
pub struct Reports<'a> {
    session: &'a Session,
}

impl<'a> Reports<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Counters for the home screen, as of today.
    pub fn dashboard(&self) -> Result<DashboardStats> {
        match self.session.execute(Command::Dashboard)? {
            Output::Dashboard(stats) => Ok(stats),
            _ => Err(Error::unexpected("Dashboard")),
        }
    }

    /// Revenue, profit, loss and best sellers for `start..=end`.
    pub fn period(&self, start: NaiveDate, end: NaiveDate) -> Result<PeriodReport> {
        match self.session.execute(Command::PeriodReport { start, end })? {
            Output::Report(report) => Ok(report),
            _ => Err(Error::unexpected("PeriodReport")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_util::admin;
    use super::*;
    use niaga_core::model::{CartLine, NewItem, NewProduct, SavingsRequest};
    use niaga_core::Rupiah;

    #[test]
    fn test_dashboard_counts() {
        let niaga = admin();
        let product = niaga
            .products()
            .add(NewProduct {
                id: None,
                name: "Gula 1kg".into(),
                description: String::new(),
                purchase_price: Rupiah::new(14_000),
                selling_price: Rupiah::new(16_000),
                initial_stock: 0,
            })
            .unwrap();
        let item = niaga
            .stock()
            .add_item(NewItem {
                product_id: product.id,
                code: "GULA".into(),
                purchase_price: Rupiah::new(14_000),
                selling_price: Rupiah::new(16_000),
                initial_stock: 3,
                minimum_stock: Some(5),
            })
            .unwrap();
        niaga
            .sales()
            .process(
                vec![CartLine {
                    item_id: item.id,
                    quantity: 1,
                }],
                Rupiah::new(16_000),
            )
            .unwrap();
        niaga
            .savings()
            .deposit(SavingsRequest {
                saver_name: "Wati".into(),
                date: None,
                amount: Rupiah::new(20_000),
                description: None,
                phone: None,
                address: None,
            })
            .unwrap();

        let stats = niaga.reports().dashboard().unwrap();
        assert_eq!(stats.products, 1);
        assert_eq!(stats.inventory_items, 1);
        assert_eq!(stats.low_stock_items, 1);
        assert_eq!(stats.savers, 1);
        assert_eq!(stats.sales, 1);
        assert_eq!(stats.total_deposits, Rupiah::new(20_000));
        assert_eq!(stats.today_revenue, Rupiah::new(16_000));
    }

    #[test]
    fn test_empty_period() {
        let niaga = admin();
        let day = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
        let report = niaga.reports().period(day, day).unwrap();
        assert_eq!(report.transactions, 0);
        assert_eq!(report.revenue, Rupiah::ZERO);
        assert!(report.best_sellers.is_empty());
    }

    #[test]
    fn test_cashier_cannot_see_reports() {
        let niaga = admin();
        niaga
            .users()
            .register("kasir", "kasir@example.com", "rahasia1", "rahasia1")
            .unwrap();
        niaga.login("kasir", "rahasia1").unwrap();
        assert!(matches!(
            niaga.reports().dashboard(),
            Err(Error::AccessDenied { .. })
        ));
    }
}
