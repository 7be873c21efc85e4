//! Dashboard and period reports

use crate::money::Rupiah;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::inventory::ItemView;

/// Counters shown on the main dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Products in the catalog
    pub products: usize,
    /// Stock items
    pub inventory_items: usize,
    /// Stock items at or below minimum
    pub low_stock_items: usize,
    /// Savers
    pub savers: usize,
    /// Invoices
    pub invoices: usize,
    /// Draft invoices
    pub draft_invoices: usize,
    /// Cashier sales
    pub sales: usize,
    /// Debtor customers
    pub customers: usize,
    /// Σ savings deposits
    pub total_deposits: Rupiah,
    /// Σ remaining on active and overdue debts
    pub total_active_debt: Rupiah,
    /// Overdue debts
    pub overdue_debts: usize,
    /// Sales revenue today
    pub today_revenue: Rupiah,
}

/// A product line in the best seller ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestSeller {
    /// Product name as sold
    pub name: String,
    /// Units sold
    pub quantity: i64,
    /// Revenue
    pub revenue: Rupiah,
}

/// Business report over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodReport {
    /// First day
    pub start: NaiveDate,
    /// Last day
    pub end: NaiveDate,
    /// Σ sale totals
    pub revenue: Rupiah,
    /// Net profit, Σ sale profit including the sales made at a loss
    pub profit: Rupiah,
    /// Σ |profit| of sales made at a loss
    pub loss: Rupiah,
    /// Number of sales
    pub transactions: usize,
    /// Top sellers by units
    pub best_sellers: Vec<BestSeller>,
    /// Items at or below minimum
    pub low_stock: Vec<ItemView>,
}
