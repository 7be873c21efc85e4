//! Reports primitive
//!
//! Read-only aggregates over every table: the dashboard counters and the
//! period report printed as "Laporan Bisnis".
//!
//! `profit` is the net profit of the period, the signed sum over every
//! sale. `loss` sums `|profit|` of the sales that lost money and is
//! already included in `profit`.

use crate::inventory::item_views;
use chrono::NaiveDate;
use niaga_core::model::{
    BestSeller, Customer, DashboardStats, Debt, DebtStatus, EntryKind, InventoryItem, Invoice,
    InvoiceStatus, PeriodReport, Product, Sale, Saver, SavingsEntry,
};
use niaga_core::{NiagaError, NiagaResult, Rupiah};
use niaga_engine::Database;
use std::collections::HashMap;
use std::sync::Arc;

/// Best sellers listed in a period report
pub const BEST_SELLERS: usize = 10;

/// Reports primitive
#[derive(Clone)]
pub struct Reports {
    db: Arc<Database>,
}

impl Reports {
    /// Create a new reports facade
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Counters for the home screen
    pub fn dashboard(&self, today: NaiveDate) -> NiagaResult<DashboardStats> {
        self.db.read(|txn| {
            let items = txn.scan_records::<InventoryItem>()?;
            let invoices = txn.scan_records::<Invoice>()?;
            let sales = txn.scan_records::<Sale>()?;
            let debts = txn.scan_records::<Debt>()?;
            let entries = txn.scan_records::<SavingsEntry>()?;

            Ok(DashboardStats {
                products: txn.scan_records::<Product>()?.len(),
                inventory_items: items.len(),
                low_stock_items: items.iter().filter(|i| i.is_low()).count(),
                savers: txn.scan_records::<Saver>()?.len(),
                invoices: invoices.len(),
                draft_invoices: invoices
                    .iter()
                    .filter(|i| i.status == InvoiceStatus::Draft)
                    .count(),
                sales: sales.len(),
                customers: txn.scan_records::<Customer>()?.len(),
                total_deposits: entries
                    .iter()
                    .filter(|e| e.kind == EntryKind::Deposit)
                    .map(|e| e.amount)
                    .sum(),
                total_active_debt: debts
                    .iter()
                    .filter(|d| d.status.is_open())
                    .map(|d| d.remaining_amount)
                    .sum(),
                overdue_debts: debts
                    .iter()
                    .filter(|d| d.status == DebtStatus::Overdue || d.is_past_due(today))
                    .count(),
                today_revenue: sales
                    .iter()
                    .filter(|s| s.timestamp.date() == today)
                    .map(|s| s.total)
                    .sum(),
            })
        })
    }

    /// Sales summary for the inclusive days `start..=end`
    pub fn period_report(&self, start: NaiveDate, end: NaiveDate) -> NiagaResult<PeriodReport> {
        if start > end {
            return Err(NiagaError::invalid_input(
                "start date cannot be after end date",
            ));
        }
        self.db.read(|txn| {
            let sales: Vec<Sale> = txn
                .scan_records::<Sale>()?
                .into_iter()
                .filter(|s| {
                    let day = s.timestamp.date();
                    day >= start && day <= end
                })
                .collect();

            let mut revenue = Rupiah::ZERO;
            let mut profit = Rupiah::ZERO;
            let mut loss = Rupiah::ZERO;
            let mut sellers: HashMap<u64, BestSeller> = HashMap::new();
            for sale in &sales {
                revenue += sale.total;
                profit += sale.profit;
                if sale.profit.is_negative() {
                    loss += sale.profit.abs();
                }
                for line in &sale.lines {
                    let seller = sellers.entry(line.item_id).or_insert_with(|| BestSeller {
                        name: line.name.clone(),
                        quantity: 0,
                        revenue: Rupiah::ZERO,
                    });
                    seller.quantity = seller.quantity.saturating_add(line.quantity);
                    seller.revenue += line.subtotal;
                }
            }

            let mut best_sellers: Vec<BestSeller> = sellers.into_values().collect();
            best_sellers.sort_by(|a, b| b.quantity.cmp(&a.quantity).then(a.name.cmp(&b.name)));
            best_sellers.truncate(BEST_SELLERS);

            Ok(PeriodReport {
                start,
                end,
                revenue,
                profit,
                loss,
                transactions: sales.len(),
                best_sellers,
                low_stock: item_views(txn, InventoryItem::is_low)?,
            })
        })
    }
}
