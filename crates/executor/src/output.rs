//! Command results.
//!
//! Serialized as `{"type": "...", "data": ...}` so clients can dispatch on
//! the variant without knowing which command produced it.

use niaga_core::model::{
    BalanceLookup, BusinessSettings, CostEntry, CostSheet, Customer, DashboardStats, DebtPayment,
    DebtView, InventoryItem, Invoice, ItemView, LedgerMismatch, PeriodReport, PriceListRow,
    Product, Sale, Saver, SavingsDashboard, Statement, StockMovement, UserProfile,
};
use niaga_core::Rupiah;
use niaga_documents::Document;
use niaga_engine::{CheckpointInfo, DatabaseStats, NiagaConfig};
use niaga_primitives::{DebtReceipt, SavingsReceipt, StockChange};
use serde::Serialize;

/// Result of a successful command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum Output {
    /// Nothing to return
    Unit,
    /// Answer to `Ping`
    Pong {
        /// Crate version
        version: String,
    },
    /// A count of changed records
    Count(usize),
    /// A money amount
    Amount(Rupiah),
    /// A generated identifier
    Id(String),

    // System
    /// Database statistics
    Stats(DatabaseStats),
    /// Configuration in effect
    Config(NiagaConfig),
    /// Checkpoint result
    Checkpoint(CheckpointInfo),
    /// Savings ledger mismatches, empty when consistent
    LedgerMismatches(Vec<LedgerMismatch>),

    // Accounts
    /// One user
    User(UserProfile),
    /// The session's user, if logged in
    MaybeUser(Option<UserProfile>),
    /// Users
    Users(Vec<UserProfile>),
    /// Business identity
    Settings(BusinessSettings),

    // Catalog
    /// One product
    Product(Product),
    /// Products
    Products(Vec<Product>),
    /// One cost sheet line
    Cost(CostEntry),
    /// A cost sheet
    CostSheet(CostSheet),
    /// Price list rows
    PriceList(Vec<PriceListRow>),

    // Inventory
    /// One stock item
    Item(InventoryItem),
    /// Stock items with product names
    Items(Vec<ItemView>),
    /// Item after a stock operation
    StockChange(StockChange),
    /// Stock ledger entries
    Movements(Vec<StockMovement>),

    // Savings
    /// Saver with the entry just recorded or looked up
    SavingsReceipt(SavingsReceipt),
    /// One saver
    Saver(Saver),
    /// Savers
    Savers(Vec<Saver>),
    /// Account statement
    Statement(Statement),
    /// Savings overview
    SavingsDashboard(SavingsDashboard),
    /// Balance lookup by name
    Balance(BalanceLookup),

    // Cashier
    /// One sale
    Sale(Sale),
    /// Sales
    Sales(Vec<Sale>),

    // Invoices
    /// One invoice
    Invoice(Invoice),
    /// Invoices
    Invoices(Vec<Invoice>),

    // Debts
    /// One debt with its customer name
    Debt(DebtView),
    /// Debts
    Debts(Vec<DebtView>),
    /// Debt after a payment
    DebtReceipt(DebtReceipt),
    /// Payments of a debt
    Payments(Vec<DebtPayment>),
    /// Customers
    Customers(Vec<Customer>),

    // Reports
    /// Dashboard counters
    Dashboard(DashboardStats),
    /// Period report
    Report(PeriodReport),

    /// A rendered document
    Document(Document),
}

impl Output {
    /// Variant name, as it appears in the `"type"` tag
    pub fn kind(&self) -> &'static str {
        match self {
            Output::Unit => "Unit",
            Output::Pong { .. } => "Pong",
            Output::Count(_) => "Count",
            Output::Amount(_) => "Amount",
            Output::Id(_) => "Id",
            Output::Stats(_) => "Stats",
            Output::Config(_) => "Config",
            Output::Checkpoint(_) => "Checkpoint",
            Output::LedgerMismatches(_) => "LedgerMismatches",
            Output::User(_) => "User",
            Output::MaybeUser(_) => "MaybeUser",
            Output::Users(_) => "Users",
            Output::Settings(_) => "Settings",
            Output::Product(_) => "Product",
            Output::Products(_) => "Products",
            Output::Cost(_) => "Cost",
            Output::CostSheet(_) => "CostSheet",
            Output::PriceList(_) => "PriceList",
            Output::Item(_) => "Item",
            Output::Items(_) => "Items",
            Output::StockChange(_) => "StockChange",
            Output::Movements(_) => "Movements",
            Output::SavingsReceipt(_) => "SavingsReceipt",
            Output::Saver(_) => "Saver",
            Output::Savers(_) => "Savers",
            Output::Statement(_) => "Statement",
            Output::SavingsDashboard(_) => "SavingsDashboard",
            Output::Balance(_) => "Balance",
            Output::Sale(_) => "Sale",
            Output::Sales(_) => "Sales",
            Output::Invoice(_) => "Invoice",
            Output::Invoices(_) => "Invoices",
            Output::Debt(_) => "Debt",
            Output::Debts(_) => "Debts",
            Output::DebtReceipt(_) => "DebtReceipt",
            Output::Payments(_) => "Payments",
            Output::Customers(_) => "Customers",
            Output::Dashboard(_) => "Dashboard",
            Output::Report(_) => "Report",
            Output::Document(_) => "Document",
        }
    }
}
