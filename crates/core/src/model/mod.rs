//! Business records
//!
//! Plain serde structs for everything the engine stores, plus the request
//! and view types the primitives accept and return. Pure business formulas
//! (profit, stock status, invoice totals, running balances) live next to
//! the record they describe so they can be tested without a database.

pub mod debt;
pub mod inventory;
pub mod invoice;
pub mod product;
pub mod report;
pub mod sale;
pub mod savings;
pub mod settings;
pub mod user;

pub use debt::{Customer, Debt, DebtPayment, DebtStatus, DebtView, NewDebt};
pub use inventory::{
    InventoryItem, ItemView, MovementKind, NewItem, StockAction, StockMovement, StockStatus,
};
pub use invoice::{Invoice, InvoiceLine, InvoiceStatus, InvoiceTotals, NewInvoice, NewInvoiceLine};
pub use product::{
    CostEntry, CostKind, CostSheet, NewCost, NewProduct, PriceListRow, Product, ProductUpdate,
};
pub use report::{BestSeller, DashboardStats, PeriodReport};
pub use sale::{CartLine, Sale, SaleLine};
pub use savings::{
    BalanceLookup, EntryKind, LedgerMismatch, RecentEntry, Saver, SaverBalance, SavingsDashboard,
    SavingsEntry, SavingsRequest, Statement,
};
pub use settings::BusinessSettings;
pub use user::{Role, User, UserProfile};
