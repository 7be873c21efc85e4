//! Public types for the niaga API.
//!
//! Records and request types from the internal crates, re-exported so
//! callers depend on `niaga` alone.

// ============================================================================
// Money and time
// ============================================================================

pub use niaga_core::{Clock, FixedClock, Rupiah, SystemClock};

// ============================================================================
// Business records
// ============================================================================

pub use niaga_core::model::{
    BalanceLookup, BestSeller, BusinessSettings, CartLine, CostEntry, CostKind, CostSheet,
    Customer, DashboardStats, Debt, DebtPayment, DebtStatus, DebtView, EntryKind, InventoryItem,
    Invoice, InvoiceLine, InvoiceStatus, InvoiceTotals, ItemView, LedgerMismatch, MovementKind,
    NewCost, NewDebt, NewInvoice, NewInvoiceLine, NewItem, NewProduct, PeriodReport, PriceListRow,
    Product, ProductUpdate, RecentEntry, Role, Sale, SaleLine, Saver, SaverBalance,
    SavingsDashboard, SavingsEntry, SavingsRequest, Statement, StockAction, StockMovement,
    StockStatus, UserProfile,
};

// Results of composite operations
pub use niaga_primitives::{DebtReceipt, Registration, SavingsReceipt, StockChange};

// ============================================================================
// Database configuration and maintenance
// ============================================================================

pub use niaga_engine::{
    CheckpointInfo, Database, DatabaseStats, DurabilityMode, NiagaConfig, RecoveryInfo,
    CONFIG_FILE,
};
