//! Command protocol.
//!
//! Every operation the executor understands is one [`Command`] variant.
//! Commands serialize as JSON objects tagged by `"command"`:
//!
//! ```text
//! {"command": "Login", "username": "admin", "password": "admin123"}
//! {"command": "SaleProcess", "cart": [{"item_id": 1, "quantity": 2}], "payment": 20000}
//! ```
//!
//! Each command declares the [`Access`] level it requires and whether it
//! writes, so the session can reject it before any handler runs.

use chrono::NaiveDate;
use niaga_core::model::{
    BusinessSettings, CartLine, DebtStatus, InvoiceStatus, NewCost, NewDebt, NewInvoice, NewItem,
    NewProduct, ProductUpdate, Role, SavingsRequest, StockAction,
};
use niaga_core::Rupiah;
use niaga_security::Access;
use serde::{Deserialize, Serialize};

/// A request to the executor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum Command {
    // ==================== System ====================
    /// Liveness check
    Ping,
    /// Row counts and WAL size
    Stats,
    /// Configuration in effect
    ConfigGet,
    /// Snapshot the store and truncate the WAL
    Checkpoint,
    /// Replay every savings ledger and report mismatches
    VerifyLedger,

    // ==================== Accounts ====================
    /// Authenticate and bind the user to the session
    Login {
        /// Login name
        username: String,
        /// Plain password
        password: String,
    },
    /// Clear the session's user
    Logout,
    /// The session's user, if any
    WhoAmI,
    /// Create a cashier account
    Register {
        /// Login name
        username: String,
        /// Email
        email: String,
        /// Password
        password: String,
        /// Must equal `password`
        confirm_password: String,
    },
    /// All users
    UserList,
    /// One user
    UserGet {
        /// User id
        user_id: u64,
    },
    /// Activate or deactivate a user
    UserToggleActive {
        /// User id
        user_id: u64,
    },
    /// Promote to admin or demote to cashier
    UserToggleAdmin {
        /// User id
        user_id: u64,
    },
    /// Set a user's role
    UserSetRole {
        /// User id
        user_id: u64,
        /// New role
        role: Role,
    },

    // ==================== Settings ====================
    /// Business identity
    SettingsGet,
    /// Replace the business identity
    SettingsUpdate {
        /// New values
        settings: BusinessSettings,
    },

    // ==================== Catalog ====================
    /// Create a product
    ProductAdd {
        /// Product fields
        product: NewProduct,
    },
    /// Replace a product's editable fields
    ProductEdit {
        /// Product id
        id: String,
        /// New values
        update: ProductUpdate,
    },
    /// Delete a product with its costs and stock items
    ProductDelete {
        /// Product id
        id: String,
    },
    /// One product
    ProductGet {
        /// Product id
        id: String,
    },
    /// All products
    ProductList,
    /// The id the next generated product would get
    ProductNextId,
    /// Add a cost sheet line
    CostAdd {
        /// Product id
        product_id: String,
        /// Cost fields
        cost: NewCost,
    },
    /// Remove a cost sheet line
    CostDelete {
        /// Cost entry id
        cost_id: u64,
    },
    /// A product's cost sheet
    CostSheet {
        /// Product id
        product_id: String,
    },
    /// Cost sheet total divided over `units`
    CostPerUnit {
        /// Product id
        product_id: String,
        /// Units produced
        units: u64,
    },
    /// Cost per unit plus markup, rounded up to Rp 500
    SuggestedPrice {
        /// Product id
        product_id: String,
        /// Units produced
        units: u64,
        /// Markup in percent
        markup_percent: f64,
    },
    /// Products with cost totals, by name
    PriceList,

    // ==================== Inventory ====================
    /// Create a stock item
    ItemAdd {
        /// Item fields
        item: NewItem,
    },
    /// One stock item
    ItemGet {
        /// Item id
        item_id: u64,
    },
    /// Delete a stock item and its movements
    ItemDelete {
        /// Item id
        item_id: u64,
    },
    /// All stock items with product names
    ItemList,
    /// Manual stock operation
    StockAdjust {
        /// Item id
        item_id: u64,
        /// Operation
        action: StockAction,
        /// Units or threshold
        quantity: i64,
        /// Free text
        #[serde(default)]
        notes: String,
    },
    /// Stock ledger of an item, oldest first
    StockMovements {
        /// Item id
        item_id: u64,
    },
    /// Items at or below their minimum
    LowStock,
    /// Σ current stock × purchase price
    InventoryValue,
    /// Items with stock, for the cashier screen
    PosItems,
    /// Items with stock whose code or name matches
    PosSearch {
        /// Search text
        query: String,
    },

    // ==================== Savings ====================
    /// Record a deposit, creating the saver when new
    SavingsDeposit {
        /// Deposit request
        request: SavingsRequest,
    },
    /// Record a withdrawal
    SavingsWithdraw {
        /// Withdrawal request
        request: SavingsRequest,
    },
    /// One saver
    SaverGet {
        /// Saver id
        saver_id: u64,
    },
    /// All savers
    SaverList,
    /// Account statement
    SavingsStatement {
        /// Saver id
        saver_id: u64,
    },
    /// One ledger entry with its saver
    SavingsReceipt {
        /// Entry id
        entry_id: u64,
    },
    /// Savers, recent entries and totals
    SavingsDashboard {
        /// Name filter
        #[serde(default)]
        search: String,
    },
    /// Balance lookup by saver name
    SavingsBalance {
        /// Saver name
        name: String,
    },

    // ==================== Cashier ====================
    /// Sell a cart
    SaleProcess {
        /// Cart lines
        cart: Vec<CartLine>,
        /// Amount tendered
        payment: Rupiah,
    },
    /// One sale
    SaleGet {
        /// Sale id
        sale_id: u64,
    },
    /// Sales in a date range, newest first
    SaleList {
        /// First day
        #[serde(default)]
        start: Option<NaiveDate>,
        /// Last day
        #[serde(default)]
        end: Option<NaiveDate>,
    },
    /// Revenue of one day
    RevenueOn {
        /// The day
        date: NaiveDate,
    },

    // ==================== Invoices ====================
    /// Create a draft invoice
    InvoiceCreate {
        /// Invoice fields
        invoice: NewInvoice,
    },
    /// One invoice
    InvoiceGet {
        /// Invoice id
        invoice_id: u64,
    },
    /// All invoices, newest first
    InvoiceList,
    /// Invoices by client name or phone
    InvoiceSearch {
        /// Search text
        query: String,
    },
    /// Change an invoice's status
    InvoiceSetStatus {
        /// Invoice id
        invoice_id: u64,
        /// New status
        status: InvoiceStatus,
    },
    /// Mark past-due invoices overdue
    InvoiceRefreshOverdue,

    // ==================== Debts ====================
    /// Record a receivable
    DebtAdd {
        /// Debt fields
        debt: NewDebt,
    },
    /// Record a payment on a debt
    DebtPay {
        /// Debt id
        debt_id: u64,
        /// Amount paid
        amount: Rupiah,
        /// Free text
        #[serde(default)]
        notes: String,
        /// Payment date, today when absent
        #[serde(default)]
        date: Option<NaiveDate>,
    },
    /// Debts, newest first
    DebtList {
        /// Customer name filter
        #[serde(default)]
        search: Option<String>,
        /// Status filter
        #[serde(default)]
        status: Option<DebtStatus>,
    },
    /// One debt
    DebtGet {
        /// Debt id
        debt_id: u64,
    },
    /// Payments of a debt
    DebtPayments {
        /// Debt id
        debt_id: u64,
    },
    /// Mark past-due debts overdue
    DebtRefreshOverdue,
    /// All debtor customers
    CustomerList,
    /// Σ remaining on a customer's open debts
    CustomerTotalDebt {
        /// Customer id
        customer_id: u64,
    },

    // ==================== Reports ====================
    /// Home screen counters
    Dashboard,
    /// Sales summary over inclusive days
    PeriodReport {
        /// First day
        start: NaiveDate,
        /// Last day
        end: NaiveDate,
    },

    // ==================== Documents ====================
    /// Cashier receipt
    RenderSaleReceipt {
        /// Sale id
        sale_id: u64,
    },
    /// Savings receipt
    RenderSavingsReceipt {
        /// Entry id
        entry_id: u64,
    },
    /// Savings account statement
    RenderStatement {
        /// Saver id
        saver_id: u64,
    },
    /// Service invoice
    RenderInvoice {
        /// Invoice id
        invoice_id: u64,
    },
    /// Business report
    RenderReport {
        /// First day
        start: NaiveDate,
        /// Last day
        end: NaiveDate,
    },
    /// Price list
    RenderPriceList,
    /// Product label
    RenderLabel {
        /// Product id
        product_id: String,
    },
}

impl Command {
    /// Variant name, as it appears in the `"command"` tag
    pub fn name(&self) -> &'static str {
        match self {
            Command::Ping => "Ping",
            Command::Stats => "Stats",
            Command::ConfigGet => "ConfigGet",
            Command::Checkpoint => "Checkpoint",
            Command::VerifyLedger => "VerifyLedger",
            Command::Login { .. } => "Login",
            Command::Logout => "Logout",
            Command::WhoAmI => "WhoAmI",
            Command::Register { .. } => "Register",
            Command::UserList => "UserList",
            Command::UserGet { .. } => "UserGet",
            Command::UserToggleActive { .. } => "UserToggleActive",
            Command::UserToggleAdmin { .. } => "UserToggleAdmin",
            Command::UserSetRole { .. } => "UserSetRole",
            Command::SettingsGet => "SettingsGet",
            Command::SettingsUpdate { .. } => "SettingsUpdate",
            Command::ProductAdd { .. } => "ProductAdd",
            Command::ProductEdit { .. } => "ProductEdit",
            Command::ProductDelete { .. } => "ProductDelete",
            Command::ProductGet { .. } => "ProductGet",
            Command::ProductList => "ProductList",
            Command::ProductNextId => "ProductNextId",
            Command::CostAdd { .. } => "CostAdd",
            Command::CostDelete { .. } => "CostDelete",
            Command::CostSheet { .. } => "CostSheet",
            Command::CostPerUnit { .. } => "CostPerUnit",
            Command::SuggestedPrice { .. } => "SuggestedPrice",
            Command::PriceList => "PriceList",
            Command::ItemAdd { .. } => "ItemAdd",
            Command::ItemGet { .. } => "ItemGet",
            Command::ItemDelete { .. } => "ItemDelete",
            Command::ItemList => "ItemList",
            Command::StockAdjust { .. } => "StockAdjust",
            Command::StockMovements { .. } => "StockMovements",
            Command::LowStock => "LowStock",
            Command::InventoryValue => "InventoryValue",
            Command::PosItems => "PosItems",
            Command::PosSearch { .. } => "PosSearch",
            Command::SavingsDeposit { .. } => "SavingsDeposit",
            Command::SavingsWithdraw { .. } => "SavingsWithdraw",
            Command::SaverGet { .. } => "SaverGet",
            Command::SaverList => "SaverList",
            Command::SavingsStatement { .. } => "SavingsStatement",
            Command::SavingsReceipt { .. } => "SavingsReceipt",
            Command::SavingsDashboard { .. } => "SavingsDashboard",
            Command::SavingsBalance { .. } => "SavingsBalance",
            Command::SaleProcess { .. } => "SaleProcess",
            Command::SaleGet { .. } => "SaleGet",
            Command::SaleList { .. } => "SaleList",
            Command::RevenueOn { .. } => "RevenueOn",
            Command::InvoiceCreate { .. } => "InvoiceCreate",
            Command::InvoiceGet { .. } => "InvoiceGet",
            Command::InvoiceList => "InvoiceList",
            Command::InvoiceSearch { .. } => "InvoiceSearch",
            Command::InvoiceSetStatus { .. } => "InvoiceSetStatus",
            Command::InvoiceRefreshOverdue => "InvoiceRefreshOverdue",
            Command::DebtAdd { .. } => "DebtAdd",
            Command::DebtPay { .. } => "DebtPay",
            Command::DebtList { .. } => "DebtList",
            Command::DebtGet { .. } => "DebtGet",
            Command::DebtPayments { .. } => "DebtPayments",
            Command::DebtRefreshOverdue => "DebtRefreshOverdue",
            Command::CustomerList => "CustomerList",
            Command::CustomerTotalDebt { .. } => "CustomerTotalDebt",
            Command::Dashboard => "Dashboard",
            Command::PeriodReport { .. } => "PeriodReport",
            Command::RenderSaleReceipt { .. } => "RenderSaleReceipt",
            Command::RenderSavingsReceipt { .. } => "RenderSavingsReceipt",
            Command::RenderStatement { .. } => "RenderStatement",
            Command::RenderInvoice { .. } => "RenderInvoice",
            Command::RenderReport { .. } => "RenderReport",
            Command::RenderPriceList => "RenderPriceList",
            Command::RenderLabel { .. } => "RenderLabel",
        }
    }

    /// Access level a session needs to run this command
    pub fn required_access(&self) -> Access {
        use Command::*;
        match self {
            Ping | Login { .. } | Register { .. } => Access::Public,

            WhoAmI
            | Logout
            | SettingsGet
            | SaleProcess { .. }
            | SaleGet { .. }
            | RenderSaleReceipt { .. }
            | SavingsDeposit { .. }
            | SavingsWithdraw { .. }
            | SavingsReceipt { .. }
            | RenderSavingsReceipt { .. }
            | SavingsStatement { .. }
            | RenderStatement { .. }
            | SavingsBalance { .. }
            | PosSearch { .. }
            | InvoiceCreate { .. }
            | StockAdjust { .. } => Access::LoggedIn,

            SavingsDashboard { .. }
            | SaverGet { .. }
            | SaverList
            | PosItems
            | SaleList { .. }
            | RevenueOn { .. }
            | InvoiceGet { .. }
            | InvoiceList
            | InvoiceSearch { .. }
            | InvoiceSetStatus { .. }
            | InvoiceRefreshOverdue
            | RenderInvoice { .. }
            | DebtAdd { .. }
            | DebtPay { .. }
            | DebtList { .. }
            | DebtGet { .. }
            | DebtPayments { .. }
            | DebtRefreshOverdue
            | CustomerList
            | CustomerTotalDebt { .. } => Access::Cashier,

            ProductAdd { .. }
            | ProductEdit { .. }
            | ProductDelete { .. }
            | ProductGet { .. }
            | ProductList
            | ProductNextId
            | CostAdd { .. }
            | CostDelete { .. }
            | CostSheet { .. }
            | CostPerUnit { .. }
            | SuggestedPrice { .. }
            | PriceList
            | RenderPriceList
            | RenderLabel { .. }
            | ItemAdd { .. }
            | ItemGet { .. }
            | ItemDelete { .. }
            | ItemList
            | StockMovements { .. }
            | LowStock
            | InventoryValue
            | Stats
            | ConfigGet
            | VerifyLedger => Access::Manager,

            UserList
            | UserGet { .. }
            | UserToggleActive { .. }
            | UserToggleAdmin { .. }
            | UserSetRole { .. }
            | SettingsUpdate { .. }
            | Dashboard
            | PeriodReport { .. }
            | RenderReport { .. }
            | Checkpoint => Access::Admin,
        }
    }

    /// Whether the command changes stored state
    ///
    /// `DebtList` refreshes overdue statuses as a side effect; it is still
    /// treated as a read, and on a read-only database the refresh is not
    /// stored.
    pub fn is_write(&self) -> bool {
        use Command::*;
        matches!(
            self,
            Checkpoint
                | Register { .. }
                | UserToggleActive { .. }
                | UserToggleAdmin { .. }
                | UserSetRole { .. }
                | SettingsUpdate { .. }
                | ProductAdd { .. }
                | ProductEdit { .. }
                | ProductDelete { .. }
                | CostAdd { .. }
                | CostDelete { .. }
                | ItemAdd { .. }
                | ItemDelete { .. }
                | StockAdjust { .. }
                | SavingsDeposit { .. }
                | SavingsWithdraw { .. }
                | SaleProcess { .. }
                | InvoiceCreate { .. }
                | InvoiceSetStatus { .. }
                | InvoiceRefreshOverdue
                | DebtAdd { .. }
                | DebtPay { .. }
                | DebtRefreshOverdue
        )
    }
}
