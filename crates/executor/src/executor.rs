//! The command executor.
//!
//! [`Executor::execute`] is the single entry point every surface goes
//! through (typed API, CLI, HTTP server). It checks, in order:
//!
//! 1. the acting user still exists and is active
//! 2. the user's role satisfies [`Command::required_access`]
//! 3. a write command is not sent to a read-only database
//!
//! and then dispatches to the handler for the command.

use std::sync::Arc;

use niaga_core::model::UserProfile;
use niaga_core::NiagaError;
use niaga_engine::Database;
use niaga_primitives::Registration;
use niaga_security::{AccessMode, OpenOptions};
use tracing::{debug, info};

use crate::bridge::Primitives;
use crate::convert::convert_result;
use crate::handlers;
use crate::{Command, Error, Output, Result};

/// Executes commands against one database
pub struct Executor {
    primitives: Arc<Primitives>,
    access_mode: AccessMode,
}

impl Executor {
    /// A read-write executor over `db`
    pub fn new(db: Arc<Database>) -> Self {
        Self::with_access_mode(db, AccessMode::ReadWrite)
    }

    /// An executor with an explicit access mode
    pub fn with_access_mode(db: Arc<Database>, access_mode: AccessMode) -> Self {
        Self {
            primitives: Arc::new(Primitives::new(db)),
            access_mode,
        }
    }

    /// Build an executor per `opts`, creating the default settings and
    /// `admin` account when `opts.bootstrap` is set on a writable database
    pub fn open(db: Arc<Database>, opts: &OpenOptions) -> Result<Self> {
        let executor = Self::with_access_mode(db, opts.access_mode);
        if opts.bootstrap && opts.access_mode == AccessMode::ReadWrite {
            executor.bootstrap()?;
        }
        Ok(executor)
    }

    /// Create the default settings and the `admin` account when missing
    pub fn bootstrap(&self) -> Result<()> {
        let p = &self.primitives;
        if convert_result(p.settings.ensure_defaults())? {
            info!("default business settings created");
        }
        convert_result(p.accounts.ensure_default_admin())?;
        Ok(())
    }

    /// The underlying database
    pub fn database(&self) -> &Arc<Database> {
        &self.primitives.db
    }

    /// Access mode in effect
    pub fn access_mode(&self) -> AccessMode {
        self.access_mode
    }

    /// Run `cmd` on behalf of `actor` (`None` for an anonymous caller)
    pub fn execute(&self, actor: Option<&UserProfile>, cmd: Command) -> Result<Output> {
        let current = match actor {
            Some(a) => Some(self.current_user(a.id)?),
            None => None,
        };

        let required = cmd.required_access();
        if !required.permits(current.as_ref().map(|u| u.role)) {
            return Err(if current.is_none() {
                Error::Unauthenticated
            } else {
                Error::AccessDenied { required }
            });
        }
        if self.access_mode == AccessMode::ReadOnly && cmd.is_write() {
            return Err(Error::ReadOnly);
        }

        debug!(
            command = cmd.name(),
            user = current.as_ref().map(|u| u.username.as_str()).unwrap_or("-"),
            "execute"
        );
        self.dispatch(current.as_ref(), cmd)
    }

    /// Reload the acting user so role changes and deactivation apply to
    /// sessions that are already logged in
    fn current_user(&self, user_id: u64) -> Result<UserProfile> {
        match self.primitives.accounts.get_user(user_id) {
            Ok(user) if user.is_active => Ok(user),
            Ok(_) | Err(NiagaError::NotFound { .. }) => Err(Error::Unauthenticated),
            Err(e) => Err(e.into()),
        }
    }

    fn dispatch(&self, actor: Option<&UserProfile>, cmd: Command) -> Result<Output> {
        let p = &self.primitives;
        match cmd {
            // System
            Command::Ping => handlers::system::ping(),
            Command::Stats => handlers::system::stats(p),
            Command::ConfigGet => handlers::system::config_get(p),
            Command::Checkpoint => handlers::system::checkpoint(p),
            Command::VerifyLedger => handlers::system::verify_ledger(p),

            // Accounts
            Command::Login { username, password } => {
                handlers::accounts::login(p, username, password)
            }
            Command::Logout => Ok(Output::Unit),
            Command::WhoAmI => handlers::accounts::whoami(actor),
            Command::Register {
                username,
                email,
                password,
                confirm_password,
            } => handlers::accounts::register(
                p,
                Registration {
                    username,
                    email,
                    password,
                    confirm_password,
                },
            ),
            Command::UserList => handlers::accounts::user_list(p),
            Command::UserGet { user_id } => handlers::accounts::user_get(p, user_id),
            Command::UserToggleActive { user_id } => {
                handlers::accounts::user_toggle_active(p, actor, user_id)
            }
            Command::UserToggleAdmin { user_id } => {
                handlers::accounts::user_toggle_admin(p, actor, user_id)
            }
            Command::UserSetRole { user_id, role } => {
                handlers::accounts::user_set_role(p, actor, user_id, role)
            }

            // Settings
            Command::SettingsGet => handlers::settings::settings_get(p),
            Command::SettingsUpdate { settings } => {
                handlers::settings::settings_update(p, actor, settings)
            }

            // Catalog
            Command::ProductAdd { product } => handlers::catalog::product_add(p, product),
            Command::ProductEdit { id, update } => handlers::catalog::product_edit(p, id, update),
            Command::ProductDelete { id } => handlers::catalog::product_delete(p, id),
            Command::ProductGet { id } => handlers::catalog::product_get(p, id),
            Command::ProductList => handlers::catalog::product_list(p),
            Command::ProductNextId => handlers::catalog::product_next_id(p),
            Command::CostAdd { product_id, cost } => handlers::catalog::cost_add(p, product_id, cost),
            Command::CostDelete { cost_id } => handlers::catalog::cost_delete(p, cost_id),
            Command::CostSheet { product_id } => handlers::catalog::cost_sheet(p, product_id),
            Command::CostPerUnit { product_id, units } => {
                handlers::catalog::cost_per_unit(p, product_id, units)
            }
            Command::SuggestedPrice {
                product_id,
                units,
                markup_percent,
            } => handlers::catalog::suggested_price(p, product_id, units, markup_percent),
            Command::PriceList => handlers::catalog::price_list(p),

            // Inventory
            Command::ItemAdd { item } => handlers::inventory::item_add(p, actor, item),
            Command::ItemGet { item_id } => handlers::inventory::item_get(p, item_id),
            Command::ItemDelete { item_id } => handlers::inventory::item_delete(p, item_id),
            Command::ItemList => handlers::inventory::item_list(p),
            Command::StockAdjust {
                item_id,
                action,
                quantity,
                notes,
            } => handlers::inventory::stock_adjust(p, actor, item_id, action, quantity, notes),
            Command::StockMovements { item_id } => handlers::inventory::stock_movements(p, item_id),
            Command::LowStock => handlers::inventory::low_stock(p),
            Command::InventoryValue => handlers::inventory::inventory_value(p),
            Command::PosItems => handlers::inventory::pos_items(p),
            Command::PosSearch { query } => handlers::inventory::pos_search(p, query),

            // Savings
            Command::SavingsDeposit { request } => handlers::savings::deposit(p, request),
            Command::SavingsWithdraw { request } => handlers::savings::withdraw(p, request),
            Command::SaverGet { saver_id } => handlers::savings::saver_get(p, saver_id),
            Command::SaverList => handlers::savings::saver_list(p),
            Command::SavingsStatement { saver_id } => handlers::savings::statement(p, saver_id),
            Command::SavingsReceipt { entry_id } => handlers::savings::receipt(p, entry_id),
            Command::SavingsDashboard { search } => handlers::savings::dashboard(p, search),
            Command::SavingsBalance { name } => handlers::savings::balance(p, name),

            // Cashier
            Command::SaleProcess { cart, payment } => {
                handlers::cashier::sale_process(p, actor, cart, payment)
            }
            Command::SaleGet { sale_id } => handlers::cashier::sale_get(p, sale_id),
            Command::SaleList { start, end } => handlers::cashier::sale_list(p, start, end),
            Command::RevenueOn { date } => handlers::cashier::revenue_on(p, date),

            // Invoices
            Command::InvoiceCreate { invoice } => handlers::invoices::invoice_create(p, invoice),
            Command::InvoiceGet { invoice_id } => handlers::invoices::invoice_get(p, invoice_id),
            Command::InvoiceList => handlers::invoices::invoice_list(p),
            Command::InvoiceSearch { query } => handlers::invoices::invoice_search(p, query),
            Command::InvoiceSetStatus { invoice_id, status } => {
                handlers::invoices::invoice_set_status(p, invoice_id, status)
            }
            Command::InvoiceRefreshOverdue => handlers::invoices::invoice_refresh_overdue(p),

            // Debts
            Command::DebtAdd { debt } => handlers::debts::debt_add(p, actor, debt),
            Command::DebtPay {
                debt_id,
                amount,
                notes,
                date,
            } => handlers::debts::debt_pay(p, actor, debt_id, amount, notes, date),
            Command::DebtList { search, status } => handlers::debts::debt_list(
                p,
                search,
                status,
                self.access_mode == AccessMode::ReadOnly,
            ),
            Command::DebtGet { debt_id } => handlers::debts::debt_get(p, debt_id),
            Command::DebtPayments { debt_id } => handlers::debts::debt_payments(p, debt_id),
            Command::DebtRefreshOverdue => handlers::debts::debt_refresh_overdue(p),
            Command::CustomerList => handlers::debts::customer_list(p),
            Command::CustomerTotalDebt { customer_id } => {
                handlers::debts::customer_total_debt(p, customer_id)
            }

            // Reports
            Command::Dashboard => handlers::reports::dashboard(p),
            Command::PeriodReport { start, end } => handlers::reports::period_report(p, start, end),

            // Documents
            Command::RenderSaleReceipt { sale_id } => handlers::documents::sale_receipt(p, sale_id),
            Command::RenderSavingsReceipt { entry_id } => {
                handlers::documents::savings_receipt(p, entry_id)
            }
            Command::RenderStatement { saver_id } => handlers::documents::statement(p, saver_id),
            Command::RenderInvoice { invoice_id } => handlers::documents::invoice(p, invoice_id),
            Command::RenderReport { start, end } => handlers::documents::report(p, start, end),
            Command::RenderPriceList => handlers::documents::price_list(p),
            Command::RenderLabel { product_id } => handlers::documents::label(p, product_id),
        }
    }
}
