//! Shell verbs.
//!
//! Turns a line such as `deposit "Siti Aminah" 50.000 arisan` into a
//! [`Command`]. Words are split with shell quoting rules, money accepts
//! the same forms as [`Rupiah::parse`] and dates are `YYYY-MM-DD`.

use anyhow::{anyhow, bail, Context};
use chrono::NaiveDate;
use niaga_core::model::{CartLine, DebtStatus, InvoiceStatus, SavingsRequest, StockAction};
use niaga_core::time::parse_date;
use niaga_core::Rupiah;
use niaga_executor::Command;

/// One line of help per verb, printed by `help`.
pub const HELP: &str = "\
system
  ping | stats | config | checkpoint | verify
  login <user> <password> | logout | whoami
  json <command-json>
settings
  settings
catalog
  products | product <id> | price-list | costs <product-id>
stock
  items | item <id> | movements <item-id> | low-stock | stock-value
  pos [search] | stock <add|sub|set|min> <item-id> <qty> [notes]
savings
  savers | saver <id> | statement <saver-id> | balance <name>
  deposit <name> <amount> [description] | withdraw <name> <amount> [description]
  savings [search]
cashier
  sell <payment> <item-id>x<qty>... | sale <id> | sales [start] [end] | revenue [date]
invoices
  invoices | invoice <id> | find-invoice <text> | invoice-status <id> <status> | overdue
debts
  debts [active|overdue|paid] | debt <id> | debt-pay <id> <amount> [notes]
  payments <debt-id> | customers | customer-debt <customer-id>
reports
  dashboard | report <start> <end>
documents (written to the current directory)
  print receipt <sale-id> | print savings <entry-id> | print statement <saver-id>
  print invoice <id> | print report <start> <end> | print price-list | print label <product-id>
";

/// Parse one shell line into a command.
pub fn parse(line: &str) -> anyhow::Result<Command> {
    let words = shlex::split(line).ok_or_else(|| anyhow!("unbalanced quotes"))?;
    let (verb, args) = words
        .split_first()
        .ok_or_else(|| anyhow!("empty command"))?;
    let args = Args(args);

    let cmd = match verb.as_str() {
        "ping" => Command::Ping,
        "stats" => Command::Stats,
        "config" => Command::ConfigGet,
        "checkpoint" => Command::Checkpoint,
        "verify" => Command::VerifyLedger,
        "login" => Command::Login {
            username: args.text(0, "user")?,
            password: args.text(1, "password")?,
        },
        "logout" => Command::Logout,
        "whoami" => Command::WhoAmI,
        "json" => {
            let raw = line.trim_start().trim_start_matches("json").trim();
            serde_json::from_str(raw).context("parsing command JSON")?
        }

        "settings" => Command::SettingsGet,

        "products" => Command::ProductList,
        "product" => Command::ProductGet {
            id: args.text(0, "product id")?,
        },
        "price-list" => Command::PriceList,
        "costs" => Command::CostSheet {
            product_id: args.text(0, "product id")?,
        },

        "items" => Command::ItemList,
        "item" => Command::ItemGet {
            item_id: args.id(0, "item id")?,
        },
        "movements" => Command::StockMovements {
            item_id: args.id(0, "item id")?,
        },
        "low-stock" => Command::LowStock,
        "stock-value" => Command::InventoryValue,
        "pos" => match args.rest(0) {
            Some(query) => Command::PosSearch { query },
            None => Command::PosItems,
        },
        "stock" => Command::StockAdjust {
            action: stock_action(&args.text(0, "add|sub|set|min")?)?,
            item_id: args.id(1, "item id")?,
            quantity: args.int(2, "quantity")?,
            notes: args.rest(3).unwrap_or_default(),
        },

        "savers" => Command::SaverList,
        "saver" => Command::SaverGet {
            saver_id: args.id(0, "saver id")?,
        },
        "statement" => Command::SavingsStatement {
            saver_id: args.id(0, "saver id")?,
        },
        "balance" => Command::SavingsBalance {
            name: args.rest(0).ok_or_else(|| anyhow!("missing saver name"))?,
        },
        "deposit" => Command::SavingsDeposit {
            request: savings_request(&args)?,
        },
        "withdraw" => Command::SavingsWithdraw {
            request: savings_request(&args)?,
        },
        "savings" => Command::SavingsDashboard {
            search: args.rest(0).unwrap_or_default(),
        },

        "sell" => Command::SaleProcess {
            payment: args.money(0, "payment")?,
            cart: cart(args.0.get(1..).unwrap_or_default())?,
        },
        "sale" => Command::SaleGet {
            sale_id: args.id(0, "sale id")?,
        },
        "sales" => Command::SaleList {
            start: args.opt_date(0)?,
            end: args.opt_date(1)?,
        },
        "revenue" => Command::RevenueOn {
            date: match args.opt_date(0)? {
                Some(date) => date,
                None => chrono::Local::now().date_naive(),
            },
        },

        "invoices" => Command::InvoiceList,
        "invoice" => Command::InvoiceGet {
            invoice_id: args.id(0, "invoice id")?,
        },
        "find-invoice" => Command::InvoiceSearch {
            query: args.rest(0).ok_or_else(|| anyhow!("missing search text"))?,
        },
        "invoice-status" => Command::InvoiceSetStatus {
            invoice_id: args.id(0, "invoice id")?,
            status: invoice_status(&args.text(1, "status")?)?,
        },
        "overdue" => Command::InvoiceRefreshOverdue,

        "debts" => Command::DebtList {
            search: None,
            status: args.0.first().map(|s| debt_status(s)).transpose()?,
        },
        "debt" => Command::DebtGet {
            debt_id: args.id(0, "debt id")?,
        },
        "debt-pay" => Command::DebtPay {
            debt_id: args.id(0, "debt id")?,
            amount: args.money(1, "amount")?,
            notes: args.rest(2).unwrap_or_default(),
            date: None,
        },
        "payments" => Command::DebtPayments {
            debt_id: args.id(0, "debt id")?,
        },
        "customers" => Command::CustomerList,
        "customer-debt" => Command::CustomerTotalDebt {
            customer_id: args.id(0, "customer id")?,
        },

        "dashboard" => Command::Dashboard,
        "report" => Command::PeriodReport {
            start: args.date(0, "start date")?,
            end: args.date(1, "end date")?,
        },

        "print" => print(&args)?,

        other => bail!("unknown command '{}', try `help`", other),
    };
    Ok(cmd)
}

fn print(args: &Args<'_>) -> anyhow::Result<Command> {
    let kind = args.text(0, "document kind")?;
    let cmd = match kind.as_str() {
        "receipt" => Command::RenderSaleReceipt {
            sale_id: args.id(1, "sale id")?,
        },
        "savings" => Command::RenderSavingsReceipt {
            entry_id: args.id(1, "entry id")?,
        },
        "statement" => Command::RenderStatement {
            saver_id: args.id(1, "saver id")?,
        },
        "invoice" => Command::RenderInvoice {
            invoice_id: args.id(1, "invoice id")?,
        },
        "report" => Command::RenderReport {
            start: args.date(1, "start date")?,
            end: args.date(2, "end date")?,
        },
        "price-list" => Command::RenderPriceList,
        "label" => Command::RenderLabel {
            product_id: args.text(1, "product id")?,
        },
        other => bail!("unknown document '{}'", other),
    };
    Ok(cmd)
}

fn savings_request(args: &Args<'_>) -> anyhow::Result<SavingsRequest> {
    Ok(SavingsRequest {
        saver_name: args.text(0, "saver name")?,
        date: None,
        amount: args.money(1, "amount")?,
        description: args.rest(2),
        phone: None,
        address: None,
    })
}

/// `3x2` sells two units of item 3; a bare `3` sells one.
fn cart(words: &[String]) -> anyhow::Result<Vec<CartLine>> {
    if words.is_empty() {
        bail!("empty cart, expected <item-id>x<qty>");
    }
    words
        .iter()
        .map(|word| {
            let (id, qty) = match word.split_once(['x', 'X', '*']) {
                Some((id, qty)) => (id, qty),
                None => (word.as_str(), "1"),
            };
            Ok(CartLine {
                item_id: id
                    .parse()
                    .with_context(|| format!("bad item id in '{}'", word))?,
                quantity: qty
                    .parse()
                    .with_context(|| format!("bad quantity in '{}'", word))?,
            })
        })
        .collect()
}

fn stock_action(word: &str) -> anyhow::Result<StockAction> {
    Ok(match word {
        "add" | "in" => StockAction::Add,
        "sub" | "out" => StockAction::Subtract,
        "set" => StockAction::Set,
        "min" => StockAction::SetMinimum,
        other => bail!("unknown stock action '{}', expected add|sub|set|min", other),
    })
}

fn invoice_status(word: &str) -> anyhow::Result<InvoiceStatus> {
    Ok(match word {
        "draft" => InvoiceStatus::Draft,
        "sent" => InvoiceStatus::Sent,
        "paid" => InvoiceStatus::Paid,
        "overdue" => InvoiceStatus::Overdue,
        other => bail!("unknown invoice status '{}'", other),
    })
}

fn debt_status(word: &str) -> anyhow::Result<DebtStatus> {
    Ok(match word {
        "active" => DebtStatus::Active,
        "overdue" => DebtStatus::Overdue,
        "paid" => DebtStatus::Paid,
        other => bail!("unknown debt status '{}'", other),
    })
}

struct Args<'a>(&'a [String]);

impl Args<'_> {
    fn text(&self, i: usize, what: &str) -> anyhow::Result<String> {
        self.0
            .get(i)
            .cloned()
            .ok_or_else(|| anyhow!("missing {}", what))
    }

    fn id(&self, i: usize, what: &str) -> anyhow::Result<u64> {
        let word = self.text(i, what)?;
        word.parse()
            .with_context(|| format!("{} must be a number, got '{}'", what, word))
    }

    fn int(&self, i: usize, what: &str) -> anyhow::Result<i64> {
        let word = self.text(i, what)?;
        word.parse()
            .with_context(|| format!("{} must be a whole number, got '{}'", what, word))
    }

    fn money(&self, i: usize, what: &str) -> anyhow::Result<Rupiah> {
        Ok(Rupiah::parse(&self.text(i, what)?)?)
    }

    fn date(&self, i: usize, what: &str) -> anyhow::Result<NaiveDate> {
        Ok(parse_date(&self.text(i, what)?)?)
    }

    fn opt_date(&self, i: usize) -> anyhow::Result<Option<NaiveDate>> {
        self.0.get(i).map(|s| parse_date(s)).transpose().map_err(Into::into)
    }

    /// Words from `i` on joined with spaces, `None` when there are none.
    fn rest(&self, i: usize) -> Option<String> {
        let words = self.0.get(i..)?;
        if words.is_empty() {
            None
        } else {
            Some(words.join(" "))
        }
    }
}
