//! Debts primitive
//!
//! Customer receivables.
//!
//! # Invariants
//!
//! - `paid_amount + remaining_amount == total_amount`
//! - `remaining_amount == total_amount − Σ payments`
//! - status is `Paid` exactly when nothing remains
//!
//! Payments never exceed what is owed, so the remaining amount never goes
//! negative.

use crate::validate::{contains_ci, positive_amount, required};
use chrono::NaiveDate;
use niaga_core::model::{Customer, Debt, DebtPayment, DebtStatus, DebtView, NewDebt};
use niaga_core::{NiagaError, NiagaResult, Rupiah, Table};
use niaga_engine::{Database, TransactionContext};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// A debt after a payment, with the payment recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtReceipt {
    /// Debt after the payment
    pub debt: Debt,
    /// The payment
    pub payment: DebtPayment,
}

/// Debts primitive
#[derive(Clone)]
pub struct Debts {
    db: Arc<Database>,
}

impl Debts {
    /// Create a new debts facade
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Record a debt, creating the customer on first use
    pub fn add_debt(&self, new: &NewDebt, by: Option<u64>) -> NiagaResult<DebtView> {
        let customer_name = required("customer name", &new.customer_name)?;
        let description = required("description", &new.description)?;
        positive_amount("amount", new.amount)?;
        let invoice_number = new
            .invoice_number
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        let view = self.db.transaction(|txn| {
            let customer = match txn.find_record::<Customer, _>(|c| c.name == customer_name)? {
                Some(customer) => customer,
                None => {
                    let customer = Customer {
                        id: txn.next_id(Table::Customers)?,
                        name: customer_name.clone(),
                        phone: new.phone.trim().to_string(),
                        email: new.email.trim().to_string(),
                        address: new.address.trim().to_string(),
                        created_at: txn.now(),
                    };
                    txn.put_record(&customer)?;
                    customer
                }
            };
            let debt = Debt {
                id: txn.next_id(Table::Debts)?,
                customer_id: customer.id,
                invoice_number: invoice_number.clone(),
                description: description.clone(),
                total_amount: new.amount,
                paid_amount: Rupiah::ZERO,
                remaining_amount: new.amount,
                due_date: new.due_date,
                status: DebtStatus::Active,
                created_by: by,
                created_at: txn.now(),
            };
            txn.put_record(&debt)?;
            Ok(DebtView {
                debt,
                customer_name: customer.name,
            })
        })?;
        info!(debt_id = view.debt.id, amount = %view.debt.total_amount, "debt added");
        Ok(view)
    }

    /// Record a payment against a debt
    ///
    /// `date` defaults to the transaction date.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a non-positive amount or a paid debt
    /// - `Overpayment` when the amount exceeds what remains
    pub fn pay_debt(
        &self,
        debt_id: u64,
        amount: Rupiah,
        notes: &str,
        by: Option<u64>,
        date: Option<NaiveDate>,
    ) -> NiagaResult<DebtReceipt> {
        positive_amount("payment", amount)?;
        let notes = notes.trim();

        let receipt = self.db.transaction(|txn| {
            let mut debt = txn.require::<Debt>(debt_id)?;
            if !debt.status.is_open() {
                return Err(NiagaError::invalid_input(format!(
                    "debt {} is already paid",
                    debt_id
                )));
            }
            if amount > debt.remaining_amount {
                return Err(NiagaError::Overpayment {
                    amount,
                    remaining: debt.remaining_amount,
                });
            }
            let payment = DebtPayment {
                id: txn.next_id(Table::DebtPayments)?,
                debt_id,
                amount,
                date: date.unwrap_or_else(|| txn.today()),
                notes: notes.to_string(),
                created_by: by,
                created_at: txn.now(),
            };
            debt.apply_payment(amount);
            txn.put_record(&payment)?;
            txn.put_record(&debt)?;
            Ok(DebtReceipt { debt, payment })
        })?;
        info!(
            debt_id,
            amount = %amount,
            remaining = %receipt.debt.remaining_amount,
            "debt payment"
        );
        Ok(receipt)
    }

    /// Mark Active debts past their due date as Overdue
    pub fn refresh_overdue(&self, today: NaiveDate) -> NiagaResult<usize> {
        let changed = self.db.transaction(|txn| mark_overdue(txn, today))?;
        if changed > 0 {
            info!(changed, %today, "debts marked overdue");
        }
        Ok(changed)
    }

    /// Debts newest first, optionally filtered by customer name and status
    ///
    /// Overdue statuses are refreshed against the current date first.
    pub fn list_debts(
        &self,
        search: Option<&str>,
        status: Option<DebtStatus>,
    ) -> NiagaResult<Vec<DebtView>> {
        let views = self.db.transaction(|txn| {
            let today = txn.today();
            mark_overdue(txn, today)?;
            debt_views(txn)
        })?;
        Ok(select(views, search, status))
    }

    /// Same listing as [`Debts::list_debts`] without storing anything
    ///
    /// Debts past their due date are reported as Overdue but stay Active on
    /// disk, which is what a read-only database needs.
    pub fn view_debts(
        &self,
        search: Option<&str>,
        status: Option<DebtStatus>,
    ) -> NiagaResult<Vec<DebtView>> {
        let views = self.db.read(|txn| {
            let today = txn.today();
            let mut views = debt_views(txn)?;
            for view in views.iter_mut().filter(|v| v.debt.is_past_due(today)) {
                view.debt.status = DebtStatus::Overdue;
            }
            Ok(views)
        })?;
        Ok(select(views, search, status))
    }

    /// One debt with its customer name
    pub fn get_debt(&self, debt_id: u64) -> NiagaResult<DebtView> {
        self.db.read(|txn| {
            let debt = txn.require::<Debt>(debt_id)?;
            let customer_name = txn
                .get_record::<Customer>(debt.customer_id)?
                .map(|c| c.name)
                .unwrap_or_default();
            Ok(DebtView {
                debt,
                customer_name,
            })
        })
    }

    /// Σ remaining over the customer's unpaid (Active or Overdue) debts
    pub fn customer_total_debt(&self, customer_id: u64) -> NiagaResult<Rupiah> {
        self.db.read(|txn| {
            txn.require::<Customer>(customer_id)?;
            Ok(txn
                .scan_records::<Debt>()?
                .iter()
                .filter(|d| d.customer_id == customer_id && d.status.is_open())
                .map(|d| d.remaining_amount)
                .sum())
        })
    }

    /// Payments of a debt, oldest first
    pub fn payments(&self, debt_id: u64) -> NiagaResult<Vec<DebtPayment>> {
        self.db.read(|txn| {
            txn.require::<Debt>(debt_id)?;
            Ok(txn
                .scan_records::<DebtPayment>()?
                .into_iter()
                .filter(|p| p.debt_id == debt_id)
                .collect())
        })
    }

    /// All customers by name
    pub fn list_customers(&self) -> NiagaResult<Vec<Customer>> {
        let mut customers = self.db.read(|txn| txn.scan_records::<Customer>())?;
        customers.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(customers)
    }
}

fn mark_overdue(txn: &mut TransactionContext, today: NaiveDate) -> NiagaResult<usize> {
    let due: Vec<Debt> = txn
        .scan_records::<Debt>()?
        .into_iter()
        .filter(|d| d.is_past_due(today))
        .collect();
    for mut debt in due.iter().cloned() {
        debt.status = DebtStatus::Overdue;
        txn.put_record(&debt)?;
    }
    Ok(due.len())
}

/// Filter by customer name and status, newest first
fn select(
    mut views: Vec<DebtView>,
    search: Option<&str>,
    status: Option<DebtStatus>,
) -> Vec<DebtView> {
    let search = search.map(str::trim).unwrap_or("");
    views.retain(|v| {
        contains_ci(&v.customer_name, search) && status.map_or(true, |s| v.debt.status == s)
    });
    views.reverse();
    views
}

fn debt_views(txn: &mut TransactionContext) -> NiagaResult<Vec<DebtView>> {
    let names: HashMap<u64, String> = txn
        .scan_records::<Customer>()?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    Ok(txn
        .scan_records::<Debt>()?
        .into_iter()
        .map(|debt| DebtView {
            customer_name: names.get(&debt.customer_id).cloned().unwrap_or_default(),
            debt,
        })
        .collect())
}
