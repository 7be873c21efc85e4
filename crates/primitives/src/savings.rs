//! Savings primitive
//!
//! Savers and their append-only ledger. A saver's balance is never stored
//! on the saver: it is `Σ deposits − Σ withdrawals` over the ledger, and
//! each entry records the running balance it produced so the ledger can
//! be replayed and checked ([`Savings::verify_ledger`]).

use crate::validate::{contains_ci, positive_amount, required};
use niaga_core::model::savings::{
    balance_of, replay_mismatches, DEFAULT_DEPOSIT_DESCRIPTION, DEFAULT_WITHDRAWAL_DESCRIPTION,
};
use niaga_core::model::{
    BalanceLookup, EntryKind, LedgerMismatch, RecentEntry, Saver, SaverBalance, SavingsDashboard,
    SavingsEntry, SavingsRequest, Statement,
};
use niaga_core::{EntityRef, NiagaError, NiagaResult, Rupiah, Table};
use niaga_engine::{Database, TransactionContext};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Entries shown on the dashboard
pub const RECENT_ENTRIES: usize = 20;

/// A saver with the entry just recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsReceipt {
    /// The saver
    pub saver: Saver,
    /// The new entry
    pub entry: SavingsEntry,
}

/// Savings primitive
#[derive(Clone)]
pub struct Savings {
    db: Arc<Database>,
}

impl Savings {
    /// Create a new savings facade
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Record a deposit, creating the saver on first use
    pub fn deposit(&self, req: &SavingsRequest) -> NiagaResult<SavingsReceipt> {
        let name = required("saver name", &req.saver_name)?;
        positive_amount("amount", req.amount)?;

        let receipt = self.db.transaction(|txn| {
            let saver = match find_saver(txn, &name)? {
                Some(saver) => saver,
                None => {
                    let saver = Saver {
                        id: txn.next_id(Table::Savers)?,
                        name: name.clone(),
                        phone: req.phone.as_deref().unwrap_or("").trim().to_string(),
                        address: req.address.as_deref().unwrap_or("").trim().to_string(),
                        created_at: txn.now(),
                    };
                    txn.put_record(&saver)?;
                    saver
                }
            };
            let balance = saver_balance(txn, saver.id)?;
            let entry = append_entry(
                txn,
                &saver,
                EntryKind::Deposit,
                req,
                balance.checked_add(req.amount)?,
                DEFAULT_DEPOSIT_DESCRIPTION,
            )?;
            Ok(SavingsReceipt { saver, entry })
        })?;
        info!(
            saver_id = receipt.saver.id,
            amount = %receipt.entry.amount,
            balance = %receipt.entry.balance_after,
            "deposit"
        );
        Ok(receipt)
    }

    /// Record a withdrawal from an existing saver
    ///
    /// # Errors
    ///
    /// - `NotFound` when no saver has this name
    /// - `InsufficientBalance` when the amount exceeds the balance
    pub fn withdraw(&self, req: &SavingsRequest) -> NiagaResult<SavingsReceipt> {
        let name = required("saver name", &req.saver_name)?;
        positive_amount("amount", req.amount)?;

        let receipt = self.db.transaction(|txn| {
            let saver = find_saver(txn, &name)?
                .ok_or_else(|| NiagaError::not_found(EntityRef::new(Table::Savers, &name)))?;
            let balance = saver_balance(txn, saver.id)?;
            if req.amount > balance {
                return Err(NiagaError::InsufficientBalance {
                    saver: saver.name.clone(),
                    balance,
                    requested: req.amount,
                });
            }
            let entry = append_entry(
                txn,
                &saver,
                EntryKind::Withdrawal,
                req,
                balance.checked_sub(req.amount)?,
                DEFAULT_WITHDRAWAL_DESCRIPTION,
            )?;
            Ok(SavingsReceipt { saver, entry })
        })?;
        info!(
            saver_id = receipt.saver.id,
            amount = %receipt.entry.amount,
            balance = %receipt.entry.balance_after,
            "withdrawal"
        );
        Ok(receipt)
    }

    /// One saver
    pub fn get_saver(&self, saver_id: u64) -> NiagaResult<Saver> {
        self.db.read(|txn| txn.require::<Saver>(saver_id))
    }

    /// Current balance of a saver
    pub fn balance(&self, saver_id: u64) -> NiagaResult<Rupiah> {
        self.db.read(|txn| {
            txn.require::<Saver>(saver_id)?;
            saver_balance(txn, saver_id)
        })
    }

    /// One entry together with its saver
    pub fn receipt(&self, entry_id: u64) -> NiagaResult<SavingsReceipt> {
        self.db.read(|txn| {
            let entry = txn.require::<SavingsEntry>(entry_id)?;
            let saver = txn.require::<Saver>(entry.saver_id)?;
            Ok(SavingsReceipt { saver, entry })
        })
    }

    /// Saver, balance and entries, newest first (date, then id)
    pub fn statement(&self, saver_id: u64) -> NiagaResult<Statement> {
        self.db.read(|txn| {
            let saver = txn.require::<Saver>(saver_id)?;
            let mut entries = saver_entries(txn, saver_id)?;
            let balance = balance_of(&entries);
            entries.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
            Ok(Statement {
                saver,
                balance,
                entries,
            })
        })
    }

    /// Savers matching `search` by name, recent entries and totals
    pub fn dashboard(&self, search: &str) -> NiagaResult<SavingsDashboard> {
        let search = search.trim();
        self.db.read(|txn| {
            let savers = txn.scan_records::<Saver>()?;
            let entries = txn.scan_records::<SavingsEntry>()?;

            let mut balances: HashMap<u64, Rupiah> = HashMap::new();
            let mut total_deposits = Rupiah::ZERO;
            let mut total_withdrawals = Rupiah::ZERO;
            for entry in &entries {
                *balances.entry(entry.saver_id).or_default() += entry.signed_amount();
                match entry.kind {
                    EntryKind::Deposit => total_deposits += entry.amount,
                    EntryKind::Withdrawal => total_withdrawals += entry.amount,
                }
            }

            let names: HashMap<u64, String> =
                savers.iter().map(|s| (s.id, s.name.clone())).collect();
            let mut recent: Vec<&SavingsEntry> = entries.iter().collect();
            recent.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            let recent = recent
                .into_iter()
                .take(RECENT_ENTRIES)
                .map(|e| RecentEntry {
                    saver_name: names.get(&e.saver_id).cloned().unwrap_or_default(),
                    entry: e.clone(),
                })
                .collect();

            let total_savers = savers.len();
            let mut listed: Vec<SaverBalance> = savers
                .into_iter()
                .filter(|s| contains_ci(&s.name, search))
                .map(|saver| SaverBalance {
                    balance: balances.get(&saver.id).copied().unwrap_or_default(),
                    saver,
                })
                .collect();
            listed.sort_by(|a, b| a.saver.name.to_lowercase().cmp(&b.saver.name.to_lowercase()));

            Ok(SavingsDashboard {
                savers: listed,
                recent,
                total_savers,
                total_deposits,
                total_withdrawals,
                total_balance: total_deposits - total_withdrawals,
            })
        })
    }

    /// Balance of the saver with exactly this name, zero when unknown
    pub fn balance_by_name(&self, name: &str) -> NiagaResult<BalanceLookup> {
        let name = name.trim().to_string();
        self.db.read(|txn| {
            let (exists, balance) = match find_saver(txn, &name)? {
                Some(saver) => (true, saver_balance(txn, saver.id)?),
                None => (false, Rupiah::ZERO),
            };
            Ok(BalanceLookup {
                exists,
                balance,
                formatted: balance.to_string(),
            })
        })
    }

    /// Replay every saver's ledger and report entries whose recorded
    /// running balance is wrong
    pub fn verify_ledger(&self) -> NiagaResult<Vec<LedgerMismatch>> {
        let (savers, entries) = self.db.read(|txn| {
            Ok((
                txn.scan_records::<Saver>()?,
                txn.scan_records::<SavingsEntry>()?,
            ))
        })?;

        let mut by_saver: HashMap<u64, Vec<SavingsEntry>> = HashMap::new();
        for entry in entries {
            by_saver.entry(entry.saver_id).or_default().push(entry);
        }
        let names: HashMap<u64, &str> = savers.iter().map(|s| (s.id, s.name.as_str())).collect();

        let mut mismatches = Vec::new();
        let mut saver_ids: Vec<u64> = by_saver.keys().copied().collect();
        saver_ids.sort_unstable();
        for saver_id in saver_ids {
            let entries = &by_saver[&saver_id];
            for (entry_id, recorded, expected) in replay_mismatches(entries) {
                mismatches.push(LedgerMismatch {
                    saver_id,
                    saver_name: names.get(&saver_id).unwrap_or(&"").to_string(),
                    entry_id,
                    recorded,
                    expected,
                });
            }
        }
        if !mismatches.is_empty() {
            warn!(count = mismatches.len(), "savings ledger mismatches");
        }
        Ok(mismatches)
    }

    /// All savers by name
    pub fn list_savers(&self) -> NiagaResult<Vec<Saver>> {
        let mut savers = self.db.read(|txn| txn.scan_records::<Saver>())?;
        savers.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(savers)
    }
}

fn find_saver(txn: &mut TransactionContext, name: &str) -> NiagaResult<Option<Saver>> {
    txn.find_record::<Saver, _>(|s| s.name == name)
}

fn saver_entries(txn: &mut TransactionContext, saver_id: u64) -> NiagaResult<Vec<SavingsEntry>> {
    Ok(txn
        .scan_records::<SavingsEntry>()?
        .into_iter()
        .filter(|e| e.saver_id == saver_id)
        .collect())
}

fn saver_balance(txn: &mut TransactionContext, saver_id: u64) -> NiagaResult<Rupiah> {
    Ok(balance_of(&saver_entries(txn, saver_id)?))
}

fn append_entry(
    txn: &mut TransactionContext,
    saver: &Saver,
    kind: EntryKind,
    req: &SavingsRequest,
    balance_after: Rupiah,
    default_description: &str,
) -> NiagaResult<SavingsEntry> {
    let description = req
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(default_description)
        .to_string();
    let entry = SavingsEntry {
        id: txn.next_id(Table::SavingsEntries)?,
        saver_id: saver.id,
        date: req.date.unwrap_or_else(|| txn.today()),
        amount: req.amount,
        kind,
        description,
        balance_after,
        created_at: txn.now(),
    };
    txn.put_record(&entry)?;
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{at, date, setup_db};
    use proptest::prelude::*;

    fn request(name: &str, amount: i64) -> SavingsRequest {
        SavingsRequest {
            saver_name: name.into(),
            date: None,
            amount: Rupiah::new(amount),
            description: None,
            phone: None,
            address: None,
        }
    }

    #[test]
    fn test_first_deposit_creates_saver() {
        let (db, _) = setup_db();
        let savings = Savings::new(db);
        let mut req = request("  Siti ", 50_000);
        req.phone = Some("0812".into());
        let receipt = savings.deposit(&req).unwrap();
        assert_eq!(receipt.saver.name, "Siti");
        assert_eq!(receipt.saver.phone, "0812");
        assert_eq!(receipt.entry.balance_after, Rupiah::new(50_000));
        assert_eq!(receipt.entry.description, DEFAULT_DEPOSIT_DESCRIPTION);
        assert_eq!(receipt.entry.date, date(2025, 8, 3));

        let again = savings.deposit(&request("Siti", 25_000)).unwrap();
        assert_eq!(again.saver.id, receipt.saver.id);
        assert_eq!(again.entry.balance_after, Rupiah::new(75_000));
        assert_eq!(savings.list_savers().unwrap().len(), 1);
    }

    #[test]
    fn test_withdraw_rules() {
        let (db, _) = setup_db();
        let savings = Savings::new(db);
        assert!(matches!(
            savings.withdraw(&request("Budi", 1_000)),
            Err(NiagaError::NotFound { .. })
        ));

        savings.deposit(&request("Budi", 10_000)).unwrap();
        let err = savings.withdraw(&request("Budi", 12_500)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "insufficient balance for Budi: balance Rp 10.000, requested Rp 12.500"
        );

        let receipt = savings.withdraw(&request("Budi", 10_000)).unwrap();
        assert_eq!(receipt.entry.kind, EntryKind::Withdrawal);
        assert_eq!(receipt.entry.balance_after, Rupiah::ZERO);
        assert_eq!(receipt.entry.description, DEFAULT_WITHDRAWAL_DESCRIPTION);
    }

    #[test]
    fn test_amount_must_be_positive() {
        let (db, _) = setup_db();
        let savings = Savings::new(db);
        assert!(savings.deposit(&request("Budi", 0)).is_err());
        assert!(savings.deposit(&request("Budi", -5)).is_err());
        savings.deposit(&request("Budi", 5)).unwrap();
        assert!(savings.withdraw(&request("Budi", 0)).is_err());
    }

    #[test]
    fn test_huge_amounts_are_rejected_without_entries() {
        let (db, _) = setup_db();
        let savings = Savings::new(db.clone());
        assert!(matches!(
            savings.deposit(&request("Joko", i64::MAX)),
            Err(NiagaError::InvalidInput { .. })
        ));
        let first = savings
            .deposit(&request("Joko", Rupiah::MAX_INPUT.amount()))
            .unwrap();

        // a balance near the top of the range, as left by a long history
        db.transaction(|txn| {
            let mut entry = txn.require::<SavingsEntry>(first.entry.id)?;
            entry.amount = Rupiah::new(i64::MAX - 10);
            entry.balance_after = entry.amount;
            txn.put_record(&entry)
        })
        .unwrap();

        let err = savings.deposit(&request("Joko", 11)).unwrap_err();
        assert!(matches!(err, NiagaError::InvalidInput { .. }));
        let statement = savings.statement(first.saver.id).unwrap();
        assert_eq!(statement.entries.len(), 1);
        assert_eq!(statement.balance, Rupiah::new(i64::MAX - 10));
        assert!(savings.verify_ledger().unwrap().is_empty());
    }

    #[test]
    fn test_statement_orders_newest_first() {
        let (db, clock) = setup_db();
        let savings = Savings::new(db);
        let mut early = request("Ani", 10_000);
        early.date = Some(date(2025, 7, 1));
        let first = savings.deposit(&early).unwrap();
        savings.deposit(&request("Ani", 5_000)).unwrap();
        clock.set(at(2025, 8, 3, 11));
        let mut note = request("Ani", 3_000);
        note.description = Some("beli buku".into());
        savings.withdraw(&note).unwrap();

        let statement = savings.statement(first.saver.id).unwrap();
        assert_eq!(statement.balance, Rupiah::new(12_000));
        let ids: Vec<u64> = statement.entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(statement.entries[0].description, "beli buku");
    }

    #[test]
    fn test_dashboard_and_lookup() {
        let (db, _) = setup_db();
        let savings = Savings::new(db);
        savings.deposit(&request("Siti Aminah", 40_000)).unwrap();
        savings.deposit(&request("budi", 10_000)).unwrap();
        savings.withdraw(&request("Siti Aminah", 15_000)).unwrap();

        let all = savings.dashboard("").unwrap();
        assert_eq!(all.total_savers, 2);
        assert_eq!(all.savers[0].saver.name, "budi");
        assert_eq!(all.savers[1].balance, Rupiah::new(25_000));
        assert_eq!(all.total_deposits, Rupiah::new(50_000));
        assert_eq!(all.total_withdrawals, Rupiah::new(15_000));
        assert_eq!(all.total_balance, Rupiah::new(35_000));
        assert_eq!(all.recent.len(), 3);
        assert_eq!(all.recent[0].saver_name, "Siti Aminah");
        assert_eq!(all.recent[0].entry.kind, EntryKind::Withdrawal);

        let filtered = savings.dashboard("AMIN").unwrap();
        assert_eq!(filtered.savers.len(), 1);
        assert_eq!(filtered.total_savers, 2);

        let found = savings.balance_by_name("Siti Aminah").unwrap();
        assert!(found.exists);
        assert_eq!(found.formatted, "Rp 25.000");
        let missing = savings.balance_by_name("Nobody").unwrap();
        assert!(!missing.exists);
        assert_eq!(missing.balance, Rupiah::ZERO);
    }

    #[test]
    fn test_verify_ledger_detects_tampering() {
        let (db, _) = setup_db();
        let savings = Savings::new(db.clone());
        savings.deposit(&request("Siti", 40_000)).unwrap();
        let second = savings.deposit(&request("Siti", 10_000)).unwrap();
        assert!(savings.verify_ledger().unwrap().is_empty());

        db.transaction(|txn| {
            let mut entry = txn.require::<SavingsEntry>(second.entry.id)?;
            entry.balance_after = Rupiah::new(1);
            txn.put_record(&entry)
        })
        .unwrap();
        let mismatches = savings.verify_ledger().unwrap();
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].saver_name, "Siti");
        assert_eq!(mismatches[0].expected, Rupiah::new(50_000));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_ledger_replays_and_never_goes_negative(
            ops in proptest::collection::vec((any::<bool>(), 1i64..50_000), 1..25)
        ) {
            let (db, _) = setup_db();
            let savings = Savings::new(db);
            let mut expected = 0i64;
            for (is_deposit, amount) in ops {
                if is_deposit {
                    savings.deposit(&request("Rina", amount)).unwrap();
                    expected += amount;
                } else if savings.withdraw(&request("Rina", amount)).is_ok() {
                    expected -= amount;
                }
                prop_assert!(expected >= 0);
            }
            prop_assert!(savings.verify_ledger().unwrap().is_empty());
            let lookup = savings.balance_by_name("Rina").unwrap();
            if lookup.exists {
                prop_assert_eq!(lookup.balance, Rupiah::new(expected));
            }
        }
    }
}
