//! Savings accounts and their ledger
//!
//! A saver's balance is never stored on the saver. It is the sum of the
//! saver's ledger entries, and each entry records the running balance after
//! it so statements can be printed without re-summing. Replaying a saver's
//! entries in id order must reproduce every `balance_after`.

use crate::money::Rupiah;
use crate::record::Record;
use crate::types::{RecordId, Table};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Description used when a deposit has none.
pub const DEFAULT_DEPOSIT_DESCRIPTION: &str = "Setoran tabungan";
/// Description used when a withdrawal has none.
pub const DEFAULT_WITHDRAWAL_DESCRIPTION: &str = "Penarikan tabungan";

/// A savings account holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Saver {
    /// Sequence id
    pub id: u64,
    /// Unique, trimmed name
    pub name: String,
    /// Phone number
    pub phone: String,
    /// Address
    pub address: String,
    /// First deposit time
    pub created_at: NaiveDateTime,
}

impl Record for Saver {
    const TABLE: Table = Table::Savers;

    fn record_id(&self) -> RecordId {
        RecordId::Num(self.id)
    }
}

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Money in
    Deposit,
    /// Money out
    Withdrawal,
}

impl EntryKind {
    /// Indonesian label.
    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::Deposit => "Setoran",
            EntryKind::Withdrawal => "Penarikan",
        }
    }
}

/// One append-only savings ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsEntry {
    /// Sequence id
    pub id: u64,
    /// Owning saver
    pub saver_id: u64,
    /// Business date of the entry
    pub date: NaiveDate,
    /// Positive amount
    pub amount: Rupiah,
    /// Direction
    pub kind: EntryKind,
    /// Free text
    pub description: String,
    /// Saver balance after this entry
    pub balance_after: Rupiah,
    /// Time recorded
    pub created_at: NaiveDateTime,
}

impl SavingsEntry {
    /// Amount with sign: positive for deposits.
    pub fn signed_amount(&self) -> Rupiah {
        match self.kind {
            EntryKind::Deposit => self.amount,
            EntryKind::Withdrawal => -self.amount,
        }
    }
}

impl Record for SavingsEntry {
    const TABLE: Table = Table::SavingsEntries;

    fn record_id(&self) -> RecordId {
        RecordId::Num(self.id)
    }
}

/// `Σ deposits − Σ withdrawals`
pub fn balance_of<'a>(entries: impl IntoIterator<Item = &'a SavingsEntry>) -> Rupiah {
    entries.into_iter().map(SavingsEntry::signed_amount).sum()
}

/// Replay entries of one saver in id order and report every entry whose
/// recorded `balance_after` disagrees with the replayed balance.
///
/// Returns `(entry id, recorded, expected)` triples.
pub fn replay_mismatches(entries: &[SavingsEntry]) -> Vec<(u64, Rupiah, Rupiah)> {
    let mut ordered: Vec<&SavingsEntry> = entries.iter().collect();
    ordered.sort_by_key(|e| e.id);
    let mut running = Rupiah::ZERO;
    let mut mismatches = Vec::new();
    for entry in ordered {
        running += entry.signed_amount();
        if entry.balance_after != running || running.is_negative() {
            mismatches.push((entry.id, entry.balance_after, running));
        }
    }
    mismatches
}

/// A deposit or withdrawal request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsRequest {
    /// Saver name (trimmed before lookup)
    pub saver_name: String,
    /// Business date, today when absent
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Amount (> 0)
    pub amount: Rupiah,
    /// Free text, a default is used when blank
    #[serde(default)]
    pub description: Option<String>,
    /// Phone, used when the deposit creates the saver
    #[serde(default)]
    pub phone: Option<String>,
    /// Address, used when the deposit creates the saver
    #[serde(default)]
    pub address: Option<String>,
}

/// A saver with its derived balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaverBalance {
    /// The saver
    pub saver: Saver,
    /// Derived balance
    pub balance: Rupiah,
}

/// Account statement ("rekening koran").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// The saver
    pub saver: Saver,
    /// Derived balance
    pub balance: Rupiah,
    /// Entries, newest date first, then highest id first
    pub entries: Vec<SavingsEntry>,
}

/// A recent ledger entry with its saver's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentEntry {
    /// The entry
    pub entry: SavingsEntry,
    /// Name of the saver
    pub saver_name: String,
}

/// Overview of all savings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsDashboard {
    /// Savers matching the search, sorted by name
    pub savers: Vec<SaverBalance>,
    /// Most recent entries across all savers
    pub recent: Vec<RecentEntry>,
    /// Number of savers (all, not only matches)
    pub total_savers: usize,
    /// Σ deposits
    pub total_deposits: Rupiah,
    /// Σ withdrawals
    pub total_withdrawals: Rupiah,
    /// Σ balances
    pub total_balance: Rupiah,
}

/// Answer to a balance lookup by saver name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceLookup {
    /// Whether the saver exists
    pub exists: bool,
    /// Balance, zero when absent
    pub balance: Rupiah,
    /// Balance formatted as rupiah
    pub formatted: String,
}

/// A ledger entry whose recorded running balance is wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerMismatch {
    /// Saver id
    pub saver_id: u64,
    /// Saver name
    pub saver_name: String,
    /// Offending entry
    pub entry_id: u64,
    /// `balance_after` as stored
    pub recorded: Rupiah,
    /// Balance from replay
    pub expected: Rupiah,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u64, kind: EntryKind, amount: i64, balance_after: i64) -> SavingsEntry {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        SavingsEntry {
            id,
            saver_id: 1,
            date,
            amount: Rupiah::new(amount),
            kind,
            description: String::new(),
            balance_after: Rupiah::new(balance_after),
            created_at: date.and_hms_opt(9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_balance_is_deposits_minus_withdrawals() {
        let entries = vec![
            entry(1, EntryKind::Deposit, 50_000, 50_000),
            entry(2, EntryKind::Withdrawal, 20_000, 30_000),
            entry(3, EntryKind::Deposit, 5_000, 35_000),
        ];
        assert_eq!(balance_of(&entries), Rupiah::new(35_000));
        assert!(replay_mismatches(&entries).is_empty());
    }

    #[test]
    fn test_replay_reports_wrong_running_balance() {
        let entries = vec![
            entry(2, EntryKind::Withdrawal, 20_000, 31_000),
            entry(1, EntryKind::Deposit, 50_000, 50_000),
        ];
        assert_eq!(
            replay_mismatches(&entries),
            vec![(2, Rupiah::new(31_000), Rupiah::new(30_000))]
        );
    }

    #[test]
    fn test_replay_flags_negative_balance() {
        let entries = vec![entry(1, EntryKind::Withdrawal, 1_000, -1_000)];
        assert_eq!(replay_mismatches(&entries).len(), 1);
    }
}
