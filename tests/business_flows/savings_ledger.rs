//! Savings accounts: running balances, statements and receipts

use crate::test_utils::*;
use niaga::{EntryKind, Error};

#[test]
fn running_balance_follows_every_entry() {
    let niaga = shop_at(clock(at(2025, 8, 3, 9)));

    let first = niaga
        .savings()
        .deposit(savings_on("Siti Aminah", 100_000, day(2025, 8, 1)))
        .unwrap();
    assert_eq!(first.entry.balance_after, rp(100_000));
    let saver_id = first.saver.id;

    niaga
        .savings()
        .withdraw(savings_on("Siti Aminah", 30_000, day(2025, 8, 2)))
        .unwrap();
    let last = niaga
        .savings()
        .deposit(savings_on("Siti Aminah", 5_000, day(2025, 8, 3)))
        .unwrap();
    assert_eq!(last.saver.id, saver_id);
    assert_eq!(last.entry.balance_after, rp(75_000));

    let statement = niaga.savings().statement(saver_id).unwrap();
    assert_eq!(statement.balance, rp(75_000));
    assert_eq!(statement.entries.len(), 3);
    assert_eq!(statement.entries[0].date, day(2025, 8, 3));
    assert_eq!(statement.entries[1].kind, EntryKind::Withdrawal);

    let lookup = niaga.savings().balance("Siti Aminah").unwrap();
    assert!(lookup.exists);
    assert_eq!(lookup.formatted, "Rp 75.000");

    assert!(niaga.verify_ledger().unwrap().is_empty());
}

#[test]
fn overdrawing_is_refused() {
    let niaga = shop_at(clock(at(2025, 8, 3, 9)));
    niaga.savings().deposit(savings("Budi", 20_000)).unwrap();

    let err = niaga.savings().withdraw(savings("Budi", 20_001)).unwrap_err();
    assert_eq!(
        err,
        Error::InsufficientBalance {
            saver: "Budi".into(),
            balance: rp(20_000),
            requested: rp(20_001),
        }
    );

    let err = niaga.savings().withdraw(savings("Tidak Ada", 1_000)).unwrap_err();
    assert_eq!(err.code(), "not_found");

    let err = niaga.savings().deposit(savings("Budi", 0)).unwrap_err();
    assert_eq!(err.code(), "invalid_input");

    let err = niaga.savings().deposit(savings("   ", 1_000)).unwrap_err();
    assert_eq!(err.code(), "invalid_input");

    // withdrawing everything is fine
    let receipt = niaga.savings().withdraw(savings("Budi", 20_000)).unwrap();
    assert_eq!(receipt.entry.balance_after, rp(0));
}

#[test]
fn dashboard_totals_and_search() {
    let niaga = shop_at(clock(at(2025, 8, 3, 9)));
    niaga.savings().deposit(savings("Ani", 50_000)).unwrap();
    niaga.savings().deposit(savings("andi", 25_000)).unwrap();
    niaga.savings().deposit(savings("Budi", 10_000)).unwrap();
    niaga.savings().withdraw(savings("Ani", 15_000)).unwrap();

    let all = niaga.savings().dashboard("").unwrap();
    assert_eq!(all.total_savers, 3);
    assert_eq!(all.total_deposits, rp(85_000));
    assert_eq!(all.total_withdrawals, rp(15_000));
    assert_eq!(all.total_balance, rp(70_000));
    assert_eq!(all.recent.len(), 4);

    let filtered = niaga.savings().dashboard("AN").unwrap();
    let names: Vec<&str> = filtered
        .savers
        .iter()
        .map(|s| s.saver.name.as_str())
        .collect();
    assert_eq!(names, vec!["andi", "Ani"]);
    assert_eq!(filtered.total_savers, 3);

    let lookup = niaga.savings().balance("Nobody").unwrap();
    assert!(!lookup.exists);
    assert_eq!(lookup.balance, rp(0));
}

#[test]
fn receipts_and_statements_render() {
    let niaga = shop_at(clock(at(2025, 8, 3, 9)));
    let receipt = niaga.savings().deposit(savings("Rina", 40_000)).unwrap();

    let doc = niaga.documents().savings_receipt(receipt.entry.id).unwrap();
    assert!(doc.body.contains("Rina"));
    assert!(doc.body.contains("Rp 40.000"));

    let statement = niaga.documents().statement(receipt.saver.id).unwrap();
    assert!(statement.is_html());
    assert!(statement.body.contains("Rp 40.000"));
}
