//! The ledger survives restarts, checkpoints and torn log tails

use std::io::Write;

use crate::test_utils::*;
use niaga::CartLine;

const WAL_FILE: &str = "niaga.wal";

#[test]
fn business_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let clock = clock(at(2025, 8, 3, 9));
    let (item, saver, sale) = {
        let niaga = shop_in(dir.path(), clock.clone());
        let item = stocked_item(&niaga, "Minyak 1L", "MNY-01", 14_000, 17_000, 8, 2);
        let saver = niaga.savings().deposit(savings("Tono", 60_000)).unwrap().saver.id;
        niaga.savings().withdraw(savings("Tono", 10_000)).unwrap();
        let sale = niaga
            .sales()
            .process(vec![CartLine { item_id: item, quantity: 3 }], rp(60_000))
            .unwrap();
        (item, saver, sale)
    };

    let niaga = shop_in(dir.path(), clock);
    let info = niaga.database().recovery_info();
    assert!(info.wal_replayed > 0);
    assert_eq!(info.wal_truncated_bytes, 0);

    assert_eq!(niaga.stock().get(item).unwrap().current_stock, 5);
    assert_eq!(niaga.savings().statement(saver).unwrap().balance, rp(50_000));
    assert_eq!(niaga.sales().get(sale.id).unwrap(), sale);
    assert!(niaga.verify_ledger().unwrap().is_empty());

    // ids keep counting after a restart
    let next = niaga.savings().deposit(savings("Tini", 1_000)).unwrap();
    assert!(next.saver.id > saver);
}

#[test]
fn checkpoint_then_more_writes() {
    let dir = tempfile::tempdir().unwrap();
    let clock = clock(at(2025, 8, 3, 9));
    {
        let niaga = shop_in(dir.path(), clock.clone());
        niaga.savings().deposit(savings("Agus", 25_000)).unwrap();
        let info = niaga.checkpoint().unwrap();
        assert!(info.bytes > 0);
        assert_eq!(niaga.stats().unwrap().wal_bytes, 0);
        niaga.savings().deposit(savings("Agus", 5_000)).unwrap();
    }

    let niaga = shop_in(dir.path(), clock);
    let info = niaga.database().recovery_info();
    assert!(info.snapshot_version.is_some());
    assert!(info.wal_replayed >= 1);
    assert_eq!(niaga.savings().balance("Agus").unwrap().balance, rp(30_000));
}

#[test]
fn torn_log_tail_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let clock = clock(at(2025, 8, 3, 9));
    {
        let niaga = shop_in(dir.path(), clock.clone());
        niaga.savings().deposit(savings("Dewi", 70_000)).unwrap();
    }

    // half-written frame after the last good one
    let mut wal = std::fs::OpenOptions::new()
        .append(true)
        .open(dir.path().join(WAL_FILE))
        .unwrap();
    wal.write_all(&[0x2a, 0x00, 0x00, 0x00, 0xde, 0xad]).unwrap();
    drop(wal);

    let niaga = shop_in(dir.path(), clock);
    assert!(niaga.database().recovery_info().wal_truncated_bytes > 0);
    assert_eq!(niaga.savings().balance("Dewi").unwrap().balance, rp(70_000));
    assert!(niaga.verify_ledger().unwrap().is_empty());

    niaga.savings().deposit(savings("Dewi", 1_000)).unwrap();
    assert_eq!(niaga.savings().balance("Dewi").unwrap().balance, rp(71_000));
}
