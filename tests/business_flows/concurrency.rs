//! Concurrent sessions against one database

use std::sync::{Arc, Barrier};
use std::thread;

use crate::test_utils::*;
use niaga::{CartLine, Command, Error, MovementKind, Output, Session};

const THREADS: usize = 8;

/// Callers resubmit when the engine's own retries run out under contention.
fn execute_retrying(session: &Session, cmd: Command) -> niaga::Result<Output> {
    loop {
        match session.execute(cmd.clone()) {
            Err(Error::Conflict { .. }) => thread::yield_now(),
            other => return other,
        }
    }
}

fn logged_in(niaga: &niaga::Niaga) -> Session {
    let session = niaga.new_session();
    session
        .execute(Command::Login {
            username: ADMIN.into(),
            password: ADMIN_PASSWORD.into(),
        })
        .unwrap();
    session
}

#[test]
fn parallel_deposits_keep_running_balances_exact() {
    let niaga = shop_at(clock(at(2025, 8, 3, 9)));
    niaga.savings().deposit(savings("Arisan RT 05", 1_000)).unwrap();

    let barrier = Arc::new(Barrier::new(THREADS));
    thread::scope(|s| {
        for i in 0..THREADS {
            let session = logged_in(&niaga);
            let barrier = barrier.clone();
            s.spawn(move || {
                barrier.wait();
                for _ in 0..5 {
                    execute_retrying(
                        &session,
                        Command::SavingsDeposit {
                            request: savings("Arisan RT 05", 1_000 * (i as i64 + 1)),
                        },
                    )
                    .unwrap();
                }
            });
        }
    });

    // 1 000 + 5 × (1 000 + 2 000 + ... + 8 000)
    let lookup = niaga.savings().balance("Arisan RT 05").unwrap();
    assert_eq!(lookup.balance, rp(181_000));
    assert!(niaga.verify_ledger().unwrap().is_empty());
    assert_eq!(niaga.savings().list().unwrap().len(), 1);
}

#[test]
fn parallel_sales_never_oversell() {
    let niaga = shop_at(clock(at(2025, 8, 3, 9)));
    let item = stocked_item(&niaga, "Telur 1kg", "TLR-01", 25_000, 28_000, 10, 2);

    let barrier = Arc::new(Barrier::new(THREADS));
    let sold: usize = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let session = logged_in(&niaga);
                let barrier = barrier.clone();
                s.spawn(move || {
                    barrier.wait();
                    let result = execute_retrying(
                        &session,
                        Command::SaleProcess {
                            cart: vec![CartLine { item_id: item, quantity: 3 }],
                            payment: rp(100_000),
                        },
                    );
                    match result {
                        Ok(_) => 1,
                        Err(Error::InsufficientStock { .. }) => 0,
                        Err(other) => panic!("unexpected error: {other}"),
                    }
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });

    assert_eq!(sold, 3);
    assert_eq!(niaga.stock().get(item).unwrap().current_stock, 1);
    assert_eq!(niaga.sales().list(None, None).unwrap().len(), 3);
    let movements = niaga.stock().movements(item).unwrap();
    assert_eq!(movements.len(), 4);
    assert_eq!(movements[0].kind, MovementKind::In);
    assert_eq!(
        movements
            .iter()
            .filter(|m| m.kind == MovementKind::Sale)
            .count(),
        3
    );
}
