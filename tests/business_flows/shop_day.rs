//! A day at the till: stock in, sales, stock take, reports

use crate::test_utils::*;
use niaga::{CartLine, Error, MovementKind, StockAction};

#[test]
fn sales_move_stock_and_feed_reports() {
    let clock = clock(at(2025, 8, 3, 9));
    let niaga = shop_at(clock.clone());
    let kopi = stocked_item(&niaga, "Kopi Bubuk", "KOPI-01", 3_000, 5_000, 20, 5);
    let gula = stocked_item(&niaga, "Gula Pasir", "GULA-01", 12_000, 11_000, 10, 3);

    let first = niaga
        .sales()
        .process(vec![CartLine { item_id: kopi, quantity: 4 }], rp(50_000))
        .unwrap();
    assert_eq!(first.total, rp(20_000));
    assert_eq!(first.profit, rp(8_000));
    assert_eq!(first.change, rp(30_000));

    // sold below cost
    let second = niaga
        .sales()
        .process(vec![CartLine { item_id: gula, quantity: 2 }], rp(22_000))
        .unwrap();
    assert_eq!(second.profit, rp(-2_000));
    assert_eq!(second.change, rp(0));

    clock.set(at(2025, 8, 4, 10));
    niaga
        .sales()
        .process(vec![CartLine { item_id: kopi, quantity: 1 }], rp(5_000))
        .unwrap();

    let report = niaga.reports().period(day(2025, 8, 3), day(2025, 8, 3)).unwrap();
    assert_eq!(report.revenue, rp(42_000));
    // net of the kopi gain and the gula loss
    assert_eq!(report.profit, rp(6_000));
    assert_eq!(report.loss, rp(2_000));
    assert_eq!(report.transactions, 2);
    assert_eq!(report.best_sellers[0].name, "Kopi Bubuk");
    assert_eq!(report.best_sellers[0].quantity, 4);
    assert_eq!(report.best_sellers[1].name, "Gula Pasir");

    let whole = niaga.reports().period(day(2025, 8, 1), day(2025, 8, 31)).unwrap();
    assert_eq!(whole.transactions, 3);
    assert_eq!(whole.best_sellers[0].quantity, 5);

    let dashboard = niaga.reports().dashboard().unwrap();
    assert_eq!(dashboard.sales, 3);
    assert_eq!(dashboard.today_revenue, rp(5_000));
    assert_eq!(niaga.sales().revenue_on(day(2025, 8, 3)).unwrap(), rp(42_000));

    assert_eq!(niaga.stock().get(kopi).unwrap().current_stock, 15);
    let movements = niaga.stock().movements(kopi).unwrap();
    assert_eq!(movements.len(), 3);
    assert_eq!(movements[0].kind, MovementKind::In);
    assert_eq!(movements[0].stock_after, 20);
    assert!(movements[1..].iter().all(|m| m.kind == MovementKind::Sale));
    assert_eq!(movements[2].stock_after, 15);
}

#[test]
fn rejected_sales_leave_no_trace() {
    let niaga = shop_at(clock(at(2025, 8, 3, 9)));
    let teh = stocked_item(&niaga, "Teh Celup", "TEH-01", 4_000, 6_000, 3, 1);
    let roti = stocked_item(&niaga, "Roti Tawar", "ROTI-01", 10_000, 14_000, 5, 1);

    let err = niaga
        .sales()
        .process(
            vec![
                CartLine { item_id: roti, quantity: 1 },
                CartLine { item_id: teh, quantity: 4 },
            ],
            rp(100_000),
        )
        .unwrap_err();
    assert_eq!(
        err,
        Error::InsufficientStock {
            item: "TEH-01".into(),
            available: 3,
            requested: 4,
        }
    );

    let err = niaga
        .sales()
        .process(vec![CartLine { item_id: roti, quantity: 2 }], rp(27_000))
        .unwrap_err();
    assert_eq!(err.code(), "insufficient_payment");

    assert_eq!(niaga.stock().get(roti).unwrap().current_stock, 5);
    assert_eq!(niaga.stock().get(teh).unwrap().current_stock, 3);
    // only the opening stock
    let movements = niaga.stock().movements(roti).unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].kind, MovementKind::In);
    assert!(niaga
        .stock()
        .movements(teh)
        .unwrap()
        .iter()
        .all(|m| m.kind != MovementKind::Sale));
    assert!(niaga.sales().list(None, None).unwrap().is_empty());
}

#[test]
fn stock_take_and_low_stock() {
    let niaga = shop_at(clock(at(2025, 8, 3, 9)));
    let beras = stocked_item(&niaga, "Beras 5kg", "BRS-05", 60_000, 68_000, 12, 4);

    let change = niaga
        .stock()
        .adjust(beras, StockAction::Subtract, 9, "rusak")
        .unwrap();
    assert_eq!(change.item.current_stock, 3);
    assert_eq!(niaga.stock().low_stock().unwrap().len(), 1);

    niaga
        .stock()
        .adjust(beras, StockAction::Set, 20, "stock opname")
        .unwrap();
    assert!(niaga.stock().low_stock().unwrap().is_empty());
    assert_eq!(niaga.stock().value().unwrap(), rp(1_200_000));

    let err = niaga
        .stock()
        .adjust(beras, StockAction::Subtract, 21, "")
        .unwrap_err();
    assert_eq!(err.code(), "insufficient_stock");

    let hits = niaga.stock().search("beras").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].item.id, beras);
}

#[test]
fn receipts_render_from_recorded_sales() {
    let niaga = shop_at(clock(at(2025, 8, 3, 9)));
    let kopi = stocked_item(&niaga, "Kopi Bubuk", "KOPI-01", 3_000, 5_000, 20, 5);
    let sale = niaga
        .sales()
        .process(vec![CartLine { item_id: kopi, quantity: 2 }], rp(10_000))
        .unwrap();

    let receipt = niaga.documents().sale_receipt(sale.id).unwrap();
    assert!(!receipt.is_html());
    assert!(receipt.body.contains("Kopi Bubuk"));
    assert!(receipt.body.contains("Rp 10.000"));
    assert!(receipt.file_name.contains("20250803"));

    let report = niaga
        .documents()
        .report(day(2025, 8, 1), day(2025, 8, 31))
        .unwrap();
    assert!(report.is_html());
    assert!(report.file_name.starts_with("laporan_"));
}
