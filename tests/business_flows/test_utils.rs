//! Shared fixtures

use std::path::Path;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use niaga::{
    Database, FixedClock, NewItem, NewProduct, Niaga, NiagaConfig, OpenOptions, Rupiah,
    SavingsRequest,
};

pub const ADMIN: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    day(y, m, d).and_hms_opt(h, 0, 0).unwrap()
}

pub fn rp(amount: i64) -> Rupiah {
    Rupiah::new(amount)
}

/// In-memory shop on a clock the test controls, admin logged in
pub fn shop_at(clock: Arc<FixedClock>) -> Niaga {
    let db = Database::ephemeral_with_clock(clock);
    let niaga = Niaga::from_database(Arc::new(db), OpenOptions::default()).unwrap();
    niaga.login(ADMIN, ADMIN_PASSWORD).unwrap();
    niaga
}

pub fn clock(at: NaiveDateTime) -> Arc<FixedClock> {
    Arc::new(FixedClock::new(at))
}

/// On-disk shop in `dir`, admin logged in
pub fn shop_in(dir: &Path, clock: Arc<FixedClock>) -> Niaga {
    let db = Database::open_with(dir, NiagaConfig::default(), clock).unwrap();
    let niaga = Niaga::from_database(Arc::new(db), OpenOptions::default()).unwrap();
    niaga.login(ADMIN, ADMIN_PASSWORD).unwrap();
    niaga
}

/// A product with one stocked inventory item; returns the item id
pub fn stocked_item(
    niaga: &Niaga,
    name: &str,
    code: &str,
    buy: i64,
    sell: i64,
    stock: i64,
    minimum: i64,
) -> u64 {
    let product = niaga
        .products()
        .add(NewProduct {
            id: None,
            name: name.into(),
            description: String::new(),
            purchase_price: rp(buy),
            selling_price: rp(sell),
            initial_stock: 0,
        })
        .unwrap();
    niaga
        .stock()
        .add_item(NewItem {
            product_id: product.id,
            code: code.into(),
            purchase_price: rp(buy),
            selling_price: rp(sell),
            initial_stock: stock,
            minimum_stock: Some(minimum),
        })
        .unwrap()
        .id
}

pub fn savings(name: &str, amount: i64) -> SavingsRequest {
    SavingsRequest {
        saver_name: name.into(),
        amount: rp(amount),
        ..Default::default()
    }
}

pub fn savings_on(name: &str, amount: i64, date: NaiveDate) -> SavingsRequest {
    SavingsRequest {
        date: Some(date),
        ..savings(name, amount)
    }
}
