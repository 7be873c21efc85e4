//! Business flow tests
//!
//! End-to-end scenarios through the public `niaga` API: a shop day at the
//! till, the savings ledger, receivables, access control, durability
//! across reopen and concurrent sessions.
//!
//! ```bash
//! cargo test --test business_flows
//! ```

mod test_utils;

mod access_control;
mod concurrency;
mod durability;
mod receivables;
mod savings_ledger;
mod shop_day;
