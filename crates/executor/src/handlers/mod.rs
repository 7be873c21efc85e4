//! Command handlers, one module per domain.
//!
//! Handlers are plain functions over [`Primitives`](crate::bridge::Primitives).
//! Authorization has already happened when a handler runs; handlers only
//! translate arguments and results.

pub mod accounts;
pub mod cashier;
pub mod catalog;
pub mod debts;
pub mod documents;
pub mod inventory;
pub mod invoices;
pub mod reports;
pub mod savings;
pub mod settings;
pub mod system;

use niaga_core::model::UserProfile;

use crate::{Error, Result};

/// Id of the acting user, recorded as `created_by` where records keep it
pub(crate) fn actor_id(actor: Option<&UserProfile>) -> Option<u64> {
    actor.map(|a| a.id)
}

/// The acting user, for commands that cannot run anonymously
pub(crate) fn require_actor(actor: Option<&UserProfile>) -> Result<&UserProfile> {
    actor.ok_or(Error::Unauthenticated)
}
