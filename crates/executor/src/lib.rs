//! Command execution layer for niaga.
//!
//! Every surface (the typed [`Niaga`] API, the CLI and the HTTP server)
//! speaks the same protocol: a [`Command`] goes in, an [`Output`] or an
//! [`Error`] comes out. The [`Executor`] owns authorization and the
//! read-only guard; a [`Session`] remembers who logged in.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌──────────────┐
//! │  Niaga   │   │   CLI    │   │ HTTP server  │
//! └────┬─────┘   └────┬─────┘   └──────┬───────┘
//!      └──────────────┼────────────────┘
//!                     ▼
//!               ┌──────────┐
//!               │ Session  │  current user
//!               └────┬─────┘
//!                    ▼
//!               ┌──────────┐
//!               │ Executor │  access check, dispatch
//!               └────┬─────┘
//!                    ▼
//!     ┌─────────────────────────────────┐
//!     │ primitives + documents + engine │
//!     └─────────────────────────────────┘
//! ```
//!
//! Commands and outputs are serde types, so the same JSON works from the
//! REPL's `json` verb and from `POST /api/execute`.

#![warn(missing_docs)]

pub mod api;
mod bridge;
pub mod command;
mod convert;
pub mod error;
mod executor;
mod handlers;
pub mod output;
mod session;

pub use api::{Debts, Documents, Invoices, Niaga, Products, Reports, Sales, Savers, Stock, Users};
pub use command::Command;
pub use error::{Error, Result};
pub use executor::Executor;
pub use output::Output;
pub use session::Session;

pub use niaga_documents::Document;
pub use niaga_security::{Access, AccessMode, OpenOptions};
