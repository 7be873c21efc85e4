//! JSON HTTP API for niaga.
//!
//! A thin axum layer over [`Executor`]: every route turns its request into
//! a [`Command`](niaga_executor::Command), runs it in the caller's
//! [`Session`](niaga_executor::Session) and returns the [`Output`] as
//! JSON. Rendered documents come back with their own content type.
//!
//! ```text
//! GET  /health
//! POST /api/login                     {"username": .., "password": ..}
//! POST /api/logout                    Authorization: Bearer <token>
//! POST /api/execute                   Command JSON
//! GET  /api/pos/search?q=
//! GET  /api/savings/balance/:name
//! GET  /api/documents/:kind/:id
//! GET  /api/documents/price-list
//! GET  /api/reports?start=&end=
//! ```
//!
//! [`Output`]: niaga_executor::Output

#![warn(missing_docs)]

pub mod error;
mod routes;
pub mod sessions;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use niaga_executor::Executor;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::ApiError;
pub use sessions::SessionStore;

const PURGE_INTERVAL: Duration = Duration::from_secs(60);

/// Shared state of every handler
#[derive(Clone)]
pub struct AppState {
    /// Command executor over the open database
    pub executor: Arc<Executor>,
    /// Bearer-token sessions
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    /// State with sessions living `session_ttl` past their last use
    pub fn new(executor: Arc<Executor>, session_ttl: Duration) -> Self {
        Self {
            executor,
            sessions: Arc::new(SessionStore::new(session_ttl)),
        }
    }
}

/// All routes with request tracing
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/api/login", post(routes::login))
        .route("/api/logout", post(routes::logout))
        .route("/api/execute", post(routes::execute))
        .route("/api/pos/search", get(routes::pos_search))
        .route("/api/savings/balance/:name", get(routes::savings_balance))
        .route("/api/documents/price-list", get(routes::price_list))
        .route("/api/documents/:kind/:id", get(routes::document))
        .route("/api/reports", get(routes::report))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Listen on `addr` until the process is stopped
pub async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            sessions.purge_expired();
        }
    });

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "niaga server listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
