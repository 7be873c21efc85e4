use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use niaga_engine::Database;
use niaga_executor::{AccessMode, Executor, OpenOptions};
use niaga_server::AppState;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "niaga-server", version, about = "JSON HTTP API for a niaga database")]
struct Args {
    /// Database directory
    #[arg(long, env = "NIAGA_DATA_DIR", default_value = "niaga-data")]
    data_dir: PathBuf,

    /// Listen address, overrides `[server] bind` in niaga.toml
    #[arg(long, env = "NIAGA_BIND")]
    bind: Option<SocketAddr>,

    /// Serve without allowing writes
    #[arg(long)]
    read_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let db = Database::open(&args.data_dir)
        .with_context(|| format!("opening {}", args.data_dir.display()))?;
    let server = db.config().server.clone();

    let mode = if args.read_only {
        AccessMode::ReadOnly
    } else {
        AccessMode::ReadWrite
    };
    let executor = Executor::open(Arc::new(db), &OpenOptions::new().access_mode(mode))?;
    let recovery = executor.database().recovery_info();
    info!(
        dir = %args.data_dir.display(),
        version = recovery.version,
        wal_replayed = recovery.wal_replayed,
        "database open"
    );

    let addr = match args.bind {
        Some(addr) => addr,
        None => server
            .bind
            .parse()
            .with_context(|| format!("invalid [server] bind '{}'", server.bind))?,
    };
    let state = AppState::new(
        Arc::new(executor),
        Duration::from_secs(server.session_ttl_secs),
    );
    niaga_server::serve(state, addr).await
}
