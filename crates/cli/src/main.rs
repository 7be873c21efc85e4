//! `niaga` command-line shell.
//!
//! ```text
//! niaga --data-dir ./toko init
//! niaga --data-dir ./toko --user admin --password admin123 exec '{"command":"Dashboard"}'
//! niaga --data-dir ./toko            # interactive shell
//! ```

mod format;
mod repl;
mod verbs;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use niaga_engine::{Database, NiagaConfig};
use niaga_executor::{AccessMode, Command, Niaga, OpenOptions};
use niaga_primitives::Savings;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "niaga", version, about = "Shell for niaga shop databases")]
struct Cli {
    /// Database directory
    #[arg(long, env = "NIAGA_DATA_DIR", default_value = "niaga-data")]
    data_dir: PathBuf,

    /// Open without allowing writes
    #[arg(long)]
    read_only: bool,

    /// Log in as this user before running the command
    #[arg(long, short)]
    user: Option<String>,

    /// Password for --user
    #[arg(long, env = "NIAGA_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Option<Sub>,
}

#[derive(Subcommand, Debug)]
enum Sub {
    /// Create the directory, niaga.toml and the default admin account
    Init,
    /// Run one command given as JSON and print the JSON result
    Exec {
        /// e.g. '{"command":"SaverList"}'
        json: String,
    },
    /// Interactive shell (default)
    Repl,
    /// Recover the database and verify the savings ledger
    Check,
    /// Write a snapshot and truncate the write-ahead log
    Checkpoint,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Sub::Init) => init(&cli.data_dir),
        Some(Sub::Exec { ref json }) => exec(&cli, json),
        Some(Sub::Check) => check(&cli.data_dir),
        Some(Sub::Checkpoint) => checkpoint(&cli.data_dir),
        Some(Sub::Repl) | None => {
            let niaga = open(&cli)?;
            repl::run(&niaga, &cli.data_dir)
        }
    }
}

fn open(cli: &Cli) -> anyhow::Result<Niaga> {
    let mode = if cli.read_only {
        AccessMode::ReadOnly
    } else {
        AccessMode::ReadWrite
    };
    let niaga = Niaga::open_with(&cli.data_dir, OpenOptions::new().access_mode(mode))
        .with_context(|| format!("opening {}", cli.data_dir.display()))?;

    match (&cli.user, &cli.password) {
        (Some(user), Some(password)) => {
            niaga.login(user, password).context("login failed")?;
        }
        (Some(_), None) => bail!("--user needs --password (or NIAGA_PASSWORD)"),
        _ => {}
    }
    Ok(niaga)
}

fn init(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    if NiagaConfig::write_default(dir)? {
        println!("wrote {}", dir.join(niaga_engine::CONFIG_FILE).display());
    }
    let niaga = Niaga::open(dir)?;
    let stats = niaga.database().stats();
    println!(
        "database ready at {} (version {}, {} rows)",
        dir.display(),
        stats.version,
        stats.rows
    );
    Ok(())
}

fn exec(cli: &Cli, json: &str) -> anyhow::Result<()> {
    let cmd: Command = serde_json::from_str(json).context("parsing command JSON")?;
    let niaga = open(cli)?;
    match niaga.execute(cmd) {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(err) => {
            println!("{}", serde_json::to_string_pretty(&err)?);
            bail!("{}", err)
        }
    }
}

/// Maintenance commands work on the files directly and need no login.
fn open_local(dir: &Path) -> anyhow::Result<Arc<Database>> {
    if !dir.exists() {
        bail!("{} does not exist; run `niaga init` first", dir.display());
    }
    let db = Database::open(dir).with_context(|| format!("opening {}", dir.display()))?;
    debug!(dir = %dir.display(), version = db.recovery_info().version, "maintenance open");
    Ok(Arc::new(db))
}

fn check(dir: &Path) -> anyhow::Result<()> {
    let db = open_local(dir)?;
    let info = db.recovery_info();
    println!("version:          {}", info.version);
    match info.snapshot_version {
        Some(v) => println!("snapshot:         v{} ({} rows)", v, info.snapshot_rows),
        None => println!("snapshot:         none"),
    }
    println!("wal replayed:     {}", info.wal_replayed);
    println!("wal skipped:      {}", info.wal_skipped);
    if info.wal_truncated_bytes > 0 {
        println!("wal truncated:    {} bytes", info.wal_truncated_bytes);
    }

    let mismatches = Savings::new(db).verify_ledger()?;
    if mismatches.is_empty() {
        println!("savings ledger:   ok");
        return Ok(());
    }
    for m in &mismatches {
        println!(
            "  saver {} ({}) entry {}: recorded {}, expected {}",
            m.saver_id, m.saver_name, m.entry_id, m.recorded, m.expected
        );
    }
    bail!("savings ledger has {} inconsistent entries", mismatches.len())
}

fn checkpoint(dir: &Path) -> anyhow::Result<()> {
    let db = open_local(dir)?;
    let info = db.checkpoint()?;
    println!(
        "checkpoint at version {}: {} rows, {} bytes",
        info.version, info.rows, info.bytes
    );
    Ok(())
}
