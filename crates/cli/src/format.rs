//! Human-readable output for the shell.

use std::io::Write;
use std::path::{Path, PathBuf};

use niaga_executor::{Document, Output};

/// Print a command result. Documents are written to `out_dir` instead.
pub fn print_output(output: &Output, out_dir: &Path) -> anyhow::Result<()> {
    match output {
        Output::Unit => println!("ok"),
        Output::Pong { version } => println!("pong (niaga {})", version),
        Output::Count(n) => println!("{}", n),
        Output::Amount(amount) => println!("{}", amount),
        Output::Id(id) => println!("{}", id),
        Output::MaybeUser(None) => println!("not logged in"),
        Output::MaybeUser(Some(user)) | Output::User(user) => {
            println!("{} <{}> {}", user.username, user.email, user.role)
        }
        Output::Document(doc) => {
            let path = write_document(doc, out_dir)?;
            println!("wrote {}", path.display());
        }
        other => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            serde_json::to_writer_pretty(&mut lock, other)?;
            writeln!(lock)?;
        }
    }
    Ok(())
}

/// Write a rendered document under its suggested file name.
pub fn write_document(doc: &Document, out_dir: &Path) -> anyhow::Result<PathBuf> {
    let path = out_dir.join(&doc.file_name);
    std::fs::write(&path, doc.body.as_bytes())?;
    Ok(path)
}
