//! Interactive shell.

use std::path::Path;

use anyhow::Context;
use niaga_executor::{Command, Niaga};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use crate::format::print_output;
use crate::verbs;

const HISTORY_FILE: &str = ".niaga_history";

/// Read lines until `quit` or end of input.
pub fn run(niaga: &Niaga, data_dir: &Path) -> anyhow::Result<()> {
    let mut rl = Editor::<(), DefaultHistory>::new().context("creating line editor")?;
    let history = data_dir.join(HISTORY_FILE);
    let _ = rl.load_history(&history);

    println!(
        "niaga {} at {}. Type `help` for commands.",
        env!("CARGO_PKG_VERSION"),
        data_dir.display()
    );
    if niaga.database().recovery_info().wal_truncated_bytes > 0 {
        println!("note: a torn log tail was dropped during recovery, run `verify`");
    }

    loop {
        let prompt = match niaga.session().user() {
            Some(user) => format!("niaga({})> ", user.username),
            None => "niaga> ".to_string(),
        };
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);
                match line {
                    "quit" | "exit" => break,
                    "help" => {
                        print!("{}", verbs::HELP);
                        continue;
                    }
                    _ => {}
                }
                if let Err(e) = run_line(niaga, line) {
                    eprintln!("error: {:#}", e);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("error: {}", err);
                break;
            }
        }
    }

    let _ = rl.save_history(&history);
    Ok(())
}

fn run_line(niaga: &Niaga, line: &str) -> anyhow::Result<()> {
    let cmd = verbs::parse(line)?;
    let is_login = matches!(cmd, Command::Login { .. });
    let output = niaga.execute(cmd)?;
    if is_login {
        if let Some(user) = niaga.session().user() {
            println!("logged in as {} ({})", user.username, user.role);
            return Ok(());
        }
    }
    print_output(&output, Path::new("."))
}
