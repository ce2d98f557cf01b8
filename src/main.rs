//! `fibheap` — drive a Fibonacci heap from the terminal or a script.
//!
//! Reads one command per line (`insert 5`, `min`, `extract`, `decrease 5 2`,
//! `delete 5`, `roots`, `len`, `check`, `help`, `quit`). Blank lines and lines
//! starting with `#` are ignored. Logs go to stderr; set `RUST_LOG` to
//! override `--log-level`.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fibheap_engine::cli::{Command, Outcome, Session, HELP};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "fibheap",
    version,
    about = "Interactive Fibonacci heap over integer keys"
)]
struct Args {
    /// Read commands from this file instead of stdin
    #[arg(long, short)]
    script: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Log output format ("text" or "json")
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Do not print the prompt or banner
    #[arg(long, short)]
    quiet: bool,
}

fn init_tracing(level: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(io::stderr))
            .init();
    }
}

fn run(input: impl BufRead, interactive: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut session = Session::new();

    if interactive {
        writeln!(out, "===== Fibonacci Heap =====\n{HELP}")?;
    }

    let mut lines = input.lines();
    loop {
        if interactive {
            write!(out, "> ")?;
            out.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("failed to read command")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                warn!(%line, "rejected command");
                writeln!(out, "Invalid command: {err}")?;
                continue;
            }
        };
        match session.execute(command) {
            Outcome::Continue(message) => writeln!(out, "{message}")?,
            Outcome::Quit(message) => {
                writeln!(out, "{message}")?;
                return Ok(());
            }
        }
    }

    let released = session.dispose();
    info!(released, "input exhausted");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level, &args.log_format);

    match &args.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            info!(script = %path.display(), "running script");
            run(BufReader::new(file), false)
        }
        None => {
            let stdin = io::stdin();
            run(stdin.lock(), !args.quiet)
        }
    }
}
