mod shell;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use shell::Shell;
use tracing_subscriber::EnvFilter;

/// An interactive shell for deterministic multi-tape Turing machines.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  dtm programs/palindrome.dtm
  echo 'check abba' | dtm programs/palindrome.dtm")]
struct Cli {
    /// Program file (.dtm or .json) to load before reading commands.
    program: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for every executed command).
    /// `RUST_LOG` takes precedence when set.
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut shell = Shell::new();
    if let Some(path) = &cli.program {
        shell
            .load(path)
            .with_context(|| format!("failed to load program {}", path.display()))?;
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    let prompt = atty::is(atty::Stream::Stdin);

    shell
        .run(stdin.lock(), &mut stdout, &mut stderr, prompt)
        .context("failed to communicate with the terminal")?;

    Ok(())
}

/// Logs go to stderr so they never mix with command results.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
