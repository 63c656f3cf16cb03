//! Wallet ledger CLI
//!
//! Command-line interface over a wallet ledger persisted in a data directory.
//!
//! # Usage
//!
//! ```bash
//! wallet register +992000000001
//! wallet deposit 1 100000
//! wallet pay 1 10000 auto
//! wallet --workers 4 payments --category auto
//! wallet history 1 --out history --records 3
//! RUST_LOG=debug wallet --data-dir /var/lib/wallet sum
//! ```
//!
//! Results go to stdout, logs to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (unknown account, not enough balance, unwritable data directory, etc.)

use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wallet_ledger::cli;

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = cli::parse_args();

    let mut output = std::io::stdout();
    if let Err(e) = cli::run(&args, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
