use crate::core::ScanConfig;
use crate::io::DumpFormat;
use crate::types::{AccountId, Money};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Wallet ledger with partitioned payment scans and flat-file dumps
#[derive(Parser, Debug)]
#[command(name = "wallet")]
#[command(about = "Wallet ledger with partitioned payment scans and flat-file dumps", long_about = None)]
pub struct CliArgs {
    /// Directory holding accounts.dump, payments.dump and favorites.dump
    #[arg(
        long = "data-dir",
        value_name = "DIR",
        env = "WALLET_DATA_DIR",
        default_value = "wallet-data",
        help = "Data directory the ledger is loaded from and saved to"
    )]
    pub data_dir: PathBuf,

    /// Number of scan workers
    #[arg(
        long = "workers",
        value_name = "N",
        env = "WALLET_SCAN_WORKERS",
        help = "Number of workers for payment scans (default: CPU cores)"
    )]
    pub workers: Option<usize>,

    /// Dump format used for every read and write
    #[arg(
        long = "format",
        value_name = "FORMAT",
        env = "WALLET_DUMP_FORMAT",
        default_value = "escaped",
        help = "Dump format: 'escaped' quotes special fields, 'legacy' writes raw fields"
    )]
    pub format: DumpFormat,

    /// Save even if records of the data directory failed to load
    #[arg(
        long = "repair",
        help = "Allow a mutating command to rewrite a data directory whose records did not all load, dropping them"
    )]
    pub repair: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Ledger commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Register a new account for a phone number
    Register { phone: String },

    /// Deposit minor units into an account
    Deposit {
        account_id: AccountId,
        #[arg(allow_negative_numbers = true)]
        amount: Money,
    },

    /// Pay minor units from an account
    Pay {
        account_id: AccountId,
        #[arg(allow_negative_numbers = true)]
        amount: Money,
        category: String,
    },

    /// Reject a payment and refund its amount
    Reject { payment_id: String },

    /// Pay again with the account, amount and category of a payment
    Repeat { payment_id: String },

    /// Save a payment as a named favorite
    Favorite { payment_id: String, name: String },

    /// Pay using a saved favorite
    PayFavorite { favorite_id: String },

    /// Show an account
    Account { account_id: AccountId },

    /// Sum of all payment amounts
    Sum,

    /// List payments, optionally by account and/or category
    Payments {
        #[arg(long)]
        account: Option<AccountId>,
        #[arg(long)]
        category: Option<String>,
    },

    /// Export the payments of an account into chunked dump files
    History {
        account_id: AccountId,
        #[arg(long, value_name = "DIR")]
        out: PathBuf,
        #[arg(long, value_name = "N", default_value_t = 100)]
        records: usize,
    },

    /// Write all accounts into a single dump file
    ExportFile { path: PathBuf },

    /// Append all accounts of a single dump file
    ImportFile { path: PathBuf },
}

impl Command {
    /// Whether the ledger must be saved back to the data directory afterwards
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Command::Register { .. }
                | Command::Deposit { .. }
                | Command::Pay { .. }
                | Command::Reject { .. }
                | Command::Repeat { .. }
                | Command::Favorite { .. }
                | Command::PayFavorite { .. }
                | Command::ImportFile { .. }
        )
    }
}

impl CliArgs {
    /// Create a ScanConfig from CLI arguments
    ///
    /// Falls back to the CPU count when `--workers` is absent; a value of 0 is
    /// normalized (with a warning) by `ScanConfig::new`.
    pub fn scan_config(&self) -> ScanConfig {
        self.workers.map(ScanConfig::new).unwrap_or_default()
    }
}
