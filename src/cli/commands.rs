//! Command execution
//!
//! Each invocation loads the data directory into a fresh ledger, runs one
//! command, and saves the ledger back if the command changed it. A mutating
//! command is refused when the load skipped records, unless `--repair` is set.

use super::args::{CliArgs, Command};
use crate::core::{Ledger, ScanConfig};
use crate::io::{
    append_from_file, export_to_dir, export_to_file, history_to_files, merge_from_dir, DumpFormat,
    ImportSummary,
};
use crate::types::{Account, AccountId, Favorite, LedgerError, Money, Payment};
use rust_decimal::Decimal;
use std::io::Write;
use tracing::{debug, warn};

/// Run the parsed command line, writing results to `output`
pub fn run(args: &CliArgs, output: &mut dyn Write) -> Result<(), LedgerError> {
    let config = args.scan_config();
    let mut ledger = Ledger::new();

    let summary = if args.data_dir.is_dir() {
        let summary = merge_from_dir(&mut ledger, &args.data_dir, args.format);
        debug!(?summary, "loaded data directory");
        summary
    } else {
        debug!(dir = %args.data_dir.display(), "no data directory yet, starting empty");
        ImportSummary::default()
    };

    if args.command.is_mutating() && !summary.is_complete() {
        if !args.repair {
            return Err(LedgerError::IncompleteLoad {
                skipped: summary.skipped,
                unreadable_files: summary.unreadable_files.len(),
            });
        }
        warn!(
            skipped = summary.skipped,
            unreadable = summary.unreadable_files.len(),
            "repairing data directory, records that failed to load will be dropped"
        );
    }

    execute(&mut ledger, &args.command, config, args.format, output)?;

    if args.command.is_mutating() {
        export_to_dir(&ledger, &args.data_dir, args.format)?;
    }
    Ok(())
}

fn execute(
    ledger: &mut Ledger,
    command: &Command,
    config: ScanConfig,
    format: DumpFormat,
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    match command {
        Command::Register { phone } => {
            let account = ledger.register_account(phone)?;
            write_account(output, &account)?;
        }
        Command::Deposit { account_id, amount } => {
            ledger.deposit(*account_id, *amount)?;
            write_account(output, ledger.find_account_by_id(*account_id)?)?;
        }
        Command::Pay {
            account_id,
            amount,
            category,
        } => {
            let payment = ledger.pay(*account_id, *amount, category)?;
            write_payment(output, &payment)?;
        }
        Command::Reject { payment_id } => {
            ledger.reject(payment_id)?;
            let payment = ledger.find_payment_by_id(payment_id)?;
            write_payment(output, payment)?;
        }
        Command::Repeat { payment_id } => {
            let payment = ledger.repeat(payment_id)?;
            write_payment(output, &payment)?;
        }
        Command::Favorite { payment_id, name } => {
            let favorite = ledger.favorite_payment(payment_id, name)?;
            write_favorite(output, &favorite)?;
        }
        Command::PayFavorite { favorite_id } => {
            let payment = ledger.pay_from_favorite(favorite_id)?;
            write_payment(output, &payment)?;
        }
        Command::Account { account_id } => {
            write_account(output, ledger.find_account_by_id(*account_id)?)?;
        }
        Command::Sum => {
            let total = ledger.sum_payments(config.workers)?;
            writeln!(output, "total {} ({})", total, major_units(total))?;
        }
        Command::Payments { account, category } => {
            let payments = select_payments(ledger, *account, category.clone(), config)?;
            for payment in &payments {
                write_payment(output, payment)?;
            }
            writeln!(output, "{} payments", payments.len())?;
        }
        Command::History {
            account_id,
            out,
            records,
        } => {
            let payments = ledger.filter_payments(*account_id, config.workers)?;
            for path in history_to_files(&payments, out, *records, format)? {
                writeln!(output, "wrote {}", path.display())?;
            }
        }
        Command::ExportFile { path } => {
            export_to_file(ledger, path, format)?;
            writeln!(
                output,
                "exported {} accounts to {}",
                ledger.accounts().len(),
                path.display()
            )?;
        }
        Command::ImportFile { path } => {
            let appended = append_from_file(ledger, path, format)?;
            writeln!(output, "imported {} accounts from {}", appended, path.display())?;
        }
    }
    Ok(())
}

fn select_payments(
    ledger: &Ledger,
    account: Option<AccountId>,
    category: Option<String>,
    config: ScanConfig,
) -> Result<Vec<Payment>, LedgerError> {
    match (account, category) {
        (Some(account_id), None) => ledger.filter_payments(account_id, config.workers),
        (Some(account_id), Some(category)) => {
            let mut payments = ledger.filter_payments(account_id, config.workers)?;
            payments.retain(|payment| payment.category == category);
            Ok(payments)
        }
        (None, Some(category)) => {
            ledger.filter_payments_by_fn(move |payment| payment.category == category, config.workers)
        }
        (None, None) => ledger.filter_payments_by_fn(|_| true, config.workers),
    }
}

/// Minor units rendered as a two-decimal amount
fn major_units(amount: Money) -> Decimal {
    Decimal::new(amount, 2)
}

fn write_account(output: &mut dyn Write, account: &Account) -> Result<(), LedgerError> {
    writeln!(
        output,
        "account {} phone {} balance {} ({})",
        account.id,
        account.phone,
        account.balance,
        major_units(account.balance)
    )?;
    Ok(())
}

fn write_payment(output: &mut dyn Write, payment: &Payment) -> Result<(), LedgerError> {
    writeln!(
        output,
        "payment {} account {} amount {} ({}) category {} status {}",
        payment.id,
        payment.account_id,
        payment.amount,
        major_units(payment.amount),
        payment.category,
        payment.status
    )?;
    Ok(())
}

fn write_favorite(output: &mut dyn Write, favorite: &Favorite) -> Result<(), LedgerError> {
    writeln!(
        output,
        "favorite {} name {} account {} amount {} ({}) category {}",
        favorite.id,
        favorite.name,
        favorite.account_id,
        favorite.amount,
        major_units(favorite.amount),
        favorite.category
    )?;
    Ok(())
}
