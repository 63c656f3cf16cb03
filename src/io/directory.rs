//! Directory dump mode
//!
//! A data directory holds one newline-separated dump file per entity:
//!
//! ```text
//! <dir>/accounts.dump    id;phone;balance
//! <dir>/payments.dump    id;accountID;amount;category;status
//! <dir>/favorites.dump   id;accountID;name;amount;category
//! ```
//!
//! Export is all-or-error: the first failed write aborts the remaining
//! entities. Import is lenient: missing files and malformed records are logged
//! and counted, everything else is merged into the ledger by id.

use crate::core::{Ledger, MergeOutcome};
use crate::io::dump_format::{
    encode_records, DumpFormat, DumpRecord, RecordLayout, ACCOUNTS_FILE, FAVORITES_FILE,
    PAYMENTS_FILE,
};
use crate::io::dump_reader::DumpReader;
use crate::types::{Account, Favorite, LedgerError, Payment};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Counters reported by [`merge_from_dir`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Records whose id was new to the ledger
    pub inserted: usize,
    /// Records that overwrote an existing entity with the same id
    pub updated: usize,
    /// Malformed or refused records that were logged and ignored
    pub skipped: usize,
    /// Dump files that were absent
    pub missing_files: Vec<PathBuf>,
    /// Dump files that exist but could not be opened
    pub unreadable_files: Vec<PathBuf>,
}

impl ImportSummary {
    /// Whether every existing record of the directory made it into the ledger
    ///
    /// Saving over an incomplete import would delete the records left behind.
    pub fn is_complete(&self) -> bool {
        self.skipped == 0 && self.unreadable_files.is_empty()
    }
}

/// Write every non-empty collection of `ledger` into `dir`
///
/// The directory is created if missing. A collection with no elements
/// produces no file. All collections are encoded before the first write, so
/// an `UnencodableField` leaves the directory untouched.
pub fn export_to_dir(ledger: &Ledger, dir: &Path, format: DumpFormat) -> Result<(), LedgerError> {
    let dumps = [
        (ACCOUNTS_FILE, encode_dump(ledger.accounts(), format)?),
        (PAYMENTS_FILE, encode_dump(ledger.payments(), format)?),
        (FAVORITES_FILE, encode_dump(ledger.favorites(), format)?),
    ];

    fs::create_dir_all(dir)?;
    for (name, bytes) in dumps {
        if let Some(bytes) = bytes {
            write_bytes(&dir.join(name), bytes)?;
        }
    }

    info!(
        dir = %dir.display(),
        %format,
        accounts = ledger.accounts().len(),
        payments = ledger.payments().len(),
        favorites = ledger.favorites().len(),
        "exported ledger"
    );
    Ok(())
}

/// Encoded file content, or `None` for an empty collection
fn encode_dump<T: DumpRecord>(records: &[T], format: DumpFormat) -> Result<Option<Vec<u8>>, LedgerError> {
    if records.is_empty() {
        debug!(kind = T::KIND, "nothing to write");
        return Ok(None);
    }
    encode_records(records, format, RecordLayout::Lines).map(Some)
}

fn write_bytes(path: &Path, bytes: Vec<u8>) -> Result<(), LedgerError> {
    fs::write(path, bytes).map_err(|e| LedgerError::Io {
        message: format!("Failed to write '{}': {}", path.display(), e),
    })
}

/// Merge the dump files of `dir` into `ledger`
///
/// Accounts, payments and favorites are imported in that order. A record
/// whose id already exists overwrites the other fields of that entity;
/// any other record is appended.
pub fn merge_from_dir(ledger: &mut Ledger, dir: &Path, format: DumpFormat) -> ImportSummary {
    let mut summary = ImportSummary::default();

    import_dump(&dir.join(ACCOUNTS_FILE), format, &mut summary, |account: Account| {
        ledger.merge_account(account)
    });
    import_dump(&dir.join(PAYMENTS_FILE), format, &mut summary, |payment: Payment| {
        ledger.merge_payment(payment)
    });
    import_dump(&dir.join(FAVORITES_FILE), format, &mut summary, |favorite: Favorite| {
        ledger.merge_favorite(favorite)
    });

    info!(
        dir = %dir.display(),
        inserted = summary.inserted,
        updated = summary.updated,
        skipped = summary.skipped,
        missing = summary.missing_files.len(),
        unreadable = summary.unreadable_files.len(),
        "imported ledger"
    );
    summary
}

fn import_dump<T, F>(path: &Path, format: DumpFormat, summary: &mut ImportSummary, mut apply: F)
where
    T: DumpRecord,
    F: FnMut(T) -> MergeOutcome,
{
    let reader = match DumpReader::<T, _>::open(path, format, RecordLayout::Lines) {
        Ok(reader) => reader,
        Err(error) if path.exists() => {
            warn!(path = %path.display(), kind = T::KIND, %error, "skipping unreadable dump file");
            summary.unreadable_files.push(path.to_path_buf());
            return;
        }
        Err(_) => {
            warn!(path = %path.display(), kind = T::KIND, "dump file missing");
            summary.missing_files.push(path.to_path_buf());
            return;
        }
    };

    for result in reader {
        let outcome = match result {
            Ok(record) => apply(record),
            Err(error) => MergeOutcome::Rejected(error),
        };
        match outcome {
            MergeOutcome::Inserted => summary.inserted += 1,
            MergeOutcome::Updated => summary.updated += 1,
            MergeOutcome::Rejected(error) => {
                warn!(path = %path.display(), kind = T::KIND, %error, "skipping record");
                summary.skipped += 1;
            }
        }
    }
}

/// Write a payment history into `dir`, at most `records` payments per file
///
/// If all payments fit, they go to `payments.dump`; otherwise consecutive
/// chunks go to `payments1.dump`, `payments2.dump`, ... with only the last
/// chunk allowed to be shorter. An empty history writes nothing.
///
/// Returns the written paths in chunk order.
///
/// # Errors
///
/// `InvalidRecordsPerFile` if `records` is 0, `Io` or `UnencodableField` on
/// the first failed write.
pub fn history_to_files(
    payments: &[Payment],
    dir: &Path,
    records: usize,
    format: DumpFormat,
) -> Result<Vec<PathBuf>, LedgerError> {
    if records == 0 {
        return Err(LedgerError::InvalidRecordsPerFile { records });
    }
    if payments.is_empty() {
        return Ok(Vec::new());
    }

    fs::create_dir_all(dir)?;

    if payments.len() <= records {
        let path = dir.join(PAYMENTS_FILE);
        write_bytes(&path, encode_records(payments, format, RecordLayout::Lines)?)?;
        return Ok(vec![path]);
    }

    let mut written = Vec::new();
    for (index, chunk) in payments.chunks(records).enumerate() {
        let path = dir.join(format!("payments{}.dump", index + 1));
        write_bytes(&path, encode_records(chunk, format, RecordLayout::Lines)?)?;
        written.push(path);
    }

    info!(dir = %dir.display(), files = written.len(), "exported payment history");
    Ok(written)
}
