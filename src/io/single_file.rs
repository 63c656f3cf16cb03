//! Single-file dump mode
//!
//! The whole account list is stored in one file as `|`-joined records
//! (`id;phone;balance|id;phone;balance`) with no trailing separator.

use crate::core::Ledger;
use crate::io::dump_format::{encode_records, DumpFormat, RecordLayout};
use crate::io::dump_reader::DumpReader;
use crate::types::{Account, LedgerError};
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// Size of each read when loading a single-file dump
pub const READ_CHUNK_SIZE: usize = 4096;

/// Write all accounts of `ledger` to `path` in one write
pub fn export_to_file(ledger: &Ledger, path: &Path, format: DumpFormat) -> Result<(), LedgerError> {
    let bytes = encode_records(ledger.accounts(), format, RecordLayout::Joined)?;

    fs::write(path, bytes).map_err(|e| LedgerError::Io {
        message: format!("Failed to write '{}': {}", path.display(), e),
    })?;

    info!(path = %path.display(), accounts = ledger.accounts().len(), "exported accounts");
    Ok(())
}

/// Read the whole file in fixed-size chunks
fn read_chunked(path: &Path) -> Result<Vec<u8>, LedgerError> {
    let mut file = File::open(path).map_err(|e| LedgerError::Io {
        message: format!("Failed to open '{}': {}", path.display(), e),
    })?;

    let mut content = Vec::new();
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    loop {
        let read = file.read(&mut chunk)?;
        if read == 0 {
            break;
        }
        content.extend_from_slice(&chunk[..read]);
    }

    Ok(content)
}

/// Append every account of the dump at `path` to `ledger`
///
/// Existing accounts are kept and no id matching takes place, so duplicate
/// ids are possible. The id counter is advanced past the largest appended id.
/// Malformed records are logged and skipped.
///
/// Returns the number of appended accounts.
///
/// # Errors
///
/// `Io` if the file cannot be opened or read.
pub fn append_from_file(
    ledger: &mut Ledger,
    path: &Path,
    format: DumpFormat,
) -> Result<usize, LedgerError> {
    let content = read_chunked(path)?;

    let mut appended = 0;
    for result in DumpReader::<Account, _>::from_reader(content.as_slice(), format, RecordLayout::Joined) {
        match result {
            Ok(account) => {
                ledger.append_account(account);
                appended += 1;
            }
            Err(error) => warn!(path = %path.display(), %error, "skipping account record"),
        }
    }

    info!(path = %path.display(), appended, "imported accounts");
    Ok(appended)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_export_joins_without_trailing_separator() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wallet.dump");
        let mut ledger = Ledger::new();
        let first = ledger.register_account("+1000").unwrap();
        ledger.deposit(first.id, 100_000).unwrap();
        ledger.register_account("+2000").unwrap();

        export_to_file(&ledger, &path, DumpFormat::Escaped).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "1;+1000;100000|2;+2000;0");
    }

    #[test]
    fn test_round_trip_into_empty_ledger() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wallet.dump");
        let mut original = Ledger::new();
        original.register_account("+1000").unwrap();
        original.register_account("+2000").unwrap();
        original.deposit(2, 500).unwrap();

        export_to_file(&original, &path, DumpFormat::Legacy).unwrap();
        let mut restored = Ledger::new();
        let appended = append_from_file(&mut restored, &path, DumpFormat::Legacy).unwrap();

        assert_eq!(appended, 2);
        assert_eq!(restored.accounts(), original.accounts());
        assert_eq!(restored.register_account("+3000").unwrap().id, 3);
    }

    #[test]
    fn test_append_keeps_duplicates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wallet.dump");
        fs::write(&path, "1;+1000;5|2;+2000;6").unwrap();
        let mut ledger = Ledger::new();
        ledger.register_account("+1000").unwrap();

        append_from_file(&mut ledger, &path, DumpFormat::Escaped).unwrap();

        let ids: Vec<i64> = ledger.accounts().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 1, 2]);
        assert_eq!(ledger.last_account_id(), 2);
    }

    #[test]
    fn test_append_reads_content_larger_than_one_chunk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wallet.dump");
        let records: Vec<String> = (1..=1000).map(|i| format!("{};+{:010};{}", i, i, i * 10)).collect();
        let content = records.join("|");
        assert!(content.len() > 2 * READ_CHUNK_SIZE);
        fs::write(&path, content).unwrap();
        let mut ledger = Ledger::new();

        let appended = append_from_file(&mut ledger, &path, DumpFormat::Escaped).unwrap();

        assert_eq!(appended, 1000);
        assert_eq!(ledger.accounts()[999].balance, 10_000);
    }

    #[test]
    fn test_append_skips_malformed_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wallet.dump");
        fs::write(&path, "1;+1000;5|garbage|3;+3000;x|4;+4000;7").unwrap();
        let mut ledger = Ledger::new();

        let appended = append_from_file(&mut ledger, &path, DumpFormat::Escaped).unwrap();

        assert_eq!(appended, 2);
    }

    #[test]
    fn test_append_missing_file_is_error() {
        let dir = tempdir().unwrap();
        let mut ledger = Ledger::new();

        let result = append_from_file(&mut ledger, &dir.path().join("absent.dump"), DumpFormat::Escaped);

        assert!(matches!(result, Err(LedgerError::Io { .. })));
        assert!(ledger.accounts().is_empty());
    }
}
