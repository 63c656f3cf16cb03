//! Streaming dump reader with iterator interface
//!
//! Provides an iterator over typed records of one dump file. Format concerns
//! are delegated to the dump_format module.
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, permission denied) are returned from `open()`
//! - Each malformed record is yielded as an `Err` carrying its 1-based record
//!   number, and iteration continues with the next record
//! - An I/O error while reading ends the iteration after it is yielded
//!
//! ```no_run
//! use wallet_ledger::io::dump_format::{DumpFormat, RecordLayout};
//! use wallet_ledger::io::dump_reader::DumpReader;
//! use wallet_ledger::types::Account;
//! use std::path::Path;
//!
//! let reader: DumpReader<Account, _> =
//!     DumpReader::open(Path::new("accounts.dump"), DumpFormat::Escaped, RecordLayout::Lines)
//!         .unwrap();
//! for result in reader {
//!     match result {
//!         Ok(account) => println!("{:?}", account),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```

use crate::io::dump_format::{reader_builder, DumpFormat, DumpRecord, RecordLayout};
use crate::types::LedgerError;
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::marker::PhantomData;
use std::path::Path;

/// Dump reader yielding records of type `T`
#[derive(Debug)]
pub struct DumpReader<T, R> {
    reader: csv::Reader<R>,
    record: StringRecord,
    record_num: u64,
    finished: bool,
    _record: PhantomData<T>,
}

impl<T: DumpRecord> DumpReader<T, File> {
    /// Open a dump file for streaming iteration
    pub fn open(path: &Path, format: DumpFormat, layout: RecordLayout) -> Result<Self, LedgerError> {
        let file = File::open(path).map_err(|e| LedgerError::Io {
            message: format!("Failed to open '{}': {}", path.display(), e),
        })?;

        Ok(Self::from_reader(file, format, layout))
    }
}

impl<T: DumpRecord, R: Read> DumpReader<T, R> {
    /// Read records from any byte source
    pub fn from_reader(source: R, format: DumpFormat, layout: RecordLayout) -> Self {
        Self {
            reader: reader_builder(format, layout).from_reader(source),
            record: StringRecord::new(),
            record_num: 0,
            finished: false,
            _record: PhantomData,
        }
    }

    fn decode(&self) -> Result<T, LedgerError> {
        let record_num = Some(self.record_num);

        if self.record.len() != T::FIELD_COUNT {
            return Err(LedgerError::parse(
                record_num,
                format!(
                    "{} record has {} fields, expected {}",
                    T::KIND,
                    self.record.len(),
                    T::FIELD_COUNT
                ),
            ));
        }

        let value: T = self
            .record
            .deserialize(None)
            .map_err(|e| LedgerError::parse(record_num, format!("{} record: {}", T::KIND, e)))?;
        value
            .validate()
            .map_err(|message| LedgerError::parse(record_num, message))?;

        Ok(value)
    }
}

impl<T: DumpRecord, R: Read> Iterator for DumpReader<T, R> {
    type Item = Result<T, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.reader.read_record(&mut self.record) {
            Ok(false) => {
                self.finished = true;
                None
            }
            Ok(true) => {
                self.record_num += 1;
                Some(self.decode())
            }
            Err(e) => {
                self.record_num += 1;
                if e.is_io_error() {
                    self.finished = true;
                }
                Some(Err(LedgerError::parse(Some(self.record_num), e.to_string())))
            }
        }
    }
}
