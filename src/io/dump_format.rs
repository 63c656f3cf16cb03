//! Dump record format
//!
//! This module centralizes every format concern of the `;`-separated dump
//! files:
//! - the `DumpRecord` trait binding each entity to its file and checks
//! - the two `DumpFormat`s (escaped and legacy)
//! - csv reader/writer configuration for both record layouts
//! - encoding a slice of records into the bytes written to disk
//!
//! Encoding is pure (no I/O) for easy testing.

use crate::types::{Account, Favorite, LedgerError, Payment};
use clap::ValueEnum;
use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// Separator between the fields of one record
pub const FIELD_DELIMITER: u8 = b';';

/// Separator between records in single-file mode
pub const RECORD_SEPARATOR: u8 = b'|';

/// File name of the accounts dump inside a data directory
pub const ACCOUNTS_FILE: &str = "accounts.dump";

/// File name of the payments dump inside a data directory
pub const PAYMENTS_FILE: &str = "payments.dump";

/// File name of the favorites dump inside a data directory
pub const FAVORITES_FILE: &str = "favorites.dump";

/// Characters a legacy dump cannot carry inside a field
const LEGACY_FORBIDDEN: [char; 4] = [';', '|', '\r', '\n'];

/// How field values are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DumpFormat {
    /// csv-style quoting for fields containing separators or quotes
    ///
    /// Clean data is byte-identical to the legacy format.
    #[default]
    Escaped,

    /// Raw concatenation, compatible with dumps written by older tools
    ///
    /// Export fails on free-form fields holding a separator or line break.
    Legacy,
}

impl DumpFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DumpFormat::Escaped => "escaped",
            DumpFormat::Legacy => "legacy",
        }
    }
}

impl fmt::Display for DumpFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How records are separated from each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLayout {
    /// One record per line (directory mode)
    Lines,
    /// Records joined with `|`, no trailing separator (single-file mode)
    Joined,
}

/// An entity that can be persisted as a dump record
///
/// Serde field order is the on-disk field order.
pub trait DumpRecord: Serialize + DeserializeOwned {
    /// Number of fields in one record
    const FIELD_COUNT: usize;

    /// Entity name used in logs
    const KIND: &'static str;

    /// Free-form fields checked against the legacy format, as `(name, value)`
    fn text_fields(&self) -> Vec<(&'static str, &str)>;

    /// Semantic checks applied after a record was parsed
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

impl DumpRecord for Account {
    const FIELD_COUNT: usize = 3;
    const KIND: &'static str = "account";

    fn text_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("phone", self.phone.as_str())]
    }
}

impl DumpRecord for Payment {
    const FIELD_COUNT: usize = 5;
    const KIND: &'static str = "payment";

    fn text_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("id", self.id.as_str()), ("category", self.category.as_str())]
    }

    fn validate(&self) -> Result<(), String> {
        if self.amount <= 0 {
            return Err(format!(
                "payment {} has non-positive amount {}",
                self.id, self.amount
            ));
        }
        Ok(())
    }
}

impl DumpRecord for Favorite {
    const FIELD_COUNT: usize = 5;
    const KIND: &'static str = "favorite";

    fn text_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("id", self.id.as_str()),
            ("name", self.name.as_str()),
            ("category", self.category.as_str()),
        ]
    }

    fn validate(&self) -> Result<(), String> {
        if self.amount <= 0 {
            return Err(format!(
                "favorite {} has non-positive amount {}",
                self.id, self.amount
            ));
        }
        Ok(())
    }
}

/// csv writer configuration for a format and layout
pub fn writer_builder(format: DumpFormat, layout: RecordLayout) -> WriterBuilder {
    let mut builder = WriterBuilder::new();
    builder
        .delimiter(FIELD_DELIMITER)
        .has_headers(false)
        .terminator(match layout {
            RecordLayout::Lines => Terminator::Any(b'\n'),
            RecordLayout::Joined => Terminator::Any(RECORD_SEPARATOR),
        })
        .quote_style(match format {
            DumpFormat::Escaped => QuoteStyle::Necessary,
            DumpFormat::Legacy => QuoteStyle::Never,
        });
    builder
}

/// csv reader configuration for a format and layout
///
/// Records are read positionally without trimming; field counts are checked
/// per record by the dump reader rather than by csv.
pub fn reader_builder(format: DumpFormat, layout: RecordLayout) -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder
        .delimiter(FIELD_DELIMITER)
        .has_headers(false)
        .flexible(true)
        .quoting(format == DumpFormat::Escaped)
        .terminator(match layout {
            RecordLayout::Lines => Terminator::CRLF,
            RecordLayout::Joined => Terminator::Any(RECORD_SEPARATOR),
        });
    builder
}

/// Refuse a record the legacy format would corrupt
pub fn check_legacy<T: DumpRecord>(record: &T) -> Result<(), LedgerError> {
    for (field, value) in record.text_fields() {
        if value.contains(&LEGACY_FORBIDDEN[..]) {
            return Err(LedgerError::unencodable_field(field, value));
        }
    }
    Ok(())
}

/// Encode records into the exact bytes of a dump file
///
/// In the joined layout the final `|` is dropped.
pub fn encode_records<T: DumpRecord>(
    records: &[T],
    format: DumpFormat,
    layout: RecordLayout,
) -> Result<Vec<u8>, LedgerError> {
    let mut writer = writer_builder(format, layout).from_writer(Vec::new());

    for record in records {
        if format == DumpFormat::Legacy {
            check_legacy(record)?;
        }
        writer.serialize(record)?;
    }

    let mut bytes = writer
        .into_inner()
        .map_err(|e| LedgerError::from(e.into_error()))?;

    if layout == RecordLayout::Joined && bytes.last() == Some(&RECORD_SEPARATOR) {
        bytes.pop();
    }

    Ok(bytes)
}
