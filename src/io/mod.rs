//! I/O module
//!
//! Handles dump file persistence of the ledger.
//!
//! # Components
//!
//! - `dump_format` - record format, escaped/legacy formats, record encoding
//! - `dump_reader` - streaming reader with an iterator interface
//! - `directory` - per-entity dump files, merge import, chunked history export
//! - `single_file` - whole-ledger accounts dump with append import

pub mod directory;
pub mod dump_format;
pub mod dump_reader;
pub mod single_file;

pub use directory::{export_to_dir, history_to_files, merge_from_dir, ImportSummary};
pub use dump_format::{DumpFormat, DumpRecord, RecordLayout};
pub use dump_reader::DumpReader;
pub use single_file::{append_from_file, export_to_file};
