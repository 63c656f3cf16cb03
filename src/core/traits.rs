//! Core traits for the ledger
//!
//! The ledger never invents identifiers itself: every payment and favorite id
//! comes from an [`IdGenerator`], so tests and embedders can swap the source.

use uuid::Uuid;

/// Source of globally unique string identifiers
///
/// Used by the CRUD layer each time a payment or favorite is created. The scan
/// engine and the dump codec never generate identifiers.
pub trait IdGenerator: Send + Sync {
    /// Return a fresh identifier that was never returned before
    fn next_id(&mut self) -> String;
}

/// Default generator producing random UUID v4 strings
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic generator producing `<prefix>-1`, `<prefix>-2`, ...
///
/// Handy for fixtures whose dump files must be byte-stable.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
