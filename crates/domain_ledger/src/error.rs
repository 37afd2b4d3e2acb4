//! Ledger domain errors

use rust_decimal::Decimal;
use thiserror::Error;

use core_kernel::{CoreError, ErrorKind, JournalEntryId, JournalLineId};

/// Errors that can occur in the ledger domain
#[derive(Debug, Error)]
pub enum LedgerError {
    /// An entry needs at least two lines
    #[error("journal entry requires at least 2 lines, got {0}")]
    TooFewLines(usize),

    /// A line must carry exactly one of a positive debit or credit
    #[error("journal line {line_id} must have exactly one of debit or credit")]
    MalformedLine { line_id: JournalLineId },

    /// Total debits differ from total credits
    #[error("unbalanced journal entry: debits={debits}, credits={credits}")]
    Unbalanced { debits: Decimal, credits: Decimal },

    /// Entry not found
    #[error("journal entry not found: {0}")]
    EntryNotFound(JournalEntryId),
}

impl From<LedgerError> for CoreError {
    fn from(err: LedgerError) -> Self {
        let kind = match &err {
            LedgerError::TooFewLines(_)
            | LedgerError::MalformedLine { .. }
            | LedgerError::Unbalanced { .. } => ErrorKind::Validation,
            LedgerError::EntryNotFound(_) => ErrorKind::NotFound,
        };
        CoreError::new(kind, err.to_string())
    }
}
