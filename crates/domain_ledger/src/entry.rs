//! Journal entry and journal line types
//!
//! Entries are validated at construction: once a [`JournalEntry`] exists it
//! satisfies the balance invariant, and nothing in the engine mutates its
//! lines afterward.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{Amount, JournalEntryId, JournalLineId, LedgerAccountId, TransactionId, UserId};

use crate::error::LedgerError;

/// Lifecycle status of a journal entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    /// Entry is in force
    Posted,
    /// Entry has been negated by a reversal entry
    Reversed,
}

/// Origin of a journal entry
///
/// At most one `Financial` entry exists per source transaction; the storage
/// layer enforces this as a uniqueness constraint and it is the idempotency
/// guarantee for settlement-driven posting. Reversal entries are `Manual`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source_type", content = "source_id", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntrySource {
    Manual,
    Financial(TransactionId),
}

impl EntrySource {
    /// Returns the source transaction id for settlement-driven entries
    pub fn financial_source(&self) -> Option<TransactionId> {
        match self {
            EntrySource::Manual => None,
            EntrySource::Financial(id) => Some(*id),
        }
    }
}

/// One leg of a journal entry
///
/// A line carries exactly one of a positive debit or a positive credit,
/// never both and never neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    pub id: JournalLineId,
    pub account_id: LedgerAccountId,
    pub debit: Amount,
    pub credit: Amount,
    pub memo: Option<String>,
}

impl JournalLine {
    /// Creates a debit line
    pub fn debit(account_id: LedgerAccountId, amount: Amount) -> Self {
        Self {
            id: JournalLineId::new_v7(),
            account_id,
            debit: amount,
            credit: Amount::ZERO,
            memo: None,
        }
    }

    /// Creates a credit line
    pub fn credit(account_id: LedgerAccountId, amount: Amount) -> Self {
        Self {
            id: JournalLineId::new_v7(),
            account_id,
            debit: Amount::ZERO,
            credit: amount,
            memo: None,
        }
    }

    /// Attaches a memo to the line
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    /// True if the line carries exactly one positive side
    pub fn is_one_sided(&self) -> bool {
        (self.debit.is_positive() && self.credit.is_zero())
            || (self.credit.is_positive() && self.debit.is_zero())
    }

    /// Returns a fresh line with debit and credit swapped
    ///
    /// Same account, same memo, new line identity. Used by the reversal
    /// engine to negate an entry leg by leg.
    pub fn swapped(&self) -> Self {
        Self {
            id: JournalLineId::new_v7(),
            account_id: self.account_id,
            debit: self.credit,
            credit: self.debit,
            memo: self.memo.clone(),
        }
    }
}

/// An immutable double-entry journal record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: JournalEntryId,
    pub date: DateTime<Utc>,
    pub description: Option<String>,
    pub status: EntryStatus,
    pub source: EntrySource,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<JournalLine>,
}

impl JournalEntry {
    /// Constructs a POSTED entry, enforcing the balance invariant
    ///
    /// # Errors
    ///
    /// - [`LedgerError::TooFewLines`] for fewer than two lines
    /// - [`LedgerError::MalformedLine`] if any line is not one-sided
    /// - [`LedgerError::Unbalanced`] if total debits differ from total
    ///   credits (exact comparison, no tolerance)
    pub fn post(
        date: DateTime<Utc>,
        description: Option<String>,
        source: EntrySource,
        created_by: UserId,
        lines: Vec<JournalLine>,
    ) -> Result<Self, LedgerError> {
        Self::validate_lines(&lines)?;

        Ok(Self {
            id: JournalEntryId::new_v7(),
            date,
            description,
            status: EntryStatus::Posted,
            source,
            created_by,
            created_at: Utc::now(),
            lines,
        })
    }

    /// Sum of all debit legs
    pub fn total_debit(&self) -> Amount {
        self.lines.iter().map(|l| l.debit).sum()
    }

    /// Sum of all credit legs
    pub fn total_credit(&self) -> Amount {
        self.lines.iter().map(|l| l.credit).sum()
    }

    /// True when total debits equal total credits exactly
    pub fn is_balanced(&self) -> bool {
        self.total_debit() == self.total_credit()
    }

    fn validate_lines(lines: &[JournalLine]) -> Result<(), LedgerError> {
        if lines.len() < 2 {
            return Err(LedgerError::TooFewLines(lines.len()));
        }

        for line in lines {
            if !line.is_one_sided() {
                return Err(LedgerError::MalformedLine {
                    line_id: line.id,
                });
            }
        }

        let debits: Amount = lines.iter().map(|l| l.debit).sum();
        let credits: Amount = lines.iter().map(|l| l.credit).sum();
        if debits != credits {
            return Err(LedgerError::Unbalanced {
                debits: debits.value(),
                credits: credits.value(),
            });
        }

        Ok(())
    }
}
