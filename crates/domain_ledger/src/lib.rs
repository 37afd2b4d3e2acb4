//! Ledger Domain - Double-Entry Journal
//!
//! This crate implements the immutable double-entry journal that settlement
//! posts into, enforcing the balance invariant for every entry.
//!
//! # Double-Entry Principles
//!
//! Every journal entry carries at least two lines, each line carries exactly
//! one of a debit or a credit, and total debits equal total credits exactly.
//! Entries are never deleted: a posted entry is corrected by a reversal
//! entry that swaps each line's debit and credit.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_ledger::{JournalEntry, JournalLine, EntrySource};
//!
//! let entry = JournalEntry::post(
//!     date,
//!     Some("Office rent".into()),
//!     EntrySource::Financial(transaction_id),
//!     actor,
//!     vec![
//!         JournalLine::debit(cash_account, amount),
//!         JournalLine::credit(expense_account, amount),
//!     ],
//! )?;
//! ```

pub mod entry;
pub mod error;
pub mod ports;
pub mod posting;
pub mod reversal;
pub mod service;

pub use entry::{EntrySource, EntryStatus, JournalEntry, JournalLine};
pub use error::LedgerError;
pub use ports::{LedgerSession, LedgerStore};
pub use posting::{post_from_source, PostingDirective, PostingOutcome};
pub use reversal::{reverse_entry, ReversalOutcome};
pub use service::{JournalService, ManualLineInput};
