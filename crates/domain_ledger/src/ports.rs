//! Ledger storage port
//!
//! The engine never talks to a concrete store; it is handed a session that
//! scopes one atomic unit of work. Every read and write inside a settle,
//! reverse, or manual-entry operation goes through the same session, and
//! either the whole session commits or none of its writes survive.
//!
//! Adapters implement these traits over their native transaction mechanism
//! (`infra_mem` ships the in-memory reference adapter; a SQL adapter would
//! wrap a database transaction). Dropping a session without calling
//! [`LedgerSession::commit`] discards all of its writes.

use async_trait::async_trait;

use core_kernel::{AuditRecord, JournalEntryId, StoreError, TransactionId};

use crate::entry::JournalEntry;

/// Factory for ledger unit-of-work sessions
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Opens a new atomic session
    async fn begin(&self) -> Result<Box<dyn LedgerSession>, StoreError>;
}

/// One atomic unit of work against ledger storage
#[async_trait]
pub trait LedgerSession: Send {
    /// Point lookup by entry id
    async fn journal_entry(
        &mut self,
        id: JournalEntryId,
    ) -> Result<Option<JournalEntry>, StoreError>;

    /// Lookup of the FINANCIAL entry for a source transaction, if any
    async fn journal_entry_for_source(
        &mut self,
        source: TransactionId,
    ) -> Result<Option<JournalEntry>, StoreError>;

    /// Inserts a new entry with its lines
    ///
    /// Fails with [`StoreError::UniqueViolation`] when a FINANCIAL entry
    /// already exists for the same source transaction.
    async fn insert_journal_entry(&mut self, entry: &JournalEntry) -> Result<(), StoreError>;

    /// Persists a status flip on an existing entry
    async fn update_journal_entry(&mut self, entry: &JournalEntry) -> Result<(), StoreError>;

    /// Appends an audit record within this unit of work
    async fn append_audit(&mut self, record: AuditRecord) -> Result<(), StoreError>;

    /// Commits all writes made through this session
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}
