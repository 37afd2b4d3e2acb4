//! Reversal engine
//!
//! Negates a posted journal entry by creating a mirrored MANUAL entry whose
//! lines swap debit and credit, then flips the original to REVERSED. An
//! entry is never reversed twice: reversing a REVERSED entry is a no-op
//! that returns `None` rather than an error.

use chrono::Utc;
use serde_json::json;
use tracing::info;

use core_kernel::{AuditAction, AuditRecord, CoreError, JournalEntryId, UserId};

use crate::entry::{EntrySource, EntryStatus, JournalEntry};
use crate::ports::LedgerSession;

/// Identifiers produced by a successful reversal
#[derive(Debug, Clone)]
pub struct ReversalOutcome {
    /// The original entry, now REVERSED
    pub reversed_id: JournalEntryId,
    /// The freshly created mirror entry
    pub reversal: JournalEntry,
}

/// Reverses a posted journal entry within the caller's session
///
/// Both writes (reversal insert and original status flip) happen in the
/// same unit of work, so a reader never observes one without the other.
/// Emits two audit records: JOURNAL_ENTRY_REVERSED on the original and
/// JOURNAL_ENTRY_CREATED on the mirror entry.
///
/// # Errors
///
/// NOT_FOUND when no entry exists for `entry_id`.
pub async fn reverse_entry<S>(
    session: &mut S,
    entry_id: JournalEntryId,
    actor: UserId,
) -> Result<Option<ReversalOutcome>, CoreError>
where
    S: LedgerSession + ?Sized,
{
    let mut original = session
        .journal_entry(entry_id)
        .await?
        .ok_or_else(|| CoreError::not_found("JournalEntry", entry_id))?;

    if original.status == EntryStatus::Reversed {
        return Ok(None);
    }

    let mirrored_lines = original.lines.iter().map(|l| l.swapped()).collect();
    let reversal = JournalEntry::post(
        Utc::now(),
        Some(format!("Reversal of {}", original.id)),
        EntrySource::Manual,
        actor,
        mirrored_lines,
    )?;

    session.insert_journal_entry(&reversal).await?;

    original.status = EntryStatus::Reversed;
    session.update_journal_entry(&original).await?;

    session
        .append_audit(AuditRecord::new(
            AuditAction::JournalEntryReversed,
            "JournalEntry",
            original.id,
            actor,
            json!({ "reversal_entry_id": reversal.id.to_string() }),
        ))
        .await?;
    session
        .append_audit(AuditRecord::new(
            AuditAction::JournalEntryCreated,
            "JournalEntry",
            reversal.id,
            actor,
            json!({
                "source_type": "MANUAL",
                "reversal_of": original.id.to_string(),
            }),
        ))
        .await?;

    info!(
        original = %original.id,
        reversal = %reversal.id,
        "journal entry reversed"
    );

    Ok(Some(ReversalOutcome {
        reversed_id: original.id,
        reversal,
    }))
}
