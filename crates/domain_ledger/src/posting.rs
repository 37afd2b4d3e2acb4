//! Journal posting engine
//!
//! Materializes a balanced journal entry for a settled financial
//! transaction. Posting is idempotent per source transaction: the engine
//! pre-checks for an existing FINANCIAL entry, and if the storage layer
//! still reports a uniqueness violation (a concurrent settle won the race)
//! it converges by re-reading instead of surfacing the violation.

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::info;

use core_kernel::{Amount, AuditAction, AuditRecord, CoreError, LedgerAccountId, TransactionId, UserId};

use crate::entry::{EntrySource, JournalEntry, JournalLine};
use crate::ports::LedgerSession;

/// Everything the posting engine needs from a resolved settlement
#[derive(Debug, Clone)]
pub struct PostingDirective {
    /// Source financial transaction
    pub source: TransactionId,
    /// Full transaction amount, posted on both legs
    pub amount: Amount,
    /// Entry date (settlement date, or "now" when unset upstream)
    pub date: DateTime<Utc>,
    /// Description copied from the transaction
    pub description: Option<String>,
    /// Account receiving the debit leg
    pub debit_account: LedgerAccountId,
    /// Account receiving the credit leg
    pub credit_account: LedgerAccountId,
}

/// Result of a posting attempt
#[derive(Debug, Clone)]
pub struct PostingOutcome {
    pub entry: JournalEntry,
    /// False when an existing entry was returned idempotently
    pub created: bool,
}

/// Creates the journal entry for a settled transaction, at most once
///
/// Returns the existing entry unchanged (and emits no audit record) when
/// one is already linked to `directive.source`. On actual creation emits a
/// single JOURNAL_ENTRY_CREATED audit record.
pub async fn post_from_source<S>(
    session: &mut S,
    directive: &PostingDirective,
    actor: UserId,
) -> Result<PostingOutcome, CoreError>
where
    S: LedgerSession + ?Sized,
{
    if let Some(existing) = session.journal_entry_for_source(directive.source).await? {
        return Ok(PostingOutcome {
            entry: existing,
            created: false,
        });
    }

    let entry = JournalEntry::post(
        directive.date,
        directive.description.clone(),
        EntrySource::Financial(directive.source),
        actor,
        vec![
            JournalLine::debit(directive.debit_account, directive.amount),
            JournalLine::credit(directive.credit_account, directive.amount),
        ],
    )?;

    match session.insert_journal_entry(&entry).await {
        Ok(()) => {
            session
                .append_audit(AuditRecord::new(
                    AuditAction::JournalEntryCreated,
                    "JournalEntry",
                    entry.id,
                    actor,
                    json!({
                        "source_type": "FINANCIAL",
                        "source_id": directive.source.to_string(),
                        "line_count": entry.lines.len(),
                    }),
                ))
                .await?;

            info!(
                entry_id = %entry.id,
                source = %directive.source,
                amount = %directive.amount,
                "journal entry posted"
            );

            Ok(PostingOutcome {
                entry,
                created: true,
            })
        }
        Err(err) if err.is_unique_violation() => {
            // A concurrent settle posted between our pre-check and the
            // insert. Converge on the entry it created.
            let existing = session
                .journal_entry_for_source(directive.source)
                .await?
                .ok_or_else(|| {
                    CoreError::internal(format!(
                        "uniqueness violation for source {} but no entry found on re-read",
                        directive.source
                    ))
                })?;

            Ok(PostingOutcome {
                entry: existing,
                created: false,
            })
        }
        Err(err) => Err(err.into()),
    }
}
