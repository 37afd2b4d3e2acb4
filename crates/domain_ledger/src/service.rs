//! Journal service - the in-process driver surface for the ledger domain
//!
//! Wraps the posting and reversal engines in store-level sessions and adds
//! the manual journal entry operation, which is the one place a balance
//! tolerance applies: client-supplied totals may carry rounding drift, so
//! they are compared within a small epsilon and each line is then snapped
//! to currency precision before the exact entry invariant is enforced.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::info;

use core_kernel::amount::input_tolerance;
use core_kernel::{Amount, AuditAction, AuditRecord, CoreError, JournalEntryId, LedgerAccountId, UserId};

use crate::entry::{EntrySource, JournalEntry, JournalLine};
use crate::error::LedgerError;
use crate::ports::LedgerStore;
use crate::reversal::{reverse_entry, ReversalOutcome};

/// One client-supplied line of a manual journal entry
#[derive(Debug, Clone)]
pub struct ManualLineInput {
    pub account_id: LedgerAccountId,
    pub debit: Amount,
    pub credit: Amount,
    pub memo: Option<String>,
}

/// Driver-facing service for manual entries and standalone reversals
pub struct JournalService {
    store: Arc<dyn LedgerStore>,
    tolerance: Decimal,
}

impl JournalService {
    /// Creates a service with the default input-boundary tolerance
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self {
            store,
            tolerance: input_tolerance(),
        }
    }

    /// Overrides the input-boundary balance tolerance
    pub fn with_tolerance(mut self, tolerance: Decimal) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Creates a manual journal entry
    ///
    /// # Errors
    ///
    /// VALIDATION_ERROR when fewer than two lines are given, when any line
    /// carries both or neither of debit and credit, or when total debits
    /// and credits differ by more than the tolerance.
    pub async fn create_manual_entry(
        &self,
        date: DateTime<Utc>,
        description: Option<String>,
        lines: Vec<ManualLineInput>,
        actor: UserId,
    ) -> Result<JournalEntry, CoreError> {
        if lines.len() < 2 {
            return Err(LedgerError::TooFewLines(lines.len()).into());
        }

        let total_debit: Amount = lines.iter().map(|l| l.debit).sum();
        let total_credit: Amount = lines.iter().map(|l| l.credit).sum();
        if !total_debit.approx_eq(total_credit, self.tolerance) {
            return Err(LedgerError::Unbalanced {
                debits: total_debit.value(),
                credits: total_credit.value(),
            }
            .into());
        }

        // Snap each line to currency precision so the exact balance
        // invariant holds once the drift-tolerant gate has passed.
        let entry_lines: Vec<JournalLine> = lines
            .into_iter()
            .map(|input| JournalLine {
                id: core_kernel::JournalLineId::new_v7(),
                account_id: input.account_id,
                debit: Amount::new(input.debit.value().round_dp(2)),
                credit: Amount::new(input.credit.value().round_dp(2)),
                memo: input.memo,
            })
            .collect();

        let entry = JournalEntry::post(date, description, EntrySource::Manual, actor, entry_lines)?;

        let mut session = self.store.begin().await?;
        session.insert_journal_entry(&entry).await?;
        session
            .append_audit(AuditRecord::new(
                AuditAction::JournalEntryCreated,
                "JournalEntry",
                entry.id,
                actor,
                json!({
                    "source_type": "MANUAL",
                    "line_count": entry.lines.len(),
                    "total_debit": entry.total_debit().to_string(),
                }),
            ))
            .await?;
        session.commit().await?;

        info!(entry_id = %entry.id, "manual journal entry created");

        Ok(entry)
    }

    /// Reverses a posted entry; returns `None` when already reversed
    pub async fn reverse(
        &self,
        entry_id: JournalEntryId,
        actor: UserId,
    ) -> Result<Option<ReversalOutcome>, CoreError> {
        let mut session = self.store.begin().await?;
        let outcome = reverse_entry(&mut *session, entry_id, actor).await?;

        if outcome.is_some() {
            session.commit().await?;
        }

        Ok(outcome)
    }
}
