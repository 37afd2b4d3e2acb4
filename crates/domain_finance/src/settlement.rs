//! Settlement state machine
//!
//! Orchestrates transaction status transitions and triggers posting or
//! issue-creation. Every command runs in one storage session: the status
//! update, the journal entry or issue, and the audit records all commit
//! together or not at all.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::info;

use core_kernel::{AuditAction, AuditRecord, CoreError, IssueId, TransactionId, UserId};
use domain_ledger::entry::{EntryStatus, JournalEntry};
use domain_ledger::posting::{post_from_source, PostingDirective};
use domain_ledger::reversal::reverse_entry;

use crate::config::{CancellationPolicy, SettlementConfig};
use crate::error::FinanceError;
use crate::issue::{record_missing_mapping, AccountingIssue, IssueReason, IssueStatus};
use crate::mapping::{resolve_rule, Classification};
use crate::ports::{FinanceSession, FinanceStore};
use crate::transaction::{FinancialTransaction, NewTransaction, TransactionStatus};

/// Result of a settle command
///
/// Exactly one of `journal_entry`/`issue` is set on a normal settle. Both
/// can only be absent on a pathological idempotent re-entry that found
/// neither; a normal settle always produces one of them.
#[derive(Debug, Clone)]
pub struct SettlementOutcome {
    pub transaction: FinancialTransaction,
    pub journal_entry: Option<JournalEntry>,
    pub issue: Option<AccountingIssue>,
}

/// True while a POSTED journal entry is tied to the transaction
///
/// The reusable precondition check for cancellation: route layers that
/// require explicit reversal before cancel branch on this.
pub async fn has_posted_entry<S>(
    session: &mut S,
    transaction_id: TransactionId,
) -> Result<bool, CoreError>
where
    S: FinanceSession + ?Sized,
{
    Ok(session
        .journal_entry_for_source(transaction_id)
        .await?
        .map(|entry| entry.status == EntryStatus::Posted)
        .unwrap_or(false))
}

/// Driver-facing service for transaction lifecycle commands
pub struct SettlementService {
    store: Arc<dyn FinanceStore>,
    config: SettlementConfig,
}

impl SettlementService {
    /// Creates a service with default configuration
    pub fn new(store: Arc<dyn FinanceStore>) -> Self {
        Self::with_config(store, SettlementConfig::default())
    }

    /// Creates a service with explicit configuration
    pub fn with_config(store: Arc<dyn FinanceStore>, config: SettlementConfig) -> Self {
        Self { store, config }
    }

    /// Records a new PLANNED transaction
    pub async fn create_transaction(
        &self,
        input: NewTransaction,
        actor: UserId,
    ) -> Result<FinancialTransaction, CoreError> {
        let transaction = FinancialTransaction::create(input, actor)?;

        let mut session = self.store.begin().await?;
        session.insert_financial_transaction(&transaction).await?;
        session
            .append_audit(AuditRecord::new(
                AuditAction::FinancialTransactionCreated,
                "FinancialTransaction",
                transaction.id,
                actor,
                json!({
                    "status": transaction.status,
                    "kind": transaction.kind,
                    "amount": transaction.amount.to_string(),
                }),
            ))
            .await?;
        session.commit().await?;

        info!(transaction = %transaction.id, "financial transaction created");

        Ok(transaction)
    }

    /// Settles a transaction, posting a journal entry or opening an issue
    ///
    /// # Errors
    ///
    /// - NOT_FOUND when the transaction is absent
    /// - PRECONDITION_FAILED when it is CANCELED
    ///
    /// Settling an already SETTLED transaction is idempotent: the linked
    /// entry or open issue is returned unchanged, and the mapping+posting
    /// logic re-runs defensively only when neither exists yet.
    pub async fn settle(
        &self,
        transaction_id: TransactionId,
        actor: UserId,
    ) -> Result<SettlementOutcome, CoreError> {
        let mut session = self.store.begin().await?;

        let mut transaction = session
            .financial_transaction(transaction_id)
            .await?
            .ok_or(FinanceError::TransactionNotFound(transaction_id))?;

        match transaction.status {
            TransactionStatus::Canceled => {
                return Err(FinanceError::SettleCanceled(transaction_id).into());
            }
            TransactionStatus::Settled => {
                if let Some(entry) = session.journal_entry_for_source(transaction_id).await? {
                    return Ok(SettlementOutcome {
                        transaction,
                        journal_entry: Some(entry),
                        issue: None,
                    });
                }
                if let Some(issue) = session
                    .open_issue_for(transaction_id, IssueReason::MissingMapping)
                    .await?
                {
                    return Ok(SettlementOutcome {
                        transaction,
                        journal_entry: None,
                        issue: Some(issue),
                    });
                }
                // Historical inconsistent state: settled but with neither
                // an entry nor an issue. Fall through and post defensively
                // without touching status or settlement date again.
            }
            TransactionStatus::Planned => {
                let previous = transaction.status;
                transaction.status = TransactionStatus::Settled;
                if transaction.settlement_date.is_none() {
                    transaction.settlement_date = Some(Utc::now());
                }
                session.update_financial_transaction(&transaction).await?;
                session
                    .append_audit(AuditRecord::new(
                        AuditAction::FinancialTransactionSettled,
                        "FinancialTransaction",
                        transaction.id,
                        actor,
                        json!({
                            "previous_status": previous,
                            "new_status": transaction.status,
                            "settlement_date": transaction.settlement_date,
                        }),
                    ))
                    .await?;
            }
        }

        let rules = session
            .mapping_rules(transaction.category_id, transaction.account_id)
            .await?;
        let class = Classification::of(&transaction);

        let outcome = match resolve_rule(&rules, &class) {
            Some(rule) => {
                let directive = PostingDirective {
                    source: transaction.id,
                    amount: transaction.amount,
                    date: transaction.settlement_date.unwrap_or_else(Utc::now),
                    description: transaction.description.clone(),
                    debit_account: rule.debit_account,
                    credit_account: rule.credit_account,
                };
                let posting = post_from_source(&mut *session, &directive, actor).await?;

                SettlementOutcome {
                    transaction,
                    journal_entry: Some(posting.entry),
                    issue: None,
                }
            }
            None => {
                let issue = record_missing_mapping(&mut *session, &transaction, actor).await?;

                SettlementOutcome {
                    transaction,
                    journal_entry: None,
                    issue: Some(issue),
                }
            }
        };

        session.commit().await?;

        info!(
            transaction = %outcome.transaction.id,
            posted = outcome.journal_entry.is_some(),
            "transaction settled"
        );

        Ok(outcome)
    }

    /// Cancels a transaction
    ///
    /// A linked POSTED journal entry is handled per the configured
    /// [`CancellationPolicy`]: reversed automatically (default) or treated
    /// as a PRECONDITION_FAILED block.
    ///
    /// # Errors
    ///
    /// - NOT_FOUND when the transaction is absent
    /// - CONFLICT when it is already CANCELED
    pub async fn cancel(
        &self,
        transaction_id: TransactionId,
        actor: UserId,
    ) -> Result<FinancialTransaction, CoreError> {
        let mut session = self.store.begin().await?;

        let mut transaction = session
            .financial_transaction(transaction_id)
            .await?
            .ok_or(FinanceError::TransactionNotFound(transaction_id))?;

        if transaction.status == TransactionStatus::Canceled {
            return Err(FinanceError::AlreadyCanceled(transaction_id).into());
        }

        if let Some(entry) = session.journal_entry_for_source(transaction_id).await? {
            if entry.status == EntryStatus::Posted {
                match self.config.cancellation_policy {
                    CancellationPolicy::AutoReverse => {
                        reverse_entry(&mut *session, entry.id, actor).await?;
                    }
                    CancellationPolicy::Block => {
                        return Err(FinanceError::PostedEntryBlocksCancel(transaction_id).into());
                    }
                }
            }
        }

        let previous = transaction.status;
        transaction.status = TransactionStatus::Canceled;
        session.update_financial_transaction(&transaction).await?;
        session
            .append_audit(AuditRecord::new(
                AuditAction::FinancialTransactionCanceled,
                "FinancialTransaction",
                transaction.id,
                actor,
                json!({
                    "previous_status": previous,
                    "new_status": transaction.status,
                }),
            ))
            .await?;
        session.commit().await?;

        info!(transaction = %transaction.id, "transaction canceled");

        Ok(transaction)
    }

    /// Resolves an OPEN accounting issue
    ///
    /// Resolution is a manual acknowledgment: it never retriggers posting.
    /// Re-running settle is the retry path.
    ///
    /// # Errors
    ///
    /// - NOT_FOUND when the issue is absent
    /// - CONFLICT when it is not OPEN
    pub async fn resolve_issue(
        &self,
        issue_id: IssueId,
        actor: UserId,
    ) -> Result<AccountingIssue, CoreError> {
        let mut session = self.store.begin().await?;

        let mut issue = session
            .issue(issue_id)
            .await?
            .ok_or(FinanceError::IssueNotFound(issue_id))?;

        if issue.status != IssueStatus::Open {
            return Err(FinanceError::IssueNotOpen(issue_id).into());
        }

        issue.status = IssueStatus::Resolved;
        issue.resolved_at = Some(Utc::now());
        issue.resolved_by = Some(actor);
        session.update_issue(&issue).await?;
        session
            .append_audit(AuditRecord::new(
                AuditAction::AccountingIssueResolved,
                "AccountingIssue",
                issue.id,
                actor,
                json!({
                    "reason": issue.reason.as_str(),
                    "transaction_id": issue.transaction_id.to_string(),
                }),
            ))
            .await?;
        session.commit().await?;

        info!(issue = %issue.id, "accounting issue resolved");

        Ok(issue)
    }
}
