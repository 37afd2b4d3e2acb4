//! Audit event types
//!
//! Every state-changing operation in the engine appends exactly one audit
//! record per logical change, inside the same storage session as the
//! business change. If the audit write fails, the business change rolls
//! back with it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identifiers::{AuditEventId, UserId};

/// Actions recorded in the audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    FinancialTransactionCreated,
    FinancialTransactionSettled,
    FinancialTransactionCanceled,
    JournalEntryCreated,
    JournalEntryReversed,
    AccountingIssueCreated,
    AccountingIssueResolved,
}

impl AuditAction {
    /// Stable action tag as recorded in the audit trail
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::FinancialTransactionCreated => "FINANCIAL_TRANSACTION_CREATED",
            AuditAction::FinancialTransactionSettled => "FINANCIAL_TRANSACTION_SETTLED",
            AuditAction::FinancialTransactionCanceled => "FINANCIAL_TRANSACTION_CANCELED",
            AuditAction::JournalEntryCreated => "JOURNAL_ENTRY_CREATED",
            AuditAction::JournalEntryReversed => "JOURNAL_ENTRY_REVERSED",
            AuditAction::AccountingIssueCreated => "ACCOUNTING_ISSUE_CREATED",
            AuditAction::AccountingIssueResolved => "ACCOUNTING_ISSUE_RESOLVED",
        }
    }
}

/// A single append-only audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: AuditEventId,
    pub action: AuditAction,
    pub entity_type: String,
    pub entity_id: String,
    pub actor: UserId,
    pub metadata: Value,
    pub recorded_at: DateTime<Utc>,
}

impl AuditRecord {
    /// Creates a new audit record stamped with the current time
    pub fn new(
        action: AuditAction,
        entity_type: impl Into<String>,
        entity_id: impl std::fmt::Display,
        actor: UserId,
        metadata: Value,
    ) -> Self {
        Self {
            id: AuditEventId::new_v7(),
            action,
            entity_type: entity_type.into(),
            entity_id: entity_id.to_string(),
            actor,
            metadata,
            recorded_at: Utc::now(),
        }
    }
}
