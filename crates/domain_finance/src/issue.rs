//! Accounting issues - exceptions raised when posting cannot proceed
//!
//! When settlement finds no mapping rule it records an actionable issue
//! instead of failing the settle. Repeated settlement attempts against the
//! same gap return the existing OPEN issue rather than creating duplicates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use core_kernel::{AuditAction, AuditRecord, CoreError, IssueId, TransactionId, UserId};

use crate::mapping::Classification;
use crate::ports::FinanceSession;
use crate::transaction::FinancialTransaction;

/// Issue lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueStatus {
    Open,
    Resolved,
    Ignored,
}

/// Why the issue was raised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueReason {
    MissingMapping,
}

impl IssueReason {
    /// Stable reason tag
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueReason::MissingMapping => "MISSING_MAPPING",
        }
    }
}

/// An exception record for a settlement that could not be posted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountingIssue {
    pub id: IssueId,
    pub status: IssueStatus,
    pub reason: IssueReason,
    /// The classification dimensions that failed to resolve
    pub details: serde_json::Value,
    pub transaction_id: TransactionId,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<UserId>,
}

/// Records a missing-mapping issue for a transaction, at most once
///
/// Returns the existing OPEN issue unchanged (no audit record) when one is
/// already tracking the same gap; otherwise creates the issue and emits
/// ACCOUNTING_ISSUE_CREATED.
pub async fn record_missing_mapping<S>(
    session: &mut S,
    transaction: &FinancialTransaction,
    actor: UserId,
) -> Result<AccountingIssue, CoreError>
where
    S: FinanceSession + ?Sized,
{
    if let Some(existing) = session
        .open_issue_for(transaction.id, IssueReason::MissingMapping)
        .await?
    {
        return Ok(existing);
    }

    let class = Classification::of(transaction);
    let issue = AccountingIssue {
        id: IssueId::new_v7(),
        status: IssueStatus::Open,
        reason: IssueReason::MissingMapping,
        details: json!({
            "category_id": class.category_id.to_string(),
            "account_id": class.account_id.to_string(),
            "supplier_id": class.supplier_id.to_string(),
            "property_id": class.property_id.map(|p| p.to_string()),
        }),
        transaction_id: transaction.id,
        created_at: Utc::now(),
        resolved_at: None,
        resolved_by: None,
    };

    session.insert_issue(&issue).await?;
    session
        .append_audit(AuditRecord::new(
            AuditAction::AccountingIssueCreated,
            "AccountingIssue",
            issue.id,
            actor,
            json!({
                "reason": issue.reason.as_str(),
                "transaction_id": transaction.id.to_string(),
            }),
        ))
        .await?;

    warn!(
        transaction = %transaction.id,
        issue = %issue.id,
        "no mapping rule matched, accounting issue opened"
    );

    Ok(issue)
}
