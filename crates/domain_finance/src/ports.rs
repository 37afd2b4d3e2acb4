//! Finance storage port
//!
//! Extends the ledger session with the finance-side entities so that one
//! unit of work spans a whole settle or cancel: transaction status update,
//! journal/issue creation, and audit all commit or roll back together.

use async_trait::async_trait;

use core_kernel::{CategoryId, FinanceAccountId, IssueId, StoreError, TransactionId};
use domain_ledger::ports::LedgerSession;

use crate::issue::{AccountingIssue, IssueReason};
use crate::mapping::MappingRule;
use crate::transaction::FinancialTransaction;

/// Factory for finance unit-of-work sessions
#[async_trait]
pub trait FinanceStore: Send + Sync {
    /// Opens a new atomic session spanning both domains
    async fn begin(&self) -> Result<Box<dyn FinanceSession>, StoreError>;
}

/// One atomic unit of work across finance and ledger storage
#[async_trait]
pub trait FinanceSession: LedgerSession {
    /// Point lookup by transaction id
    async fn financial_transaction(
        &mut self,
        id: TransactionId,
    ) -> Result<Option<FinancialTransaction>, StoreError>;

    /// Inserts a new transaction
    async fn insert_financial_transaction(
        &mut self,
        transaction: &FinancialTransaction,
    ) -> Result<(), StoreError>;

    /// Persists status/settlement-date changes on an existing transaction
    async fn update_financial_transaction(
        &mut self,
        transaction: &FinancialTransaction,
    ) -> Result<(), StoreError>;

    /// Candidate mapping rules for a (category, finance account) pair
    async fn mapping_rules(
        &mut self,
        category: CategoryId,
        account: FinanceAccountId,
    ) -> Result<Vec<MappingRule>, StoreError>;

    /// Inserts a rule
    ///
    /// Fails with [`StoreError::UniqueViolation`] when a rule already
    /// exists for the same (category, account, supplier, property) tuple.
    async fn insert_mapping_rule(&mut self, rule: &MappingRule) -> Result<(), StoreError>;

    /// The OPEN issue tracking `transaction` for `reason`, if any
    async fn open_issue_for(
        &mut self,
        transaction: TransactionId,
        reason: IssueReason,
    ) -> Result<Option<AccountingIssue>, StoreError>;

    /// Point lookup by issue id
    async fn issue(&mut self, id: IssueId) -> Result<Option<AccountingIssue>, StoreError>;

    /// Inserts a new issue
    async fn insert_issue(&mut self, issue: &AccountingIssue) -> Result<(), StoreError>;

    /// Persists resolution changes on an existing issue
    async fn update_issue(&mut self, issue: &AccountingIssue) -> Result<(), StoreError>;
}
