//! The in-memory store and its unit-of-work session

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use core_kernel::{
    AuditAction, AuditRecord, CategoryId, FinanceAccountId, IssueId, JournalEntryId, StoreError,
    TransactionId,
};
use domain_finance::issue::{AccountingIssue, IssueReason, IssueStatus};
use domain_finance::mapping::MappingRule;
use domain_finance::ports::{FinanceSession, FinanceStore};
use domain_finance::transaction::FinancialTransaction;
use domain_ledger::entry::{EntrySource, JournalEntry};
use domain_ledger::ports::{LedgerSession, LedgerStore};

/// Constraint names reported on uniqueness violations
const JOURNAL_SOURCE_KEY: &str = "journal_entry_source_key";
const MAPPING_RULE_KEY: &str = "mapping_rule_key";

type RuleKey = (
    CategoryId,
    FinanceAccountId,
    Option<core_kernel::SupplierId>,
    Option<core_kernel::PropertyId>,
);

#[derive(Debug, Default, Clone)]
struct MemState {
    transactions: HashMap<TransactionId, FinancialTransaction>,
    entries: HashMap<JournalEntryId, JournalEntry>,
    entries_by_source: HashMap<TransactionId, JournalEntryId>,
    rules: HashMap<core_kernel::MappingRuleId, MappingRule>,
    issues: HashMap<IssueId, AccountingIssue>,
    audit: Vec<AuditRecord>,
}

impl MemState {
    fn rule_key(rule: &MappingRule) -> RuleKey {
        (
            rule.category_id,
            rule.account_id,
            rule.supplier_id,
            rule.property_id,
        )
    }
}

/// Shared in-memory store
///
/// Cheap to clone; all clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemStore {
    state: Arc<Mutex<MemState>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the audit trail, for assertions
    pub async fn audit_log(&self) -> Vec<AuditRecord> {
        self.state.lock().await.audit.clone()
    }

    /// Number of audit records with the given action
    pub async fn audit_count(&self, action: AuditAction) -> usize {
        self.state
            .lock()
            .await
            .audit
            .iter()
            .filter(|r| r.action == action)
            .count()
    }

    /// Snapshot of all journal entries
    pub async fn journal_entries(&self) -> Vec<JournalEntry> {
        self.state.lock().await.entries.values().cloned().collect()
    }

    /// Snapshot of all accounting issues
    pub async fn issues(&self) -> Vec<AccountingIssue> {
        self.state.lock().await.issues.values().cloned().collect()
    }

    /// Snapshot of a transaction, for assertions
    pub async fn transaction(&self, id: TransactionId) -> Option<FinancialTransaction> {
        self.state.lock().await.transactions.get(&id).cloned()
    }

    async fn session(&self) -> MemSession {
        let guard = self.state.clone().lock_owned().await;
        let snapshot = guard.clone();
        MemSession {
            guard,
            snapshot,
            committed: false,
        }
    }
}

/// One serialized, atomic unit of work
///
/// Mutations apply to the live state under the lock; on drop without
/// commit, the pre-session snapshot is restored.
pub struct MemSession {
    guard: OwnedMutexGuard<MemState>,
    snapshot: MemState,
    committed: bool,
}

impl Drop for MemSession {
    fn drop(&mut self) {
        if !self.committed {
            *self.guard = std::mem::take(&mut self.snapshot);
        }
    }
}

#[async_trait]
impl LedgerSession for MemSession {
    async fn journal_entry(
        &mut self,
        id: JournalEntryId,
    ) -> Result<Option<JournalEntry>, StoreError> {
        Ok(self.guard.entries.get(&id).cloned())
    }

    async fn journal_entry_for_source(
        &mut self,
        source: TransactionId,
    ) -> Result<Option<JournalEntry>, StoreError> {
        Ok(self
            .guard
            .entries_by_source
            .get(&source)
            .and_then(|id| self.guard.entries.get(id))
            .cloned())
    }

    async fn insert_journal_entry(&mut self, entry: &JournalEntry) -> Result<(), StoreError> {
        if self.guard.entries.contains_key(&entry.id) {
            return Err(StoreError::unique("journal_entry_pkey"));
        }
        if let EntrySource::Financial(source) = entry.source {
            if self.guard.entries_by_source.contains_key(&source) {
                return Err(StoreError::unique(JOURNAL_SOURCE_KEY));
            }
            self.guard.entries_by_source.insert(source, entry.id);
        }
        self.guard.entries.insert(entry.id, entry.clone());
        Ok(())
    }

    async fn update_journal_entry(&mut self, entry: &JournalEntry) -> Result<(), StoreError> {
        if !self.guard.entries.contains_key(&entry.id) {
            return Err(StoreError::missing("JournalEntry", entry.id));
        }
        self.guard.entries.insert(entry.id, entry.clone());
        Ok(())
    }

    async fn append_audit(&mut self, record: AuditRecord) -> Result<(), StoreError> {
        self.guard.audit.push(record);
        Ok(())
    }

    async fn commit(mut self: Box<Self>) -> Result<(), StoreError> {
        self.committed = true;
        Ok(())
    }
}

#[async_trait]
impl FinanceSession for MemSession {
    async fn financial_transaction(
        &mut self,
        id: TransactionId,
    ) -> Result<Option<FinancialTransaction>, StoreError> {
        Ok(self.guard.transactions.get(&id).cloned())
    }

    async fn insert_financial_transaction(
        &mut self,
        transaction: &FinancialTransaction,
    ) -> Result<(), StoreError> {
        if self.guard.transactions.contains_key(&transaction.id) {
            return Err(StoreError::unique("financial_transaction_pkey"));
        }
        self.guard
            .transactions
            .insert(transaction.id, transaction.clone());
        Ok(())
    }

    async fn update_financial_transaction(
        &mut self,
        transaction: &FinancialTransaction,
    ) -> Result<(), StoreError> {
        if !self.guard.transactions.contains_key(&transaction.id) {
            return Err(StoreError::missing("FinancialTransaction", transaction.id));
        }
        self.guard
            .transactions
            .insert(transaction.id, transaction.clone());
        Ok(())
    }

    async fn mapping_rules(
        &mut self,
        category: CategoryId,
        account: FinanceAccountId,
    ) -> Result<Vec<MappingRule>, StoreError> {
        Ok(self
            .guard
            .rules
            .values()
            .filter(|r| r.category_id == category && r.account_id == account)
            .cloned()
            .collect())
    }

    async fn insert_mapping_rule(&mut self, rule: &MappingRule) -> Result<(), StoreError> {
        let key = MemState::rule_key(rule);
        if self
            .guard
            .rules
            .values()
            .any(|existing| MemState::rule_key(existing) == key)
        {
            return Err(StoreError::unique(MAPPING_RULE_KEY));
        }
        if self.guard.rules.contains_key(&rule.id) {
            return Err(StoreError::unique("mapping_rule_pkey"));
        }
        self.guard.rules.insert(rule.id, rule.clone());
        Ok(())
    }

    async fn open_issue_for(
        &mut self,
        transaction: TransactionId,
        reason: IssueReason,
    ) -> Result<Option<AccountingIssue>, StoreError> {
        Ok(self
            .guard
            .issues
            .values()
            .find(|i| {
                i.transaction_id == transaction
                    && i.reason == reason
                    && i.status == IssueStatus::Open
            })
            .cloned())
    }

    async fn issue(&mut self, id: IssueId) -> Result<Option<AccountingIssue>, StoreError> {
        Ok(self.guard.issues.get(&id).cloned())
    }

    async fn insert_issue(&mut self, issue: &AccountingIssue) -> Result<(), StoreError> {
        if self.guard.issues.contains_key(&issue.id) {
            return Err(StoreError::unique("accounting_issue_pkey"));
        }
        self.guard.issues.insert(issue.id, issue.clone());
        Ok(())
    }

    async fn update_issue(&mut self, issue: &AccountingIssue) -> Result<(), StoreError> {
        if !self.guard.issues.contains_key(&issue.id) {
            return Err(StoreError::missing("AccountingIssue", issue.id));
        }
        self.guard.issues.insert(issue.id, issue.clone());
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for MemStore {
    async fn begin(&self) -> Result<Box<dyn LedgerSession>, StoreError> {
        Ok(Box::new(self.session().await))
    }
}

#[async_trait]
impl FinanceStore for MemStore {
    async fn begin(&self) -> Result<Box<dyn FinanceSession>, StoreError> {
        Ok(Box::new(self.session().await))
    }
}
