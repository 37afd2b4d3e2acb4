//! Tests for the in-memory adapter's unit-of-work semantics and
//! uniqueness constraints.

use chrono::Utc;
use rust_decimal_macros::dec;

use core_kernel::{Amount, LedgerAccountId, StoreError, TransactionId, UserId};
use domain_finance::issue::IssueReason;
use domain_finance::ports::FinanceStore;
use domain_finance::transaction::{FinancialTransaction, NewTransaction, TransactionKind};
use domain_ledger::entry::{EntrySource, JournalEntry, JournalLine};
use domain_ledger::ports::LedgerStore;
use infra_mem::MemStore;

fn entry(source: EntrySource) -> JournalEntry {
    JournalEntry::post(
        Utc::now(),
        None,
        source,
        UserId::new(),
        vec![
            JournalLine::debit(LedgerAccountId::new(), Amount::new(dec!(10))),
            JournalLine::credit(LedgerAccountId::new(), Amount::new(dec!(10))),
        ],
    )
    .unwrap()
}

fn transaction() -> FinancialTransaction {
    FinancialTransaction::create(
        NewTransaction {
            kind: TransactionKind::Expense,
            amount: Amount::new(dec!(25)),
            competence_date: Utc::now(),
            settlement_date: None,
            description: None,
            account_id: core_kernel::FinanceAccountId::new(),
            category_id: core_kernel::CategoryId::new(),
            supplier_id: core_kernel::SupplierId::new(),
            property_id: None,
        },
        UserId::new(),
    )
    .unwrap()
}

// ============================================================================
// Session atomicity tests
// ============================================================================

mod session_tests {
    use super::*;

    #[tokio::test]
    async fn test_committed_writes_persist() {
        let store = MemStore::new();
        let e = entry(EntrySource::Manual);

        let mut session = LedgerStore::begin(&store).await.unwrap();
        session.insert_journal_entry(&e).await.unwrap();
        session.commit().await.unwrap();

        let mut session = LedgerStore::begin(&store).await.unwrap();
        let found = session.journal_entry(e.id).await.unwrap();
        assert_eq!(found.map(|f| f.id), Some(e.id));
    }

    #[tokio::test]
    async fn test_dropped_session_rolls_back_all_writes() {
        let store = MemStore::new();
        let tx = transaction();
        let e = entry(EntrySource::Financial(tx.id));

        {
            let mut session = FinanceStore::begin(&store).await.unwrap();
            session.insert_financial_transaction(&tx).await.unwrap();
            session.insert_journal_entry(&e).await.unwrap();
            // Dropped without commit.
        }

        assert!(store.transaction(tx.id).await.is_none());
        assert!(store.journal_entries().await.is_empty());
    }

    #[tokio::test]
    async fn test_rollback_also_discards_source_index() {
        let store = MemStore::new();
        let tx = transaction();
        let e = entry(EntrySource::Financial(tx.id));

        {
            let mut session = LedgerStore::begin(&store).await.unwrap();
            session.insert_journal_entry(&e).await.unwrap();
        }

        // After the rollback the same source can be inserted again.
        let other = entry(EntrySource::Financial(tx.id));
        let mut session = LedgerStore::begin(&store).await.unwrap();
        session.insert_journal_entry(&other).await.unwrap();
        session.commit().await.unwrap();

        assert_eq!(store.journal_entries().await.len(), 1);
    }

    #[tokio::test]
    async fn test_sessions_are_serialized() {
        // A second session cannot observe a first session's uncommitted
        // writes because begin() blocks until the first finishes.
        let store = MemStore::new();
        let e = entry(EntrySource::Manual);

        let mut first = LedgerStore::begin(&store).await.unwrap();
        first.insert_journal_entry(&e).await.unwrap();
        first.commit().await.unwrap();

        let mut second = LedgerStore::begin(&store).await.unwrap();
        assert!(second.journal_entry(e.id).await.unwrap().is_some());
        second.commit().await.unwrap();
    }
}

// ============================================================================
// Uniqueness constraint tests
// ============================================================================

mod constraint_tests {
    use super::*;

    #[tokio::test]
    async fn test_second_entry_for_same_source_violates_source_key() {
        let store = MemStore::new();
        let source = TransactionId::new();

        let mut session = LedgerStore::begin(&store).await.unwrap();
        session
            .insert_journal_entry(&entry(EntrySource::Financial(source)))
            .await
            .unwrap();
        let err = session
            .insert_journal_entry(&entry(EntrySource::Financial(source)))
            .await
            .unwrap_err();

        assert!(err.is_unique_violation());
        assert!(matches!(
            err,
            StoreError::UniqueViolation { ref constraint } if constraint == "journal_entry_source_key"
        ));
    }

    #[tokio::test]
    async fn test_manual_entries_share_no_source_constraint() {
        let store = MemStore::new();

        let mut session = LedgerStore::begin(&store).await.unwrap();
        session
            .insert_journal_entry(&entry(EntrySource::Manual))
            .await
            .unwrap();
        session
            .insert_journal_entry(&entry(EntrySource::Manual))
            .await
            .unwrap();
        session.commit().await.unwrap();

        assert_eq!(store.journal_entries().await.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_rule_tuple_violates_rule_key() {
        use domain_finance::mapping::MappingRule;

        let store = MemStore::new();
        let first = MappingRule {
            id: core_kernel::MappingRuleId::new(),
            category_id: core_kernel::CategoryId::new(),
            account_id: core_kernel::FinanceAccountId::new(),
            supplier_id: None,
            property_id: None,
            debit_account: LedgerAccountId::new(),
            credit_account: LedgerAccountId::new(),
        };
        let second = MappingRule {
            id: core_kernel::MappingRuleId::new(),
            ..first.clone()
        };

        let mut session = FinanceStore::begin(&store).await.unwrap();
        session.insert_mapping_rule(&first).await.unwrap();
        let err = session.insert_mapping_rule(&second).await.unwrap_err();

        assert!(matches!(
            err,
            StoreError::UniqueViolation { ref constraint } if constraint == "mapping_rule_key"
        ));
    }

    #[tokio::test]
    async fn test_update_of_missing_transaction_errors() {
        let store = MemStore::new();
        let tx = transaction();

        let mut session = FinanceStore::begin(&store).await.unwrap();
        let err = session.update_financial_transaction(&tx).await.unwrap_err();

        assert!(matches!(err, StoreError::Missing { .. }));
    }

    #[tokio::test]
    async fn test_update_of_missing_entry_errors() {
        let store = MemStore::new();
        let e = entry(EntrySource::Manual);

        let mut session = LedgerStore::begin(&store).await.unwrap();
        let err = session.update_journal_entry(&e).await.unwrap_err();

        assert!(matches!(err, StoreError::Missing { .. }));
    }
}

// ============================================================================
// Issue lookup tests
// ============================================================================

mod issue_lookup_tests {
    use super::*;
    use domain_finance::issue::{AccountingIssue, IssueStatus};

    fn issue(transaction_id: TransactionId, status: IssueStatus) -> AccountingIssue {
        AccountingIssue {
            id: core_kernel::IssueId::new_v7(),
            status,
            reason: IssueReason::MissingMapping,
            details: serde_json::json!({}),
            transaction_id,
            created_at: Utc::now(),
            resolved_at: None,
            resolved_by: None,
        }
    }

    #[tokio::test]
    async fn test_open_issue_lookup_skips_resolved_issues() {
        let store = MemStore::new();
        let tx_id = TransactionId::new();

        let mut session = FinanceStore::begin(&store).await.unwrap();
        session
            .insert_issue(&issue(tx_id, IssueStatus::Resolved))
            .await
            .unwrap();
        assert!(session
            .open_issue_for(tx_id, IssueReason::MissingMapping)
            .await
            .unwrap()
            .is_none());

        let open = issue(tx_id, IssueStatus::Open);
        session.insert_issue(&open).await.unwrap();
        let found = session
            .open_issue_for(tx_id, IssueReason::MissingMapping)
            .await
            .unwrap();
        assert_eq!(found.map(|i| i.id), Some(open.id));
    }

    #[tokio::test]
    async fn test_open_issue_lookup_is_scoped_to_transaction() {
        let store = MemStore::new();

        let mut session = FinanceStore::begin(&store).await.unwrap();
        session
            .insert_issue(&issue(TransactionId::new(), IssueStatus::Open))
            .await
            .unwrap();

        assert!(session
            .open_issue_for(TransactionId::new(), IssueReason::MissingMapping)
            .await
            .unwrap()
            .is_none());
    }
}
