//! End-to-end scenarios across both domains, exercising the engine the
//! way an embedding application would.

use std::sync::Arc;

use rust_decimal_macros::dec;

use core_kernel::{Amount, AuditAction, LedgerAccountId};
use domain_finance::settlement::SettlementService;
use domain_finance::transaction::TransactionStatus;
use domain_ledger::entry::EntryStatus;
use domain_ledger::service::JournalService;
use infra_mem::MemStore;
use test_utils::fixtures::{actor, AmountFixtures, TemporalFixtures};
use test_utils::{init_tracing, ManualLinesBuilder, TestRuleBuilder, TestTransactionBuilder};

#[tokio::test]
async fn test_expense_settles_into_balanced_entry() {
    init_tracing();
    let store = MemStore::new();
    let settlement = SettlementService::new(Arc::new(store.clone()));

    let input = TestTransactionBuilder::new()
        .with_description("Office supplies")
        .build();
    let rule = TestRuleBuilder::for_classification(input.category_id, input.account_id).build();

    {
        use domain_finance::mapping::store_rule;
        use domain_finance::ports::FinanceStore;

        let mut session = FinanceStore::begin(&store).await.unwrap();
        store_rule(&mut *session, &rule).await.unwrap();
        session.commit().await.unwrap();
    }

    let transaction = settlement.create_transaction(input, actor()).await.unwrap();
    let outcome = settlement.settle(transaction.id, actor()).await.unwrap();

    assert_eq!(outcome.transaction.status, TransactionStatus::Settled);
    assert!(outcome.issue.is_none());

    let entry = outcome.journal_entry.unwrap();
    assert_eq!(entry.status, EntryStatus::Posted);
    assert_eq!(entry.description.as_deref(), Some("Office supplies"));
    assert_eq!(entry.lines.len(), 2);
    assert_eq!(entry.lines[0].debit, AmountFixtures::expense());
    assert_eq!(entry.lines[1].credit, AmountFixtures::expense());
    assert!(entry.is_balanced());
}

#[tokio::test]
async fn test_full_lifecycle_leaves_complete_audit_trail() {
    init_tracing();
    let store = MemStore::new();
    let settlement = SettlementService::new(Arc::new(store.clone()));

    let input = TestTransactionBuilder::new()
        .with_settlement_date(TemporalFixtures::settlement_date())
        .build();
    let rule = TestRuleBuilder::for_classification(input.category_id, input.account_id).build();
    {
        use domain_finance::mapping::store_rule;
        use domain_finance::ports::FinanceStore;

        let mut session = FinanceStore::begin(&store).await.unwrap();
        store_rule(&mut *session, &rule).await.unwrap();
        session.commit().await.unwrap();
    }

    let transaction = settlement.create_transaction(input, actor()).await.unwrap();
    settlement.settle(transaction.id, actor()).await.unwrap();
    let canceled = settlement.cancel(transaction.id, actor()).await.unwrap();

    assert_eq!(canceled.status, TransactionStatus::Canceled);

    // Cancellation auto-reversed the posted entry: original flipped to
    // REVERSED plus a balanced mirror entry.
    let entries = store.journal_entries().await;
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().any(|e| e.status == EntryStatus::Reversed));
    assert!(entries.iter().all(|e| e.is_balanced()));

    assert_eq!(
        store
            .audit_count(AuditAction::FinancialTransactionCreated)
            .await,
        1
    );
    assert_eq!(
        store
            .audit_count(AuditAction::FinancialTransactionSettled)
            .await,
        1
    );
    assert_eq!(
        store
            .audit_count(AuditAction::FinancialTransactionCanceled)
            .await,
        1
    );
    assert_eq!(store.audit_count(AuditAction::JournalEntryReversed).await, 1);
    // Settlement posting plus the reversal's mirror entry.
    assert_eq!(store.audit_count(AuditAction::JournalEntryCreated).await, 2);
}

#[tokio::test]
async fn test_missing_mapping_produces_issue_instead_of_entry() {
    init_tracing();
    let store = MemStore::new();
    let settlement = SettlementService::new(Arc::new(store.clone()));

    let transaction = settlement
        .create_transaction(TestTransactionBuilder::new().income().build(), actor())
        .await
        .unwrap();
    let outcome = settlement.settle(transaction.id, actor()).await.unwrap();

    assert_eq!(outcome.transaction.status, TransactionStatus::Settled);
    assert!(outcome.journal_entry.is_none());
    assert!(outcome.issue.is_some());
    assert!(store.journal_entries().await.is_empty());
}

#[tokio::test]
async fn test_manual_entry_posts_through_journal_service() {
    init_tracing();
    let store = MemStore::new();
    let journal = JournalService::new(Arc::new(store.clone()));

    let cash = LedgerAccountId::new();
    let expenses = LedgerAccountId::new();
    let lines = ManualLinesBuilder::new()
        .debit(expenses, Amount::new(dec!(75.00)))
        .credit(cash, Amount::new(dec!(75.00)))
        .build();

    let entry = journal
        .create_manual_entry(
            TemporalFixtures::competence_date(),
            Some("Petty cash top-up".into()),
            lines,
            actor(),
        )
        .await
        .unwrap();

    assert!(entry.is_balanced());
    assert_eq!(entry.lines[0].account_id, expenses);
    assert_eq!(entry.lines[1].account_id, cash);
    assert_eq!(store.audit_count(AuditAction::JournalEntryCreated).await, 1);
}
