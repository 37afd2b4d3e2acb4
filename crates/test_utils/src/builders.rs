//! Test data builders
//!
//! Builder patterns for the engine's inputs, allowing tests to specify
//! only the fields they care about.

use chrono::{DateTime, Utc};

use core_kernel::{
    Amount, CategoryId, FinanceAccountId, LedgerAccountId, PropertyId, SupplierId,
};
use domain_finance::mapping::MappingRule;
use domain_finance::transaction::{NewTransaction, TransactionKind};
use domain_ledger::service::ManualLineInput;

use crate::fixtures::{AmountFixtures, TemporalFixtures};

/// Builder for [`NewTransaction`] inputs
pub struct TestTransactionBuilder {
    kind: TransactionKind,
    amount: Amount,
    competence_date: DateTime<Utc>,
    settlement_date: Option<DateTime<Utc>>,
    description: Option<String>,
    account_id: FinanceAccountId,
    category_id: CategoryId,
    supplier_id: SupplierId,
    property_id: Option<PropertyId>,
}

impl Default for TestTransactionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTransactionBuilder {
    pub fn new() -> Self {
        Self {
            kind: TransactionKind::Expense,
            amount: AmountFixtures::expense(),
            competence_date: TemporalFixtures::competence_date(),
            settlement_date: None,
            description: None,
            account_id: FinanceAccountId::new(),
            category_id: CategoryId::new(),
            supplier_id: SupplierId::new(),
            property_id: None,
        }
    }

    pub fn income(mut self) -> Self {
        self.kind = TransactionKind::Income;
        self.amount = AmountFixtures::income();
        self
    }

    pub fn with_amount(mut self, amount: Amount) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_settlement_date(mut self, date: DateTime<Utc>) -> Self {
        self.settlement_date = Some(date);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_classification(
        mut self,
        category: CategoryId,
        account: FinanceAccountId,
        supplier: SupplierId,
        property: Option<PropertyId>,
    ) -> Self {
        self.category_id = category;
        self.account_id = account;
        self.supplier_id = supplier;
        self.property_id = property;
        self
    }

    pub fn build(self) -> NewTransaction {
        NewTransaction {
            kind: self.kind,
            amount: self.amount,
            competence_date: self.competence_date,
            settlement_date: self.settlement_date,
            description: self.description,
            account_id: self.account_id,
            category_id: self.category_id,
            supplier_id: self.supplier_id,
            property_id: self.property_id,
        }
    }
}

/// Builder for [`MappingRule`] rows
pub struct TestRuleBuilder {
    category_id: CategoryId,
    account_id: FinanceAccountId,
    supplier_id: Option<SupplierId>,
    property_id: Option<PropertyId>,
    debit_account: LedgerAccountId,
    credit_account: LedgerAccountId,
}

impl TestRuleBuilder {
    /// Starts a rule keyed to the given (category, finance account) pair
    pub fn for_classification(category: CategoryId, account: FinanceAccountId) -> Self {
        Self {
            category_id: category,
            account_id: account,
            supplier_id: None,
            property_id: None,
            debit_account: LedgerAccountId::new(),
            credit_account: LedgerAccountId::new(),
        }
    }

    pub fn narrowed_to_supplier(mut self, supplier: SupplierId) -> Self {
        self.supplier_id = Some(supplier);
        self
    }

    pub fn narrowed_to_property(mut self, property: PropertyId) -> Self {
        self.property_id = Some(property);
        self
    }

    pub fn posting_to(mut self, debit: LedgerAccountId, credit: LedgerAccountId) -> Self {
        self.debit_account = debit;
        self.credit_account = credit;
        self
    }

    pub fn build(self) -> MappingRule {
        MappingRule {
            id: core_kernel::MappingRuleId::new(),
            category_id: self.category_id,
            account_id: self.account_id,
            supplier_id: self.supplier_id,
            property_id: self.property_id,
            debit_account: self.debit_account,
            credit_account: self.credit_account,
        }
    }
}

/// Builder for manual journal entry line vectors
#[derive(Default)]
pub struct ManualLinesBuilder {
    lines: Vec<ManualLineInput>,
}

impl ManualLinesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn debit(mut self, account: LedgerAccountId, amount: Amount) -> Self {
        self.lines.push(ManualLineInput {
            account_id: account,
            debit: amount,
            credit: Amount::ZERO,
            memo: None,
        });
        self
    }

    pub fn credit(mut self, account: LedgerAccountId, amount: Amount) -> Self {
        self.lines.push(ManualLineInput {
            account_id: account,
            debit: Amount::ZERO,
            credit: amount,
            memo: None,
        });
        self
    }

    pub fn build(self) -> Vec<ManualLineInput> {
        self.lines
    }
}
