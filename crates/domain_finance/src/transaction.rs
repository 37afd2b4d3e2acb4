//! Cash-basis financial transactions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{
    Amount, CategoryId, FinanceAccountId, PropertyId, SupplierId, TransactionId, UserId,
};

use crate::error::FinanceError;

/// Direction of the cash flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Income,
    Expense,
}

/// Lifecycle status
///
/// PLANNED may move to SETTLED or CANCELED. SETTLED never moves back; a
/// settled transaction is only ever adjusted through reversal of its
/// linked journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Planned,
    Settled,
    Canceled,
}

/// A cash-basis economic event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialTransaction {
    pub id: TransactionId,
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    pub amount: Amount,
    /// Accrual date
    pub competence_date: DateTime<Utc>,
    /// Cash date, set on settlement when absent
    pub settlement_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub account_id: FinanceAccountId,
    pub category_id: CategoryId,
    pub supplier_id: SupplierId,
    pub property_id: Option<PropertyId>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a transaction
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: Amount,
    pub competence_date: DateTime<Utc>,
    pub settlement_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub account_id: FinanceAccountId,
    pub category_id: CategoryId,
    pub supplier_id: SupplierId,
    pub property_id: Option<PropertyId>,
}

impl FinancialTransaction {
    /// Creates a new PLANNED transaction
    ///
    /// # Errors
    ///
    /// [`FinanceError::NonPositiveAmount`] unless `amount > 0`.
    pub fn create(input: NewTransaction, created_by: UserId) -> Result<Self, FinanceError> {
        if !input.amount.is_positive() {
            return Err(FinanceError::NonPositiveAmount(input.amount));
        }

        Ok(Self {
            id: TransactionId::new_v7(),
            kind: input.kind,
            status: TransactionStatus::Planned,
            amount: input.amount,
            competence_date: input.competence_date,
            settlement_date: input.settlement_date,
            description: input.description,
            account_id: input.account_id,
            category_id: input.category_id,
            supplier_id: input.supplier_id,
            property_id: input.property_id,
            created_by,
            created_at: Utc::now(),
        })
    }

    /// True if the transaction is still awaiting settlement or cancellation
    pub fn is_planned(&self) -> bool {
        self.status == TransactionStatus::Planned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input(amount: Amount) -> NewTransaction {
        NewTransaction {
            kind: TransactionKind::Expense,
            amount,
            competence_date: Utc::now(),
            settlement_date: None,
            description: None,
            account_id: FinanceAccountId::new(),
            category_id: CategoryId::new(),
            supplier_id: SupplierId::new(),
            property_id: None,
        }
    }

    #[test]
    fn test_create_starts_planned() {
        let tx = FinancialTransaction::create(input(Amount::new(dec!(10))), UserId::new()).unwrap();
        assert_eq!(tx.status, TransactionStatus::Planned);
        assert!(tx.is_planned());
        assert!(tx.settlement_date.is_none());
    }

    #[test]
    fn test_zero_amount_rejected() {
        let result = FinancialTransaction::create(input(Amount::ZERO), UserId::new());
        assert!(matches!(result, Err(FinanceError::NonPositiveAmount(_))));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let result = FinancialTransaction::create(input(Amount::new(dec!(-5))), UserId::new());
        assert!(matches!(result, Err(FinanceError::NonPositiveAmount(_))));
    }
}
