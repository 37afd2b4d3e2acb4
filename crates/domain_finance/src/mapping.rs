//! Mapping rules and the specificity resolver
//!
//! A mapping rule translates a transaction's business classification into
//! the pair of ledger accounts to post to. Rules are keyed on (category,
//! finance account) with optional supplier and property narrowing; at most
//! one rule exists per full tuple, so each specificity bucket holds at most
//! one candidate and the first bucket with a match is the unique answer.

use serde::{Deserialize, Serialize};

use core_kernel::{
    CategoryId, CoreError, FinanceAccountId, LedgerAccountId, MappingRuleId, PropertyId,
    StoreError, SupplierId,
};

use crate::ports::FinanceSession;
use crate::transaction::FinancialTransaction;

/// A posting policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRule {
    pub id: MappingRuleId,
    pub category_id: CategoryId,
    pub account_id: FinanceAccountId,
    /// Narrows the rule to one supplier; `None` matches any
    pub supplier_id: Option<SupplierId>,
    /// Narrows the rule to one property; `None` matches any
    pub property_id: Option<PropertyId>,
    pub debit_account: LedgerAccountId,
    pub credit_account: LedgerAccountId,
}

/// Classification dimensions extracted from a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category_id: CategoryId,
    pub account_id: FinanceAccountId,
    pub supplier_id: SupplierId,
    pub property_id: Option<PropertyId>,
}

impl Classification {
    /// Extracts the classification of a transaction
    pub fn of(transaction: &FinancialTransaction) -> Self {
        Self {
            category_id: transaction.category_id,
            account_id: transaction.account_id,
            supplier_id: transaction.supplier_id,
            property_id: transaction.property_id,
        }
    }
}

/// Specificity buckets, most specific first
///
/// A transaction without a property only ever matches rules with
/// `property_id = None`: its exact-property and property-only buckets
/// collapse into the supplier-only and wildcard buckets respectively, so
/// "no property" never ties with a rule narrowed to a concrete property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Specificity {
    Wildcard,
    PropertyOnly,
    SupplierOnly,
    Exact,
}

fn bucket(rule: &MappingRule, class: &Classification) -> Option<Specificity> {
    let supplier_match = match rule.supplier_id {
        Some(s) => s == class.supplier_id,
        None => true,
    };
    let property_match = match (rule.property_id, class.property_id) {
        (Some(rp), Some(tp)) => rp == tp,
        (Some(_), None) => false,
        (None, _) => true,
    };

    if !supplier_match || !property_match {
        return None;
    }

    Some(match (rule.supplier_id.is_some(), rule.property_id.is_some()) {
        (true, true) => Specificity::Exact,
        (true, false) => Specificity::SupplierOnly,
        (false, true) => Specificity::PropertyOnly,
        (false, false) => Specificity::Wildcard,
    })
}

/// Selects the single best-matching rule for a classification
///
/// Pure function over the candidate rules for the classification's
/// (category, finance account) pair. Priority: exact supplier and property,
/// then supplier-only, then property-only, then wildcard. Returns `None`
/// when no bucket matches.
pub fn resolve_rule<'a>(
    rules: &'a [MappingRule],
    class: &Classification,
) -> Option<&'a MappingRule> {
    rules
        .iter()
        .filter(|rule| rule.category_id == class.category_id && rule.account_id == class.account_id)
        .filter_map(|rule| bucket(rule, class).map(|s| (s, rule)))
        .max_by_key(|(specificity, _)| *specificity)
        .map(|(_, rule)| rule)
}

/// Persists a rule, surfacing duplicate tuples as CONFLICT
///
/// The administrative path is not idempotent: a second rule for the same
/// (category, account, supplier, property) tuple is a genuine user error.
pub async fn store_rule<S>(session: &mut S, rule: &MappingRule) -> Result<(), CoreError>
where
    S: FinanceSession + ?Sized,
{
    match session.insert_mapping_rule(rule).await {
        Ok(()) => Ok(()),
        Err(err @ StoreError::UniqueViolation { .. }) => {
            Err(CoreError::conflict(format!("mapping rule already exists: {err}")))
        }
        Err(err) => Err(err.into()),
    }
}
