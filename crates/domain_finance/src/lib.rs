//! Finance Domain - Settlement Orchestration
//!
//! This crate records cash-basis financial transactions and, on settlement,
//! drives double-entry posting through a configurable mapping layer:
//!
//! 1. A settle command validates the transaction's status transition.
//! 2. The mapping resolver selects the most specific posting rule for the
//!    transaction's classification (category, account, supplier, property).
//! 3. With a rule, the ledger posting engine materializes a balanced
//!    journal entry; without one, an accounting issue is opened instead.
//!
//! All steps of a settle or cancel run in one storage session: either the
//! whole command commits or none of it is visible.

pub mod config;
pub mod error;
pub mod issue;
pub mod mapping;
pub mod ports;
pub mod settlement;
pub mod transaction;

pub use config::{CancellationPolicy, SettlementConfig};
pub use error::FinanceError;
pub use issue::{AccountingIssue, IssueReason, IssueStatus};
pub use mapping::{resolve_rule, store_rule, Classification, MappingRule};
pub use ports::{FinanceSession, FinanceStore};
pub use settlement::{has_posted_entry, SettlementOutcome, SettlementService};
pub use transaction::{FinancialTransaction, NewTransaction, TransactionKind, TransactionStatus};
