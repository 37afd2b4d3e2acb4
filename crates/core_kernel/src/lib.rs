//! Core Kernel - Foundational types for the back-office engine
//!
//! This crate provides the building blocks shared by all domain modules:
//! - Amount type with precise decimal arithmetic
//! - Strongly-typed identifiers
//! - The error taxonomy exposed to drivers
//! - Audit event types and the normalized storage error surface

pub mod amount;
pub mod audit;
pub mod error;
pub mod identifiers;
pub mod store;

pub use amount::Amount;
pub use audit::{AuditAction, AuditRecord};
pub use error::{CoreError, ErrorKind};
pub use identifiers::{
    AuditEventId, CategoryId, FinanceAccountId, IssueId, JournalEntryId, JournalLineId,
    LedgerAccountId, MappingRuleId, PropertyId, SupplierId, TransactionId, UserId,
};
pub use store::StoreError;
