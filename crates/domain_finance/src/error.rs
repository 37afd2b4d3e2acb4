//! Finance domain errors

use thiserror::Error;

use core_kernel::{Amount, CoreError, ErrorKind, IssueId, TransactionId};

/// Errors that can occur in the finance domain
#[derive(Debug, Error)]
pub enum FinanceError {
    /// Transaction amounts must be strictly positive
    #[error("transaction amount must be positive, got {0}")]
    NonPositiveAmount(Amount),

    /// Transaction not found
    #[error("financial transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    /// Settling a canceled transaction is blocked
    #[error("cannot settle canceled transaction {0}")]
    SettleCanceled(TransactionId),

    /// Canceling twice is a genuine conflict, not an idempotent no-op
    #[error("transaction already canceled: {0}")]
    AlreadyCanceled(TransactionId),

    /// Cancellation blocked while a POSTED journal entry is linked
    #[error("cannot cancel {0}: linked journal entry is still posted, reverse it first")]
    PostedEntryBlocksCancel(TransactionId),

    /// Issue not found
    #[error("accounting issue not found: {0}")]
    IssueNotFound(IssueId),

    /// Resolving a non-open issue
    #[error("accounting issue {0} already resolved or ignored")]
    IssueNotOpen(IssueId),
}

impl From<FinanceError> for CoreError {
    fn from(err: FinanceError) -> Self {
        let kind = match &err {
            FinanceError::NonPositiveAmount(_) => ErrorKind::Validation,
            FinanceError::TransactionNotFound(_) | FinanceError::IssueNotFound(_) => {
                ErrorKind::NotFound
            }
            FinanceError::AlreadyCanceled(_) | FinanceError::IssueNotOpen(_) => ErrorKind::Conflict,
            FinanceError::SettleCanceled(_) | FinanceError::PostedEntryBlocksCancel(_) => {
                ErrorKind::PreconditionFailed
            }
        };
        CoreError::new(kind, err.to_string())
    }
}
