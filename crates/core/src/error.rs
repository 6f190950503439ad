//! Ledger error model.

use thiserror::Error;

use crate::id::AccountId;

/// Result type used across the ledger core.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger-level error.
///
/// Every variant is a per-operation failure, recoverable by caller retry or
/// user correction; nothing here is fatal to the process. Deterministic
/// caller bugs (`UnbalancedEntry`, `UnknownAccount`, `Validation`) must not
/// be retried; `Conflict` is what remains after the service's bounded
/// automatic retries are exhausted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A voucher's debit and credit totals differ.
    #[error("unbalanced entry: debits {debits} != credits {credits}")]
    UnbalancedEntry { debits: i128, credits: i128 },

    /// A journal line references an account that is absent or inactive.
    #[error("unknown or inactive account: {0}")]
    UnknownAccount(AccountId),

    /// `setup` was called while the chart of accounts already exists.
    #[error("chart of accounts already initialized; reset first")]
    AlreadyInitialized,

    /// An operation ran before `setup` seeded the chart of accounts.
    #[error("chart of accounts not initialized")]
    NotInitialized,

    /// A value failed validation (e.g. malformed voucher draft).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Optimistic transaction conflict that survived the retry budget.
    #[error("transaction conflict: {0}")]
    Conflict(String),

    /// Backing-store failure other than a conflict.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn unknown_account(id: impl Into<AccountId>) -> Self {
        Self::UnknownAccount(id.into())
    }
}
