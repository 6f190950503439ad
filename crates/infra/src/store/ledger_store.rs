use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use goldfinance_accounting::{Account, Voucher};
use goldfinance_core::{AccountId, VoucherId};

/// A document plus the revision it was read at.
///
/// Revisions increase by one on every write to the document; `0` means "not
/// yet written" (counters read as value 0 at revision 0 until their first
/// commit creates them).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    pub value: T,
    pub revision: u64,
}

/// Store operation error.
///
/// These are **infrastructure errors** (storage, concurrency), as opposed to
/// the domain errors in `goldfinance-core`. The service layer maps them at
/// its boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A revision check failed; the caller must re-read and retry.
    #[error("optimistic concurrency check failed: {0}")]
    Conflict(String),

    /// A one-shot write found existing documents.
    #[error("documents already exist: {0}")]
    AlreadyExists(String),

    /// Anything else the backend reports.
    #[error("backend failure: {0}")]
    Backend(String),
}

/// Balance update for one account, guarded by the revision it was read at.
#[derive(Debug, Clone)]
pub struct AccountWrite {
    /// The account with its new balance already applied.
    pub account: Account,
    pub expected_revision: u64,
}

/// Voucher-number counter update, guarded the same way.
#[derive(Debug, Clone)]
pub struct CounterWrite {
    pub key: String,
    pub value: u64,
    pub expected_revision: u64,
}

/// The atomic unit one posting commits: the new voucher document, the
/// balance update of every account it touches, and the voucher-number
/// counter increment.
#[derive(Debug, Clone)]
pub struct PostingCommit {
    pub voucher: Voucher,
    pub accounts: Vec<AccountWrite>,
    pub counter: CounterWrite,
}

/// Document-oriented transactional store backing the ledger.
///
/// Logical collections: `accounts` (keyed by caller-assigned stable ids),
/// `vouchers` (immutable once written), and `counters` (voucher-number
/// sequences). Every mutable document carries a revision used for
/// optimistic concurrency.
///
/// ## Commit Semantics
///
/// `commit_posting()` is the only multi-document write. Implementations
/// must:
/// - verify the expected revision of every touched account document and of
///   the counter document before writing anything
/// - apply the voucher insert, all balance updates, and the counter update
///   as a single all-or-nothing unit
/// - fail the whole commit with [`StoreError::Conflict`] on any revision
///   mismatch, leaving no partial state visible to concurrent readers
///
/// Vouchers, once committed, are immutable and need no revision.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn account(&self, id: &AccountId) -> Result<Option<Versioned<Account>>, StoreError>;

    async fn accounts(&self) -> Result<Vec<Versioned<Account>>, StoreError>;

    /// One-shot chart seed.
    ///
    /// Fails with [`StoreError::AlreadyExists`] if any account document is
    /// already present.
    async fn seed_accounts(&self, accounts: Vec<Account>) -> Result<(), StoreError>;

    /// Versioned read of a named counter; absent counters read as 0 at
    /// revision 0.
    async fn counter(&self, key: &str) -> Result<Versioned<u64>, StoreError>;

    async fn voucher(&self, id: &VoucherId) -> Result<Option<Voucher>, StoreError>;

    /// All vouchers whose `date` falls in `[start, end]` inclusive, in
    /// unspecified order.
    async fn vouchers_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Voucher>, StoreError>;

    /// Atomically write the voucher, the account balances, and the counter.
    async fn commit_posting(&self, commit: PostingCommit) -> Result<VoucherId, StoreError>;

    /// Unconditionally delete all accounts, vouchers, and counters.
    async fn wipe(&self) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    async fn account(&self, id: &AccountId) -> Result<Option<Versioned<Account>>, StoreError> {
        (**self).account(id).await
    }

    async fn accounts(&self) -> Result<Vec<Versioned<Account>>, StoreError> {
        (**self).accounts().await
    }

    async fn seed_accounts(&self, accounts: Vec<Account>) -> Result<(), StoreError> {
        (**self).seed_accounts(accounts).await
    }

    async fn counter(&self, key: &str) -> Result<Versioned<u64>, StoreError> {
        (**self).counter(key).await
    }

    async fn voucher(&self, id: &VoucherId) -> Result<Option<Voucher>, StoreError> {
        (**self).voucher(id).await
    }

    async fn vouchers_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Voucher>, StoreError> {
        (**self).vouchers_in_range(start, end).await
    }

    async fn commit_posting(&self, commit: PostingCommit) -> Result<VoucherId, StoreError> {
        (**self).commit_posting(commit).await
    }

    async fn wipe(&self) -> Result<(), StoreError> {
        (**self).wipe().await
    }
}
