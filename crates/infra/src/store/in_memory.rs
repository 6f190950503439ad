use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use goldfinance_accounting::{Account, Voucher};
use goldfinance_core::{AccountId, VoucherId};

use super::ledger_store::{LedgerStore, PostingCommit, StoreError, Versioned};

#[derive(Debug, Default)]
struct Collections {
    accounts: HashMap<AccountId, Versioned<Account>>,
    vouchers: HashMap<VoucherId, Voucher>,
    counters: HashMap<String, Versioned<u64>>,
}

/// In-memory transactional store.
///
/// Intended for tests/dev. Not optimized for performance. A single write
/// lock per commit provides the atomicity boundary; document revisions
/// behave as in a real backend.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    inner: RwLock<Collections>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn account(&self, id: &AccountId) -> Result<Option<Versioned<Account>>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.accounts.get(id).cloned())
    }

    async fn accounts(&self) -> Result<Vec<Versioned<Account>>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.accounts.values().cloned().collect())
    }

    async fn seed_accounts(&self, accounts: Vec<Account>) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;

        if !inner.accounts.is_empty() {
            return Err(StoreError::AlreadyExists(format!(
                "accounts collection holds {} documents",
                inner.accounts.len()
            )));
        }

        for account in accounts {
            inner.accounts.insert(
                account.id.clone(),
                Versioned {
                    value: account,
                    revision: 1,
                },
            );
        }

        Ok(())
    }

    async fn counter(&self, key: &str) -> Result<Versioned<u64>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.counters.get(key).cloned().unwrap_or(Versioned {
            value: 0,
            revision: 0,
        }))
    }

    async fn voucher(&self, id: &VoucherId) -> Result<Option<Voucher>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.vouchers.get(id).cloned())
    }

    async fn vouchers_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Voucher>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner
            .vouchers
            .values()
            .filter(|v| v.date >= start && v.date <= end)
            .cloned()
            .collect())
    }

    async fn commit_posting(&self, commit: PostingCommit) -> Result<VoucherId, StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;

        // Verify everything before writing anything.
        if inner.vouchers.contains_key(&commit.voucher.id) {
            return Err(StoreError::AlreadyExists(format!(
                "voucher {}",
                commit.voucher.id
            )));
        }

        for write in &commit.accounts {
            let current = inner
                .accounts
                .get(&write.account.id)
                .map(|v| v.revision)
                .unwrap_or(0);
            if current != write.expected_revision {
                return Err(StoreError::Conflict(format!(
                    "account {} at revision {current}, expected {}",
                    write.account.id, write.expected_revision
                )));
            }
        }

        let counter_revision = inner
            .counters
            .get(&commit.counter.key)
            .map(|v| v.revision)
            .unwrap_or(0);
        if counter_revision != commit.counter.expected_revision {
            return Err(StoreError::Conflict(format!(
                "counter {} at revision {counter_revision}, expected {}",
                commit.counter.key, commit.counter.expected_revision
            )));
        }

        // All checks passed; apply the whole commit.
        let id = commit.voucher.id;
        inner.vouchers.insert(id, commit.voucher);

        for write in commit.accounts {
            inner.accounts.insert(
                write.account.id.clone(),
                Versioned {
                    value: write.account,
                    revision: write.expected_revision + 1,
                },
            );
        }

        inner.counters.insert(
            commit.counter.key,
            Versioned {
                value: commit.counter.value,
                revision: commit.counter.expected_revision + 1,
            },
        );

        Ok(id)
    }

    async fn wipe(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        inner.accounts.clear();
        inner.vouchers.clear();
        inner.counters.clear();
        Ok(())
    }
}
