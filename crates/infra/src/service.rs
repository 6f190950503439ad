//! Write side: the dependency-injected ledger service.
//!
//! One `LedgerService` is constructed at process start with a handle to the
//! backing store and passed to callers; there are no ambient singletons.
//! All balance mutation in the system flows through [`LedgerService::post`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use goldfinance_accounting::{
    generators, seed_accounts, Account, Voucher, VoucherDraft, VoucherKind,
};
use goldfinance_core::{AccountId, LedgerError, LedgerResult, VoucherId};

use crate::store::{AccountWrite, CounterWrite, LedgerStore, PostingCommit, StoreError, Versioned};

/// Service tuning knobs.
#[derive(Debug, Clone, Copy)]
pub struct LedgerConfig {
    /// How many times a posting re-reads and re-commits after an optimistic
    /// transaction conflict before surfacing [`LedgerError::Conflict`].
    pub max_commit_retries: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_commit_retries: 5,
        }
    }
}

/// Validates and durably records balanced postings, atomically mutating
/// account balances through the injected [`LedgerStore`].
#[derive(Debug)]
pub struct LedgerService<S> {
    store: S,
    config: LedgerConfig,
}

impl<S: LedgerStore> LedgerService<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, LedgerConfig::default())
    }

    pub fn with_config(store: S, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// One-shot chart-of-accounts setup.
    ///
    /// Seeds the six fixed accounts with zero balances. When
    /// `initial_capital > 0`, also posts an opening-balance voucher (debit
    /// Cash in Hand, credit Owner Capital) through the normal posting path,
    /// so even the very first balances derive from a voucher.
    ///
    /// Not idempotent: fails with [`LedgerError::AlreadyInitialized`] while
    /// any account exists; callers must [`reset`](Self::reset) first.
    pub async fn setup(&self, initial_capital: i64) -> LedgerResult<()> {
        if initial_capital < 0 {
            return Err(LedgerError::validation(format!(
                "initial capital must not be negative (got {initial_capital})"
            )));
        }

        let existing = self.store.accounts().await.map_err(map_store_err)?;
        if !existing.is_empty() {
            return Err(LedgerError::AlreadyInitialized);
        }

        let now = Utc::now();
        self.store
            .seed_accounts(seed_accounts(now))
            .await
            .map_err(|e| match e {
                StoreError::AlreadyExists(_) => LedgerError::AlreadyInitialized,
                other => map_store_err(other),
            })?;
        tracing::info!(initial_capital, "chart of accounts seeded");

        if initial_capital > 0 {
            let draft = generators::opening_balance(initial_capital, now)?;
            self.post(draft).await?;
        }

        Ok(())
    }

    /// Delete all accounts, vouchers, and counters. Irreversible; intended
    /// for development/test re-seeding only.
    pub async fn reset(&self) -> LedgerResult<()> {
        self.store.wipe().await.map_err(map_store_err)?;
        tracing::info!("accounting system reset");
        Ok(())
    }

    pub async fn account(&self, id: &AccountId) -> LedgerResult<Option<Account>> {
        Ok(self
            .store
            .account(id)
            .await
            .map_err(map_store_err)?
            .map(|v| v.value))
    }

    /// Active accounts, sorted by code.
    pub async fn active_accounts(&self) -> LedgerResult<Vec<Account>> {
        let mut accounts: Vec<Account> = self
            .store
            .accounts()
            .await
            .map_err(map_store_err)?
            .into_iter()
            .map(|v| v.value)
            .filter(|a| a.is_active)
            .collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(accounts)
    }

    /// Validate and atomically record a balanced posting.
    ///
    /// Assigns the voucher id, the counter-derived voucher number, and
    /// `created_at`; folds each line's `debit - credit` into its account's
    /// balance; commits everything as one unit. Conflicting concurrent
    /// postings are retried with fresh reads up to the configured budget.
    ///
    /// Returns the new voucher's id. No side effects beyond the commit.
    pub async fn post(&self, draft: VoucherDraft) -> LedgerResult<VoucherId> {
        draft.ensure_valid()?;

        if self.store.accounts().await.map_err(map_store_err)?.is_empty() {
            return Err(LedgerError::NotInitialized);
        }

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.try_post(&draft).await {
                Ok(id) => {
                    tracing::debug!(voucher_id = %id, attempt, "voucher posted");
                    return Ok(id);
                }
                Err(LedgerError::Conflict(msg)) if attempt < self.config.max_commit_retries => {
                    tracing::warn!(attempt, conflict = %msg, "posting conflict, retrying with fresh reads");
                }
                Err(LedgerError::Conflict(msg)) => {
                    return Err(LedgerError::conflict(format!(
                        "gave up after {attempt} attempts: {msg}"
                    )));
                }
                Err(other) => return Err(other),
            }
        }
    }

    /// One read-validate-commit cycle against a fresh snapshot.
    async fn try_post(&self, draft: &VoucherDraft) -> LedgerResult<VoucherId> {
        // Read every referenced account at its current revision.
        let mut reads: Vec<Versioned<Account>> = Vec::new();
        for id in draft.account_ids() {
            let versioned = self
                .store
                .account(&id)
                .await
                .map_err(map_store_err)?
                .ok_or_else(|| LedgerError::UnknownAccount(id.clone()))?;
            if !versioned.value.is_active {
                return Err(LedgerError::UnknownAccount(id));
            }
            reads.push(versioned);
        }

        // Net movement per account; lines against the same account fold
        // into a single balance update.
        let mut deltas: HashMap<AccountId, i64> = HashMap::new();
        for line in &draft.lines {
            let delta = deltas.entry(line.account_id.clone()).or_insert(0);
            *delta = delta
                .checked_add(line.signed_amount())
                .ok_or_else(|| LedgerError::validation("account movement overflows i64"))?;
        }

        let mut writes: Vec<AccountWrite> = Vec::with_capacity(reads.len());
        for read in reads {
            let delta = deltas.get(&read.value.id).copied().unwrap_or(0);
            let mut account = read.value;
            account.balance = account
                .balance
                .checked_add(delta)
                .ok_or_else(|| LedgerError::validation("account balance overflows i64"))?;
            writes.push(AccountWrite {
                account,
                expected_revision: read.revision,
            });
        }

        let created_at = Utc::now();
        let (voucher_number, counter) = self.next_voucher_number(draft.kind, created_at).await?;
        let voucher = Voucher::from_draft(draft.clone(), VoucherId::new(), voucher_number, created_at);

        let id = self
            .store
            .commit_posting(PostingCommit {
                voucher,
                accounts: writes,
                counter,
            })
            .await
            .map_err(map_store_err)?;

        Ok(id)
    }

    /// Next number in the per-kind per-day sequence.
    ///
    /// The counter document is incremented inside the same commit as the
    /// voucher, so numbers are unique without a separate uniqueness check.
    async fn next_voucher_number(
        &self,
        kind: VoucherKind,
        at: DateTime<Utc>,
    ) -> LedgerResult<(String, CounterWrite)> {
        let key = format!("{}-{}", kind.prefix(), at.format("%Y%m%d"));
        let current = self.store.counter(&key).await.map_err(map_store_err)?;
        let next = current.value + 1;
        let number = format!("{key}-{next:03}");

        Ok((
            number,
            CounterWrite {
                key,
                value: next,
                expected_revision: current.revision,
            },
        ))
    }

    // Domain entry points: one per business event, each building its
    // voucher through the matching generator and delegating to `post`.
    // Failures propagate unchanged; no retry beyond `post`'s own.

    pub async fn post_disbursement(
        &self,
        loan_ref: impl Into<String>,
        amount: i64,
        counterparty: &str,
        actor: &str,
    ) -> LedgerResult<VoucherId> {
        let draft = generators::disbursement(loan_ref, amount, counterparty, actor, Utc::now())?;
        self.post(draft).await
    }

    pub async fn post_repayment(
        &self,
        loan_ref: impl Into<String>,
        principal: i64,
        interest: i64,
        counterparty: &str,
        actor: &str,
    ) -> LedgerResult<VoucherId> {
        let draft =
            generators::repayment(loan_ref, principal, interest, counterparty, actor, Utc::now())?;
        self.post(draft).await
    }

    pub async fn post_interest_collection(
        &self,
        loan_ref: impl Into<String>,
        amount: i64,
        counterparty: &str,
        actor: &str,
    ) -> LedgerResult<VoucherId> {
        let draft =
            generators::interest_collection(loan_ref, amount, counterparty, actor, Utc::now())?;
        self.post(draft).await
    }

    pub async fn post_writeoff(
        &self,
        loan_ref: impl Into<String>,
        amount: i64,
        counterparty: &str,
        actor: &str,
    ) -> LedgerResult<VoucherId> {
        let draft = generators::writeoff(loan_ref, amount, counterparty, actor, Utc::now())?;
        self.post(draft).await
    }

    pub async fn post_adjustment(
        &self,
        lines: Vec<goldfinance_accounting::JournalLine>,
        description: impl Into<String>,
        actor: &str,
    ) -> LedgerResult<VoucherId> {
        let draft = generators::manual_adjustment(lines, description, actor, Utc::now())?;
        self.post(draft).await
    }
}

pub(crate) fn map_store_err(err: StoreError) -> LedgerError {
    match err {
        StoreError::Conflict(msg) => LedgerError::Conflict(msg),
        StoreError::AlreadyExists(msg) => LedgerError::Storage(format!("unexpected existing document: {msg}")),
        StoreError::Backend(msg) => LedgerError::Storage(msg),
    }
}
