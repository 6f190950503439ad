//! Read side: trial balance, day book, voucher listings, and per-account
//! ledger reconstruction.
//!
//! No stored ledger rows exist; everything here is projected on demand from
//! the live account balances and the voucher log.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use goldfinance_accounting::{chart, TrialBalanceRow, Voucher, VoucherKind};
use goldfinance_core::{AccountId, LedgerError, LedgerResult};

use crate::service::map_store_err;
use crate::store::LedgerStore;

/// One display row of an account ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerRow {
    pub date: DateTime<Utc>,
    pub voucher_number: String,
    pub description: String,
    pub debit: i64,
    pub credit: i64,
    /// Running balance as of this row (see [`LedgerReports::account_ledger`]).
    pub balance: i64,
}

/// Cash movement summary for one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayBook {
    pub date: NaiveDate,
    pub opening_cash: i64,
    /// Cash received: repayment and interest-collection voucher totals.
    pub total_receipts: i64,
    /// Cash paid out: disbursement voucher totals.
    pub total_payments: i64,
    pub closing_cash: i64,
    /// The day's vouchers, newest first.
    pub vouchers: Vec<Voucher>,
}

/// Read-only query surface over the ledger.
#[derive(Debug)]
pub struct LedgerReports<S> {
    store: S,
}

impl<S: LedgerStore> LedgerReports<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// One row per active account, sorted by account code ascending.
    ///
    /// Reads are idempotent: identical results for repeated calls absent
    /// intervening writes.
    pub async fn trial_balance(&self) -> LedgerResult<Vec<TrialBalanceRow>> {
        let accounts = self.store.accounts().await.map_err(map_store_err)?;
        if accounts.is_empty() {
            return Err(LedgerError::NotInitialized);
        }

        let mut rows: Vec<TrialBalanceRow> = accounts
            .iter()
            .filter(|v| v.value.is_active)
            .map(|v| TrialBalanceRow::from_account(&v.value))
            .collect();
        rows.sort_by(|a, b| a.account_code.cmp(&b.account_code));
        Ok(rows)
    }

    /// All vouchers with `date` in `[start, end]` inclusive, newest first
    /// (date descending, `created_at` descending tiebreak). `date` is
    /// caller-supplied and may not reflect commit order.
    pub async fn vouchers_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> LedgerResult<Vec<Voucher>> {
        let mut vouchers = self
            .store
            .vouchers_in_range(start, end)
            .await
            .map_err(map_store_err)?;
        vouchers.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(vouchers)
    }

    /// Reconstruct an account's ledger over the window, newest first.
    ///
    /// The running balance starts from the account's *current* balance and
    /// walks the matching journal lines in reverse chronological order,
    /// subtracting each line's signed amount as it goes: the most recent
    /// row shows the live balance, and every older row shows the balance as
    /// it stood once that row's line had been applied.
    pub async fn account_ledger(
        &self,
        account_id: &AccountId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> LedgerResult<Vec<LedgerRow>> {
        let account = self
            .store
            .account(account_id)
            .await
            .map_err(map_store_err)?
            .ok_or_else(|| LedgerError::UnknownAccount(account_id.clone()))?
            .value;

        let vouchers = self.vouchers_in_range(start, end).await?;

        let mut rows = Vec::new();
        let mut running = account.balance;
        for voucher in &vouchers {
            for line in voucher.lines.iter().filter(|l| &l.account_id == account_id) {
                rows.push(LedgerRow {
                    date: voucher.date,
                    voucher_number: voucher.voucher_number.clone(),
                    description: line.description.clone(),
                    debit: line.debit,
                    credit: line.credit,
                    balance: running,
                });
                running -= line.signed_amount();
            }
        }

        Ok(rows)
    }

    /// Cash book for one calendar day (UTC).
    ///
    /// Receipt/payment totals follow voucher kinds; opening and closing
    /// cash are reconstructed backwards from the live Cash-in-Hand balance,
    /// so they stay consistent with the account ledger view.
    pub async fn day_book(&self, day: NaiveDate) -> LedgerResult<DayBook> {
        let cash_id = chart::CASH_IN_HAND.account_id();
        let cash = self
            .store
            .account(&cash_id)
            .await
            .map_err(map_store_err)?
            .ok_or(LedgerError::NotInitialized)?
            .value;

        let start = DateTime::<Utc>::from_naive_utc_and_offset(day.and_time(NaiveTime::MIN), Utc);
        let end = start + Duration::days(1) - Duration::nanoseconds(1);

        let vouchers = self.vouchers_in_range(start, end).await?;

        let mut total_receipts: i64 = 0;
        let mut total_payments: i64 = 0;
        for voucher in &vouchers {
            match voucher.kind {
                VoucherKind::LoanRepayment | VoucherKind::InterestCollection => {
                    total_receipts += voucher.total_amount;
                }
                VoucherKind::LoanDisbursement => total_payments += voucher.total_amount,
                _ => {}
            }
        }

        let cash_movement = |vouchers: &[Voucher]| -> i64 {
            vouchers
                .iter()
                .flat_map(|v| v.lines.iter())
                .filter(|l| l.account_id == cash_id)
                .map(|l| l.signed_amount())
                .sum()
        };

        let after = self
            .vouchers_in_range(end + Duration::nanoseconds(1), DateTime::<Utc>::MAX_UTC)
            .await?;
        let closing_cash = cash.balance - cash_movement(&after);
        let opening_cash = closing_cash - cash_movement(&vouchers);

        Ok(DayBook {
            date: day,
            opening_cash,
            total_receipts,
            total_payments,
            closing_cash,
            vouchers,
        })
    }
}
