use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use goldfinance_core::AccountId;

/// High-level account kind (determines normal balance side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountKind {
    Asset,
    Liability,
    Equity,
    Income,
    Expense,
}

/// Finer-grained classification used by the pawnshop's fixed chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountSubKind {
    Cash,
    LoansReceivable,
    Suspense,
    InterestIncome,
    Writeoff,
    Capital,
}

/// One document in the `accounts` collection.
///
/// Accounts are created once at setup time, never deleted (only
/// deactivated), and their `balance` is mutated exclusively by voucher
/// postings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub code: String, // e.g. "1001"
    pub name: String, // e.g. "Cash in Hand"
    pub kind: AccountKind,
    pub sub_kind: AccountSubKind,
    /// Signed running balance in smallest currency unit (paise),
    /// debit-positive. Invariant: always equals the sum of
    /// (debit - credit) over every journal line posted against this account.
    pub balance: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// One row of the trial balance.
///
/// Derived, never stored: a pure projection of the account's live state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialBalanceRow {
    pub account_id: AccountId,
    pub account_code: String,
    pub account_name: String,
    pub account_kind: AccountKind,
    pub debit_balance: i64,
    pub credit_balance: i64,
    pub net_balance: i64,
}

impl TrialBalanceRow {
    pub fn from_account(account: &Account) -> Self {
        Self {
            account_id: account.id.clone(),
            account_code: account.code.clone(),
            account_name: account.name.clone(),
            account_kind: account.kind,
            debit_balance: account.balance.max(0),
            credit_balance: account.balance.saturating_neg().max(0),
            net_balance: account.balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_account(balance: i64) -> Account {
        Account {
            id: AccountId::new("cash_in_hand"),
            code: "1001".to_string(),
            name: "Cash in Hand".to_string(),
            kind: AccountKind::Asset,
            sub_kind: AccountSubKind::Cash,
            balance,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn positive_balance_lands_in_debit_column() {
        let row = TrialBalanceRow::from_account(&test_account(12_500));
        assert_eq!(row.debit_balance, 12_500);
        assert_eq!(row.credit_balance, 0);
        assert_eq!(row.net_balance, 12_500);
    }

    #[test]
    fn negative_balance_lands_in_credit_column() {
        let row = TrialBalanceRow::from_account(&test_account(-3_000));
        assert_eq!(row.debit_balance, 0);
        assert_eq!(row.credit_balance, 3_000);
        assert_eq!(row.net_balance, -3_000);
    }

    #[test]
    fn zero_balance_shows_on_neither_side() {
        let row = TrialBalanceRow::from_account(&test_account(0));
        assert_eq!(row.debit_balance, 0);
        assert_eq!(row.credit_balance, 0);
    }
}
