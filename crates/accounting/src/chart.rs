//! The fixed chart of accounts.
//!
//! The pawnshop's ledger runs on a closed set of six accounts with stable,
//! well-known document ids and codes. The set is seeded once at setup time
//! and never grows at runtime.

use chrono::{DateTime, Utc};

use goldfinance_core::AccountId;

use crate::account::{Account, AccountKind, AccountSubKind};

/// Static description of one seeded account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartAccount {
    /// Stable document id (caller-assigned, not autogenerated).
    pub id: &'static str,
    pub code: &'static str,
    pub name: &'static str,
    pub kind: AccountKind,
    pub sub_kind: AccountSubKind,
}

pub const CASH_IN_HAND: ChartAccount = ChartAccount {
    id: "cash_in_hand",
    code: "1001",
    name: "Cash in Hand",
    kind: AccountKind::Asset,
    sub_kind: AccountSubKind::Cash,
};

pub const LOANS_RECEIVABLE: ChartAccount = ChartAccount {
    id: "loans_receivable",
    code: "1201",
    name: "Loans Receivable",
    kind: AccountKind::Asset,
    sub_kind: AccountSubKind::LoansReceivable,
};

pub const SUSPENSE_ACCOUNT: ChartAccount = ChartAccount {
    id: "suspense_account",
    code: "1301",
    name: "Suspense Account",
    kind: AccountKind::Asset,
    sub_kind: AccountSubKind::Suspense,
};

pub const OWNER_CAPITAL: ChartAccount = ChartAccount {
    id: "owner_capital",
    code: "3001",
    name: "Owner Capital",
    kind: AccountKind::Equity,
    sub_kind: AccountSubKind::Capital,
};

pub const INTEREST_INCOME: ChartAccount = ChartAccount {
    id: "interest_income",
    code: "4001",
    name: "Interest Income",
    kind: AccountKind::Income,
    sub_kind: AccountSubKind::InterestIncome,
};

pub const WRITEOFF_EXPENSE: ChartAccount = ChartAccount {
    id: "writeoff_expense",
    code: "5001",
    name: "Bad Debt Writeoff",
    kind: AccountKind::Expense,
    sub_kind: AccountSubKind::Writeoff,
};

/// The full chart, in code order.
pub const CHART: [ChartAccount; 6] = [
    CASH_IN_HAND,
    LOANS_RECEIVABLE,
    SUSPENSE_ACCOUNT,
    OWNER_CAPITAL,
    INTEREST_INCOME,
    WRITEOFF_EXPENSE,
];

impl ChartAccount {
    pub fn account_id(&self) -> AccountId {
        AccountId::new(self.id)
    }

    /// Materialize the zero-balance account document seeded at setup time.
    pub fn seed(&self, created_at: DateTime<Utc>) -> Account {
        Account {
            id: self.account_id(),
            code: self.code.to_string(),
            name: self.name.to_string(),
            kind: self.kind,
            sub_kind: self.sub_kind,
            balance: 0,
            is_active: true,
            created_at,
        }
    }
}

/// The six seed documents, all zero-balance and active.
pub fn seed_accounts(created_at: DateTime<Utc>) -> Vec<Account> {
    CHART.iter().map(|c| c.seed(created_at)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn chart_ids_and_codes_are_unique() {
        let ids: HashSet<_> = CHART.iter().map(|c| c.id).collect();
        let codes: HashSet<_> = CHART.iter().map(|c| c.code).collect();
        assert_eq!(ids.len(), CHART.len());
        assert_eq!(codes.len(), CHART.len());
    }

    #[test]
    fn seed_accounts_start_at_zero_and_active() {
        let accounts = seed_accounts(Utc::now());
        assert_eq!(accounts.len(), 6);
        for account in &accounts {
            assert_eq!(account.balance, 0);
            assert!(account.is_active);
        }
    }
}
