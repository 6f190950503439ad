//! Domain voucher generators.
//!
//! Each generator encodes the accounting treatment of one business event as
//! a balanced voucher draft, so callers never hand-construct journal lines.
//! Generators are pure: the business date is passed in, and failures from
//! the posting path propagate unchanged (no retry here).

use chrono::{DateTime, Utc};

use goldfinance_core::{LedgerError, LedgerResult};

use crate::chart::{CASH_IN_HAND, INTEREST_INCOME, LOANS_RECEIVABLE, OWNER_CAPITAL, WRITEOFF_EXPENSE};
use crate::voucher::{JournalLine, VoucherDraft, VoucherKind};

/// Actor recorded on vouchers the system synthesizes itself.
pub const SYSTEM_ACTOR: &str = "system";

fn ensure_positive(amount: i64, what: &str) -> LedgerResult<()> {
    if amount <= 0 {
        return Err(LedgerError::validation(format!(
            "{what} must be positive (got {amount})"
        )));
    }
    Ok(())
}

/// Loan paid out: debit Loans Receivable, credit Cash in Hand.
pub fn disbursement(
    loan_ref: impl Into<String>,
    amount: i64,
    counterparty: &str,
    actor: &str,
    date: DateTime<Utc>,
) -> LedgerResult<VoucherDraft> {
    ensure_positive(amount, "disbursement amount")?;

    let lines = vec![
        JournalLine::debit(
            &LOANS_RECEIVABLE,
            amount,
            format!("Loan disbursed to {counterparty}"),
        ),
        JournalLine::credit(&CASH_IN_HAND, amount, format!("Cash paid to {counterparty}")),
    ];

    VoucherDraft::new(
        VoucherKind::LoanDisbursement,
        date,
        format!("Loan disbursement - {counterparty}"),
        Some(loan_ref.into()),
        lines,
        actor,
    )
}

/// Loan repaid: debit Cash for principal + interest, credit Loans
/// Receivable for the principal, and credit Interest Income when any
/// interest was collected (3-line voucher).
pub fn repayment(
    loan_ref: impl Into<String>,
    principal: i64,
    interest: i64,
    counterparty: &str,
    actor: &str,
    date: DateTime<Utc>,
) -> LedgerResult<VoucherDraft> {
    ensure_positive(principal, "repayment principal")?;
    if interest < 0 {
        return Err(LedgerError::validation(format!(
            "repayment interest must not be negative (got {interest})"
        )));
    }

    let total = principal
        .checked_add(interest)
        .ok_or_else(|| LedgerError::validation("repayment total overflows i64"))?;

    let mut lines = vec![
        JournalLine::debit(
            &CASH_IN_HAND,
            total,
            format!("Cash received from {counterparty}"),
        ),
        JournalLine::credit(
            &LOANS_RECEIVABLE,
            principal,
            format!("Principal repayment - {counterparty}"),
        ),
    ];

    if interest > 0 {
        lines.push(JournalLine::credit(
            &INTEREST_INCOME,
            interest,
            format!("Interest received - {counterparty}"),
        ));
    }

    VoucherDraft::new(
        VoucherKind::LoanRepayment,
        date,
        format!("Loan repayment - {counterparty}"),
        Some(loan_ref.into()),
        lines,
        actor,
    )
}

/// Interest collected without touching the principal: debit Cash in Hand,
/// credit Interest Income.
pub fn interest_collection(
    loan_ref: impl Into<String>,
    amount: i64,
    counterparty: &str,
    actor: &str,
    date: DateTime<Utc>,
) -> LedgerResult<VoucherDraft> {
    ensure_positive(amount, "interest amount")?;

    let lines = vec![
        JournalLine::debit(
            &CASH_IN_HAND,
            amount,
            format!("Cash received from {counterparty}"),
        ),
        JournalLine::credit(
            &INTEREST_INCOME,
            amount,
            format!("Interest received - {counterparty}"),
        ),
    ];

    VoucherDraft::new(
        VoucherKind::InterestCollection,
        date,
        format!("Interest collection - {counterparty}"),
        Some(loan_ref.into()),
        lines,
        actor,
    )
}

/// Irrecoverable loan: debit Bad Debt Writeoff, credit Loans Receivable.
pub fn writeoff(
    loan_ref: impl Into<String>,
    amount: i64,
    counterparty: &str,
    actor: &str,
    date: DateTime<Utc>,
) -> LedgerResult<VoucherDraft> {
    ensure_positive(amount, "writeoff amount")?;

    let lines = vec![
        JournalLine::debit(
            &WRITEOFF_EXPENSE,
            amount,
            format!("Loan writeoff - {counterparty}"),
        ),
        JournalLine::credit(
            &LOANS_RECEIVABLE,
            amount,
            format!("Loan written off - {counterparty}"),
        ),
    ];

    VoucherDraft::new(
        VoucherKind::Writeoff,
        date,
        format!("Loan writeoff - {counterparty}"),
        Some(loan_ref.into()),
        lines,
        actor,
    )
}

/// Manual journal entry: caller-supplied lines, validated here before
/// submission (the posting path re-validates).
pub fn manual_adjustment(
    lines: Vec<JournalLine>,
    description: impl Into<String>,
    actor: &str,
    date: DateTime<Utc>,
) -> LedgerResult<VoucherDraft> {
    VoucherDraft::new(VoucherKind::Adjustment, date, description, None, lines, actor)
}

/// Opening capital injected at setup: debit Cash in Hand, credit Owner
/// Capital. The very first balances derive from this voucher like any
/// other, instead of being written onto the account documents directly.
pub fn opening_balance(initial_capital: i64, date: DateTime<Utc>) -> LedgerResult<VoucherDraft> {
    ensure_positive(initial_capital, "initial capital")?;

    let lines = vec![
        JournalLine::debit(&CASH_IN_HAND, initial_capital, "Opening cash balance"),
        JournalLine::credit(&OWNER_CAPITAL, initial_capital, "Opening capital"),
    ];

    VoucherDraft::new(
        VoucherKind::OpeningBalance,
        date,
        "Opening balance",
        None,
        lines,
        SYSTEM_ACTOR,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use goldfinance_core::AccountId;

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn disbursement_debits_loans_and_credits_cash() {
        let draft = disbursement("loan-7", 50_000, "Asha", "user-1", test_time()).unwrap();

        assert_eq!(draft.kind, VoucherKind::LoanDisbursement);
        assert_eq!(draft.reference.as_deref(), Some("loan-7"));
        assert_eq!(draft.total_amount, 50_000);
        assert_eq!(draft.lines.len(), 2);

        assert_eq!(draft.lines[0].account_id, AccountId::new("loans_receivable"));
        assert_eq!(draft.lines[0].debit, 50_000);
        assert_eq!(draft.lines[0].credit, 0);

        assert_eq!(draft.lines[1].account_id, AccountId::new("cash_in_hand"));
        assert_eq!(draft.lines[1].credit, 50_000);
    }

    #[test]
    fn repayment_with_interest_is_three_lines() {
        let draft = repayment("loan-7", 50_000, 2_000, "Asha", "user-1", test_time()).unwrap();

        assert_eq!(draft.kind, VoucherKind::LoanRepayment);
        assert_eq!(draft.total_amount, 52_000);
        assert_eq!(draft.lines.len(), 3);

        assert_eq!(draft.lines[0].account_id, AccountId::new("cash_in_hand"));
        assert_eq!(draft.lines[0].debit, 52_000);
        assert_eq!(draft.lines[1].account_id, AccountId::new("loans_receivable"));
        assert_eq!(draft.lines[1].credit, 50_000);
        assert_eq!(draft.lines[2].account_id, AccountId::new("interest_income"));
        assert_eq!(draft.lines[2].credit, 2_000);
    }

    #[test]
    fn repayment_without_interest_is_two_lines() {
        let draft = repayment("loan-7", 50_000, 0, "Asha", "user-1", test_time()).unwrap();
        assert_eq!(draft.lines.len(), 2);
        assert_eq!(draft.total_amount, 50_000);
    }

    #[test]
    fn interest_collection_credits_income() {
        let draft = interest_collection("loan-7", 1_500, "Asha", "user-1", test_time()).unwrap();
        assert_eq!(draft.kind, VoucherKind::InterestCollection);
        assert_eq!(draft.lines[1].account_id, AccountId::new("interest_income"));
        assert_eq!(draft.lines[1].credit, 1_500);
    }

    #[test]
    fn writeoff_moves_balance_to_expense() {
        let draft = writeoff("loan-9", 30_000, "Ravi", "user-1", test_time()).unwrap();
        assert_eq!(draft.kind, VoucherKind::Writeoff);
        assert_eq!(draft.lines[0].account_id, AccountId::new("writeoff_expense"));
        assert_eq!(draft.lines[0].debit, 30_000);
        assert_eq!(draft.lines[1].account_id, AccountId::new("loans_receivable"));
        assert_eq!(draft.lines[1].credit, 30_000);
    }

    #[test]
    fn zero_or_negative_amounts_are_rejected() {
        assert!(disbursement("l", 0, "A", "u", test_time()).is_err());
        assert!(disbursement("l", -5, "A", "u", test_time()).is_err());
        assert!(repayment("l", 0, 100, "A", "u", test_time()).is_err());
        assert!(repayment("l", 100, -1, "A", "u", test_time()).is_err());
        assert!(writeoff("l", 0, "A", "u", test_time()).is_err());
        assert!(interest_collection("l", 0, "A", "u", test_time()).is_err());
        assert!(opening_balance(0, test_time()).is_err());
    }

    #[test]
    fn manual_adjustment_passes_balanced_lines_through() {
        use crate::chart::{CASH_IN_HAND, SUSPENSE_ACCOUNT};

        let lines = vec![
            JournalLine::debit(&SUSPENSE_ACCOUNT, 500, "Unidentified receipt"),
            JournalLine::credit(&CASH_IN_HAND, 500, "Cash over"),
        ];
        let draft = manual_adjustment(lines, "Suspense parking", "user-2", test_time()).unwrap();
        assert_eq!(draft.kind, VoucherKind::Adjustment);
        assert_eq!(draft.reference, None);
        assert_eq!(draft.total_amount, 500);
    }

    #[test]
    fn manual_adjustment_rejects_unbalanced_lines() {
        use crate::chart::{CASH_IN_HAND, SUSPENSE_ACCOUNT};

        let lines = vec![
            JournalLine::debit(&SUSPENSE_ACCOUNT, 500, "d"),
            JournalLine::credit(&CASH_IN_HAND, 400, "c"),
        ];
        let err = manual_adjustment(lines, "bad", "user-2", test_time()).unwrap_err();
        assert!(matches!(err, goldfinance_core::LedgerError::UnbalancedEntry { .. }));
    }

    #[test]
    fn opening_balance_funds_cash_from_capital() {
        let draft = opening_balance(100_000, test_time()).unwrap();
        assert_eq!(draft.kind, VoucherKind::OpeningBalance);
        assert_eq!(draft.created_by, SYSTEM_ACTOR);
        assert_eq!(draft.lines[0].account_id, AccountId::new("cash_in_hand"));
        assert_eq!(draft.lines[0].debit, 100_000);
        assert_eq!(draft.lines[1].account_id, AccountId::new("owner_capital"));
        assert_eq!(draft.lines[1].credit, 100_000);
    }
}
