use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use goldfinance_core::{AccountId, LedgerError, LedgerResult, VoucherId};

use crate::chart::ChartAccount;

/// Business meaning of a voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoucherKind {
    LoanDisbursement,
    LoanRepayment,
    InterestCollection,
    Writeoff,
    Adjustment,
    OpeningBalance,
}

impl VoucherKind {
    /// Voucher-number prefix (`LD-20260806-001`).
    pub fn prefix(&self) -> &'static str {
        match self {
            VoucherKind::LoanDisbursement => "LD",
            VoucherKind::LoanRepayment => "LR",
            VoucherKind::InterestCollection => "IC",
            VoucherKind::Writeoff => "WO",
            VoucherKind::Adjustment => "JE",
            VoucherKind::OpeningBalance => "OB",
        }
    }
}

/// One debit-or-credit line within a voucher (immutable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    pub account_id: AccountId,
    /// Denormalized for display; the account document stays authoritative.
    pub account_code: String,
    pub account_name: String,
    /// Amounts in smallest currency unit (paise). At most one side is
    /// nonzero by convention; only the voucher-level balance is enforced.
    pub debit: i64,
    pub credit: i64,
    pub description: String,
}

impl JournalLine {
    pub fn new(
        account_id: impl Into<AccountId>,
        account_code: impl Into<String>,
        account_name: impl Into<String>,
        debit: i64,
        credit: i64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            account_code: account_code.into(),
            account_name: account_name.into(),
            debit,
            credit,
            description: description.into(),
        }
    }

    /// Debit line against a chart account.
    pub fn debit(account: &ChartAccount, amount: i64, description: impl Into<String>) -> Self {
        Self::new(account.id, account.code, account.name, amount, 0, description)
    }

    /// Credit line against a chart account.
    pub fn credit(account: &ChartAccount, amount: i64, description: impl Into<String>) -> Self {
        Self::new(account.id, account.code, account.name, 0, amount, description)
    }

    /// Signed movement this line applies to its account (debit-positive).
    pub fn signed_amount(&self) -> i64 {
        self.debit - self.credit
    }
}

/// Sum debit and credit totals in `i128` so the comparison cannot overflow.
pub fn totals(lines: &[JournalLine]) -> (i128, i128) {
    let mut debits: i128 = 0;
    let mut credits: i128 = 0;
    for line in lines {
        debits += line.debit as i128;
        credits += line.credit as i128;
    }
    (debits, credits)
}

fn validate_lines(lines: &[JournalLine]) -> LedgerResult<i128> {
    if lines.len() < 2 {
        return Err(LedgerError::validation(
            "a voucher needs at least two journal lines",
        ));
    }

    for line in lines {
        if line.debit < 0 || line.credit < 0 {
            return Err(LedgerError::validation(format!(
                "negative amount on account {}",
                line.account_id
            )));
        }
    }

    let (debits, credits) = totals(lines);
    if debits != credits {
        return Err(LedgerError::UnbalancedEntry { debits, credits });
    }

    Ok(debits)
}

/// A voucher that has not been committed yet.
///
/// Carries no id, voucher number, or `created_at`; those are assigned
/// during posting. Construct via [`VoucherDraft::new`], which rejects
/// malformed shapes at the boundary rather than at use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherDraft {
    pub kind: VoucherKind,
    /// Caller-supplied business date; may not reflect commit order.
    pub date: DateTime<Utc>,
    pub description: String,
    /// Optional foreign reference (e.g. the loan document id).
    pub reference: Option<String>,
    pub lines: Vec<JournalLine>,
    /// Derived: equals the debit total.
    pub total_amount: i64,
    pub created_by: String,
}

impl VoucherDraft {
    pub fn new(
        kind: VoucherKind,
        date: DateTime<Utc>,
        description: impl Into<String>,
        reference: Option<String>,
        lines: Vec<JournalLine>,
        created_by: impl Into<String>,
    ) -> LedgerResult<Self> {
        let debits = validate_lines(&lines)?;
        let total_amount = i64::try_from(debits)
            .map_err(|_| LedgerError::validation("voucher total overflows i64"))?;

        Ok(Self {
            kind,
            date,
            description: description.into(),
            reference,
            lines,
            total_amount,
            created_by: created_by.into(),
        })
    }

    /// Re-run the shape and balance checks.
    ///
    /// The posting path validates every draft it receives, including
    /// hand-built or deserialized ones that skipped [`VoucherDraft::new`].
    pub fn ensure_valid(&self) -> LedgerResult<()> {
        let debits = validate_lines(&self.lines)?;
        if debits != self.total_amount as i128 {
            return Err(LedgerError::validation(format!(
                "total_amount {} does not match debit total {debits}",
                self.total_amount
            )));
        }
        Ok(())
    }

    /// Referenced account ids, deduplicated, first-use order.
    pub fn account_ids(&self) -> Vec<AccountId> {
        let mut seen = Vec::new();
        for line in &self.lines {
            if !seen.contains(&line.account_id) {
                seen.push(line.account_id.clone());
            }
        }
        seen
    }
}

/// One document in the `vouchers` collection.
///
/// Immutable once created: there is no update or delete path; corrections
/// are posted as new offsetting vouchers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voucher {
    pub id: VoucherId,
    /// Human-readable, type-prefixed, unique (e.g. `LR-20260806-014`).
    pub voucher_number: String,
    pub kind: VoucherKind,
    pub date: DateTime<Utc>,
    pub description: String,
    pub reference: Option<String>,
    pub lines: Vec<JournalLine>,
    pub total_amount: i64,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Voucher {
    /// Promote a validated draft with its store-assigned identity.
    pub fn from_draft(
        draft: VoucherDraft,
        id: VoucherId,
        voucher_number: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            voucher_number,
            kind: draft.kind,
            date: draft.date,
            description: draft.description,
            reference: draft.reference,
            lines: draft.lines,
            total_amount: draft.total_amount,
            created_by: draft.created_by,
            created_at,
        }
    }
}
