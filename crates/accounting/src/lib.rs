//! `goldfinance-accounting` — double-entry domain model.
//!
//! Pure domain: account and voucher shapes, the fixed chart of accounts,
//! and the generators that translate the pawnshop's business events into
//! balanced vouchers. No IO here; persistence and the posting transaction
//! live in `goldfinance-infra`.

pub mod account;
pub mod chart;
pub mod generators;
pub mod voucher;

pub use account::{Account, AccountKind, AccountSubKind, TrialBalanceRow};
pub use chart::{seed_accounts, ChartAccount, CHART};
pub use voucher::{totals, JournalLine, Voucher, VoucherDraft, VoucherKind};
