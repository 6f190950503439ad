//! `goldfinance-infra` — persistence seam and application services.
//!
//! The write side ([`LedgerService`]) and read side ([`LedgerReports`]) over
//! the [`LedgerStore`] abstraction, plus the in-memory store used by tests
//! and development.

pub mod reports;
pub mod service;
pub mod store;


pub use reports::{DayBook, LedgerReports, LedgerRow};
pub use service::{LedgerConfig, LedgerService};
pub use store::{InMemoryLedgerStore, LedgerStore, StoreError};
