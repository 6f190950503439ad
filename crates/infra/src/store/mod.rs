//! Backing-store seam: the document-store abstraction and its in-memory
//! implementation.

pub mod in_memory;
pub mod ledger_store;

pub use in_memory::InMemoryLedgerStore;
pub use ledger_store::{
    AccountWrite, CounterWrite, LedgerStore, PostingCommit, StoreError, Versioned,
};
