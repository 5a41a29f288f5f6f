//! Tenant-scoped ledger store.
//!
//! This crate owns state and concurrency for the pure logic in `riska-core`:
//! - [`Store`]: one book per tenant behind its own lock
//! - Repositories for accounts, transactions, reports, budgets and
//!   bank reconciliation
//!
//! Every operation takes a tenant ID. Entities of another tenant are
//! indistinguishable from missing ones.

pub mod book;
pub mod repositories;
pub mod store;

pub use book::Book;
pub use repositories::{
    AccountFilter, AccountRepository, BudgetRepository, CreateAccountInput,
    ReconciliationRepository, ReportRepository, TransactionFilter, TransactionRepository,
};
pub use store::Store;
