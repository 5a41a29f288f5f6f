//! Repository abstractions over the tenant books.
//!
//! Repositories are thin: they find the tenant's book, take the right lock,
//! and hand the actual rules to `riska-core`.

pub mod account;
pub mod budget;
pub mod reconciliation;
pub mod report;
pub mod transaction;

pub use account::{AccountFilter, AccountRepository, CreateAccountInput};
pub use budget::BudgetRepository;
pub use reconciliation::ReconciliationRepository;
pub use report::ReportRepository;
pub use transaction::{TransactionFilter, TransactionRepository};
