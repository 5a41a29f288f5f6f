//! Double-entry bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - Transactions (vouchers), lines and the Draft → Posted state machine
//! - Business rule validation
//! - The posting engine, the single path that mutates account balances
//! - Reversing entries for posted transactions
//! - Bulk import and tabular export
//! - Error types for ledger operations

pub mod error;
pub mod export;
pub mod import;
pub mod posting;
pub mod reversal;
pub mod types;
pub mod validation;

pub use error::LedgerError;
pub use export::{ExportRow, export_all, export_transaction};
pub use import::{ImportRow, resolve_import};
pub use posting::{BalanceChange, PostingEngine, PostingReceipt, RecomputeOutcome};
pub use reversal::ReversalService;
pub use types::{
    EntrySource, Line, LineInput, NewTransaction, Transaction, TransactionStatus,
    TransactionTotals,
};
pub use validation::{validate_for_posting, validate_line_accounts, validate_line_amounts};
