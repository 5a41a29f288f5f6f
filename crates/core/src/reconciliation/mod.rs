//! Bank reconciliation.
//!
//! Bank accounts mirror one asset GL account. Imported statement lines are
//! matched one-to-one against posted lines on that account when the signed
//! amounts agree exactly.

pub mod error;
pub mod matcher;
pub mod types;

pub use error::{MatchSide, ReconciliationError};
pub use matcher::{MatchBook, ReconciliationService};
pub use types::{
    BankAccount, BankAccountRemoval, LedgerLineView, MatchedPair, RawStatementRow,
    ReconciliationView, SkipReason, SkippedRow, StatementImportSummary, StatementLine,
    StatementLineInput,
};
