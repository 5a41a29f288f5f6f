//! Ledger error types for validation and state errors.

use riska_shared::types::{AccountId, TransactionId};
use riska_shared::{AppError, ErrorKind, InputError};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Debits and credits differ at posting time.
    #[error("Transaction is not balanced. Debit: {debit_total}, Credit: {credit_total}")]
    UnbalancedEntry {
        /// Sum of debits.
        debit_total: Decimal,
        /// Sum of credits.
        credit_total: Decimal,
    },

    /// Transaction has no lines.
    #[error("Transaction has no lines")]
    EmptyTransaction,

    /// A line amount is negative.
    #[error("Line {line}: amounts cannot be negative")]
    NegativeAmount {
        /// Zero-based line index.
        line: usize,
    },

    /// A line carries both a debit and a credit.
    #[error("Line {line}: specify either a debit or a credit, not both")]
    BothSidesSet {
        /// Zero-based line index.
        line: usize,
    },

    /// An import row names an account number unknown to the tenant.
    #[error("Row {row}: unknown account number '{account_number}'")]
    UnknownAccountNumber {
        /// One-based row number.
        row: usize,
        /// The unresolved account number.
        account_number: String,
    },

    /// Imported rows do not balance.
    #[error("Import batch is not balanced. Debit: {debit_total}, Credit: {credit_total}")]
    UnbalancedBatch {
        /// Sum of debits.
        debit_total: Decimal,
        /// Sum of credits.
        credit_total: Decimal,
    },

    /// Malformed amount or date input.
    #[error(transparent)]
    Input(#[from] InputError),

    // ========== Account Errors ==========
    /// Account not found (or owned by another tenant).
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Account is inactive and cannot receive new lines.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountId),

    // ========== Transaction State Errors ==========
    /// Operation requires a Draft transaction.
    #[error("Transaction {0} is not a draft")]
    NotDraft(TransactionId),

    /// Operation requires a Posted transaction.
    #[error("Transaction {0} is not posted")]
    NotPosted(TransactionId),

    /// Transaction already has a reversing entry.
    #[error("Transaction {original} was already reversed by {reversal}")]
    AlreadyReversed {
        /// The original transaction.
        original: TransactionId,
        /// The existing reversal.
        reversal: TransactionId,
    },

    /// Transaction not found (or owned by another tenant).
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::EmptyTransaction => "EMPTY_TRANSACTION",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::BothSidesSet { .. } => "BOTH_SIDES_SET",
            Self::UnknownAccountNumber { .. } => "UNKNOWN_ACCOUNT_NUMBER",
            Self::UnbalancedBatch { .. } => "UNBALANCED_BATCH",
            Self::Input(err) => err.error_code(),
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::NotDraft(_) => "NOT_DRAFT",
            Self::NotPosted(_) => "NOT_POSTED",
            Self::AlreadyReversed { .. } => "ALREADY_REVERSED",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
        }
    }

    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnbalancedEntry { .. }
            | Self::EmptyTransaction
            | Self::NegativeAmount { .. }
            | Self::BothSidesSet { .. }
            | Self::UnknownAccountNumber { .. }
            | Self::UnbalancedBatch { .. }
            | Self::Input(_)
            | Self::AccountInactive(_) => ErrorKind::Validation,
            Self::NotDraft(_) | Self::NotPosted(_) | Self::AlreadyReversed { .. } => {
                ErrorKind::State
            }
            Self::AccountNotFound(_) | Self::TransactionNotFound(_) => ErrorKind::Referential,
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        Self::classified(err.kind(), err.error_code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::UnbalancedEntry {
                debit_total: dec!(100),
                credit_total: dec!(90),
            }
            .error_code(),
            "UNBALANCED_ENTRY"
        );
        assert_eq!(LedgerError::EmptyTransaction.error_code(), "EMPTY_TRANSACTION");
        assert_eq!(
            LedgerError::from(InputError::MalformedAmount("x".into())).error_code(),
            "MALFORMED_AMOUNT"
        );
    }

    #[test]
    fn test_error_kinds() {
        let id = TransactionId::new();
        assert_eq!(LedgerError::NotDraft(id).kind(), ErrorKind::State);
        assert_eq!(LedgerError::TransactionNotFound(id).kind(), ErrorKind::Referential);
        assert_eq!(LedgerError::EmptyTransaction.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_unbalanced_message_carries_totals() {
        let err = LedgerError::UnbalancedEntry {
            debit_total: dec!(100),
            credit_total: dec!(90),
        };
        assert_eq!(
            err.to_string(),
            "Transaction is not balanced. Debit: 100, Credit: 90"
        );
        let app: AppError = err.into();
        assert_eq!(app.status_code(), 400);
    }
}
