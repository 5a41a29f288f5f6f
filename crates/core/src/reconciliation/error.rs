//! Reconciliation error types.

use riska_shared::types::{AccountId, BankAccountId, LineId, StatementLineId};
use riska_shared::{AppError, ErrorKind, InputError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::accounts::AccountClass;

/// Which side of a proposed match was already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSide {
    /// The bank statement line.
    Statement,
    /// The ledger line.
    Ledger,
}

impl std::fmt::Display for MatchSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Statement => f.write_str("statement line"),
            Self::Ledger => f.write_str("ledger line"),
        }
    }
}

/// Errors raised by bank account, statement and matching operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconciliationError {
    // ========== Matching ==========
    /// One side already has a counterpart.
    #[error("The {side} is already matched")]
    AlreadyMatched {
        /// The side that is taken.
        side: MatchSide,
    },

    /// Statement amount differs from the ledger line's net effect on the bank account.
    #[error("Amount mismatch: statement {statement_amount} vs ledger {ledger_net_amount}")]
    AmountMismatch {
        /// Signed statement amount.
        statement_amount: Decimal,
        /// Signed contribution of the ledger line on the bank GL account.
        ledger_net_amount: Decimal,
    },

    /// Ledger line belongs to a transaction that is not posted.
    #[error("Ledger line {0} is not posted")]
    LineNotPosted(LineId),

    /// Ledger line does not post to the bank account's GL account.
    #[error("Ledger line {line_id} is not on GL account {gl_account_id}")]
    LineNotOnBankAccount {
        /// The ledger line.
        line_id: LineId,
        /// The bank account's GL mirror.
        gl_account_id: AccountId,
    },

    // ========== Bank Accounts ==========
    /// GL mirror must be an asset-family account.
    #[error("Account {account_id} ({class}) cannot mirror a bank account")]
    GlAccountNotAsset {
        /// The account.
        account_id: AccountId,
        /// Its classification.
        class: AccountClass,
    },

    /// GL account already mirrors another bank account.
    #[error("Account {0} already mirrors a bank account")]
    GlAccountAlreadyMirrored(AccountId),

    /// A required field was blank.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Malformed statement input.
    #[error(transparent)]
    Input(#[from] InputError),

    // ========== Not Found ==========
    /// Bank account not found (or owned by another tenant).
    #[error("Bank account not found: {0}")]
    BankAccountNotFound(BankAccountId),

    /// Statement line not found (or owned by another tenant).
    #[error("Statement line not found: {0}")]
    StatementLineNotFound(StatementLineId),

    /// Ledger line not found (or owned by another tenant).
    #[error("Ledger line not found: {0}")]
    LedgerLineNotFound(LineId),

    /// GL account not found (or owned by another tenant).
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),
}

impl ReconciliationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyMatched { .. } => "ALREADY_MATCHED",
            Self::AmountMismatch { .. } => "AMOUNT_MISMATCH",
            Self::LineNotPosted(_) => "LINE_NOT_POSTED",
            Self::LineNotOnBankAccount { .. } => "LINE_NOT_ON_BANK_ACCOUNT",
            Self::GlAccountNotAsset { .. } => "GL_ACCOUNT_NOT_ASSET",
            Self::GlAccountAlreadyMirrored(_) => "GL_ACCOUNT_ALREADY_MIRRORED",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::Input(err) => err.error_code(),
            Self::BankAccountNotFound(_) => "BANK_ACCOUNT_NOT_FOUND",
            Self::StatementLineNotFound(_) => "STATEMENT_LINE_NOT_FOUND",
            Self::LedgerLineNotFound(_) => "LEDGER_LINE_NOT_FOUND",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
        }
    }

    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyMatched { .. }
            | Self::AmountMismatch { .. }
            | Self::LineNotPosted(_)
            | Self::LineNotOnBankAccount { .. } => ErrorKind::Reconciliation,
            Self::GlAccountNotAsset { .. }
            | Self::GlAccountAlreadyMirrored(_)
            | Self::MissingField(_)
            | Self::Input(_) => ErrorKind::Validation,
            Self::BankAccountNotFound(_)
            | Self::StatementLineNotFound(_)
            | Self::LedgerLineNotFound(_)
            | Self::AccountNotFound(_) => ErrorKind::Referential,
        }
    }
}

impl From<ReconciliationError> for AppError {
    fn from(err: ReconciliationError) -> Self {
        Self::classified(err.kind(), err.error_code(), err.to_string())
    }
}
