//! Account registry error types.

use riska_shared::types::AccountId;
use riska_shared::{AppError, ErrorKind};
use thiserror::Error;

/// Errors raised by chart-of-accounts operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    /// Another account in the tenant already uses this number.
    #[error("Account number '{0}' already exists")]
    DuplicateAccountNumber(String),

    /// Classification label is not part of the taxonomy.
    #[error("Unknown account classification: '{0}'")]
    UnknownClassification(String),

    /// A required field was blank.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Account not found (or owned by another tenant).
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Account is referenced by ledger lines and cannot be deleted.
    #[error("Account {0} is referenced by ledger lines; deactivate it instead")]
    AccountInUse(AccountId),
}

impl AccountError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateAccountNumber(_) => "DUPLICATE_ACCOUNT_NUMBER",
            Self::UnknownClassification(_) => "UNKNOWN_CLASSIFICATION",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInUse(_) => "ACCOUNT_IN_USE",
        }
    }

    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateAccountNumber(_)
            | Self::UnknownClassification(_)
            | Self::MissingField(_) => ErrorKind::Validation,
            Self::AccountNotFound(_) => ErrorKind::Referential,
            Self::AccountInUse(_) => ErrorKind::State,
        }
    }
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        Self::classified(err.kind(), err.error_code(), err.to_string())
    }
}
