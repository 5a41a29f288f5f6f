//! Report error types.

use riska_shared::types::AccountId;
use riska_shared::{AppError, ErrorKind, InputError};
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// Account not found (or owned by another tenant).
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Malformed report window.
    #[error(transparent)]
    Input(#[from] InputError),
}

impl ReportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::Input(err) => err.error_code(),
        }
    }

    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AccountNotFound(_) => ErrorKind::Referential,
            Self::Input(_) => ErrorKind::Validation,
        }
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        Self::classified(err.kind(), err.error_code(), err.to_string())
    }
}
