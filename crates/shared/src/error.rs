//! Application-wide error types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Error taxonomy shared by every ledger component.
///
/// Every domain error maps onto exactly one kind. None of them leave partial
/// state behind, so callers may retry with corrected input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or invalid input, rejected before any state change.
    Validation,
    /// Operation not legal in the entity's current state.
    State,
    /// Entity missing or owned by another tenant.
    Referential,
    /// Statement matching rejected.
    Reconciliation,
    /// Cached state disagrees with the transaction log.
    Integrity,
}

/// Malformed external input (amount cells, dates, windows).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Amount is not a decimal literal.
    #[error("Malformed amount: '{0}'")]
    MalformedAmount(String),

    /// Date is not in an accepted format.
    #[error("Malformed date: '{0}'")]
    MalformedDate(String),

    /// Window start is after its end.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },
}

impl InputError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedAmount(_) => "MALFORMED_AMOUNT",
            Self::MalformedDate(_) => "MALFORMED_DATE",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
        }
    }
}

/// Application error types.
///
/// The boundary error a request-handling layer works with. Domain errors
/// convert into it, keeping their error code.
#[derive(Debug, Error)]
pub enum AppError {
    /// Validation error.
    #[error("Validation error: {message}")]
    Validation {
        /// Machine-readable code of the originating error.
        code: &'static str,
        /// Human-readable message.
        message: String,
    },

    /// Operation not allowed in the current state.
    #[error("Invalid state: {message}")]
    State {
        /// Machine-readable code of the originating error.
        code: &'static str,
        /// Human-readable message.
        message: String,
    },

    /// Resource not found.
    #[error("Not found: {message}")]
    NotFound {
        /// Machine-readable code of the originating error.
        code: &'static str,
        /// Human-readable message.
        message: String,
    },

    /// Reconciliation conflict (e.g., line already matched).
    #[error("Conflict: {message}")]
    Conflict {
        /// Machine-readable code of the originating error.
        code: &'static str,
        /// Human-readable message.
        message: String,
    },

    /// Data integrity violation.
    #[error("Integrity violation: {message}")]
    Integrity {
        /// Machine-readable code of the originating error.
        code: &'static str,
        /// Human-readable message.
        message: String,
    },
}

impl AppError {
    /// Builds an `AppError` from a classified domain error.
    #[must_use]
    pub fn classified(kind: ErrorKind, code: &'static str, message: String) -> Self {
        match kind {
            ErrorKind::Validation => Self::Validation { code, message },
            ErrorKind::State => Self::State { code, message },
            ErrorKind::Referential => Self::NotFound { code, message },
            ErrorKind::Reconciliation => Self::Conflict { code, message },
            ErrorKind::Integrity => Self::Integrity { code, message },
        }
    }

    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::State { .. } => ErrorKind::State,
            Self::NotFound { .. } => ErrorKind::Referential,
            Self::Conflict { .. } => ErrorKind::Reconciliation,
            Self::Integrity { .. } => ErrorKind::Integrity,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::NotFound { .. } => 404,
            Self::State { .. } | Self::Conflict { .. } => 409,
            Self::Integrity { .. } => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { code, .. }
            | Self::State { code, .. }
            | Self::NotFound { code, .. }
            | Self::Conflict { code, .. }
            | Self::Integrity { code, .. } => *code,
        }
    }
}

impl From<InputError> for AppError {
    fn from(err: InputError) -> Self {
        Self::Validation {
            code: err.error_code(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorKind::Validation, 400)]
    #[case(ErrorKind::State, 409)]
    #[case(ErrorKind::Referential, 404)]
    #[case(ErrorKind::Reconciliation, 409)]
    #[case(ErrorKind::Integrity, 500)]
    fn test_error_status_codes(#[case] kind: ErrorKind, #[case] status: u16) {
        let err = AppError::classified(kind, "CODE", "msg".into());
        assert_eq!(err.status_code(), status);
        assert_eq!(err.kind(), kind);
        assert_eq!(err.error_code(), "CODE");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::classified(ErrorKind::Validation, "X", "msg".into()).to_string(),
            "Validation error: msg"
        );
        assert_eq!(
            AppError::classified(ErrorKind::Referential, "X", "msg".into()).to_string(),
            "Not found: msg"
        );
        assert_eq!(
            AppError::classified(ErrorKind::Reconciliation, "X", "msg".into()).to_string(),
            "Conflict: msg"
        );
    }

    #[test]
    fn test_input_error_converts_to_validation() {
        let err: AppError = InputError::MalformedAmount("1,2".into()).into();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.error_code(), "MALFORMED_AMOUNT");
        assert_eq!(err.to_string(), "Validation error: Malformed amount: '1,2'");
    }
}
