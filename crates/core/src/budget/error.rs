//! Budget error types.

use riska_shared::types::{AccountId, BudgetId};
use riska_shared::{AppError, ErrorKind, InputError};
use thiserror::Error;

use crate::accounts::AccountClass;

/// Budget-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetError {
    /// Budget not found (or owned by another tenant).
    #[error("Budget not found: {0}")]
    NotFound(BudgetId),

    /// No budget exists for the requested year.
    #[error("No budget found for year {0}")]
    NoBudgetForYear(i32),

    /// The tenant has no budget at all.
    #[error("No budgets exist")]
    NoBudgets,

    /// Budget name is blank.
    #[error("Budget name is required")]
    MissingName,

    /// Account not found (or owned by another tenant).
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Only income statement accounts can be budgeted.
    #[error("Account {account_id} ({class}) cannot be budgeted")]
    AccountNotBudgetable {
        /// The account.
        account_id: AccountId,
        /// Its classification.
        class: AccountClass,
    },

    /// The budget already has an item for this account.
    #[error("Budget already has an item for account {0}")]
    DuplicateItem(AccountId),

    /// Amount cannot be negative.
    #[error("Amount cannot be negative")]
    NegativeAmount,

    /// Malformed year or amount input.
    #[error(transparent)]
    Input(#[from] InputError),
}

impl BudgetError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "BUDGET_NOT_FOUND",
            Self::NoBudgetForYear(_) => "NO_BUDGET_FOR_YEAR",
            Self::NoBudgets => "NO_BUDGETS",
            Self::MissingName => "MISSING_NAME",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountNotBudgetable { .. } => "ACCOUNT_NOT_BUDGETABLE",
            Self::DuplicateItem(_) => "DUPLICATE_BUDGET_ITEM",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::Input(err) => err.error_code(),
        }
    }

    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_)
            | Self::NoBudgetForYear(_)
            | Self::NoBudgets
            | Self::AccountNotFound(_) => ErrorKind::Referential,
            Self::MissingName
            | Self::AccountNotBudgetable { .. }
            | Self::DuplicateItem(_)
            | Self::NegativeAmount
            | Self::Input(_) => ErrorKind::Validation,
        }
    }
}

impl From<BudgetError> for AppError {
    fn from(err: BudgetError) -> Self {
        Self::classified(err.kind(), err.error_code(), err.to_string())
    }
}
