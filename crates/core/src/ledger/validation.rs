//! Business rule validation for ledger operations.

use std::collections::HashMap;

use riska_shared::types::AccountId;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{LineInput, Transaction, TransactionTotals};
use crate::accounts::Account;

/// Checks each line's amounts: both non-negative, at most one non-zero.
///
/// A line with both amounts zero is a legal no-op.
///
/// # Errors
///
/// Returns `NegativeAmount` or `BothSidesSet` naming the first bad line.
pub fn validate_line_amounts(lines: &[LineInput]) -> Result<(), LedgerError> {
    for (line, input) in lines.iter().enumerate() {
        if input.debit < Decimal::ZERO || input.credit < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount { line });
        }
        if input.debit > Decimal::ZERO && input.credit > Decimal::ZERO {
            return Err(LedgerError::BothSidesSet { line });
        }
    }
    Ok(())
}

/// Checks that every line references an account of the tenant.
///
/// `accounts` holds exactly one tenant's chart, so an account from another
/// tenant is reported as not found.
///
/// # Errors
///
/// Returns `AccountNotFound`, or `AccountInactive` when `reject_inactive` is set.
pub fn validate_line_accounts(
    lines: &[LineInput],
    accounts: &HashMap<AccountId, Account>,
    reject_inactive: bool,
) -> Result<(), LedgerError> {
    for line in lines {
        let account = accounts
            .get(&line.account_id)
            .ok_or(LedgerError::AccountNotFound(line.account_id))?;
        if reject_inactive && !account.is_active {
            return Err(LedgerError::AccountInactive(account.id));
        }
    }
    Ok(())
}

/// Validates a transaction for posting.
///
/// Checks run in order: still Draft, balanced, non-empty.
///
/// # Errors
///
/// Returns `NotDraft`, `UnbalancedEntry` or `EmptyTransaction`.
pub fn validate_for_posting(txn: &Transaction) -> Result<TransactionTotals, LedgerError> {
    if !txn.status().is_editable() {
        return Err(LedgerError::NotDraft(txn.id));
    }

    let totals = txn.totals();
    if !totals.is_balanced {
        return Err(LedgerError::UnbalancedEntry {
            debit_total: totals.debit_total,
            credit_total: totals.credit_total,
        });
    }

    if txn.lines().is_empty() {
        return Err(LedgerError::EmptyTransaction);
    }

    Ok(totals)
}
