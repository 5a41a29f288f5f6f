//! Reversing entries for posted transactions.
//!
//! Posted transactions are never mutated. A correction (void, refund) is a
//! new transaction whose lines swap every debit and credit of the original.

use chrono::NaiveDate;

use super::error::LedgerError;
use super::types::{EntrySource, LineInput, NewTransaction, Transaction};

/// Stateless service for creating reversing entries.
pub struct ReversalService;

impl ReversalService {
    /// Swaps debit and credit on every line, preserving account and memo.
    #[must_use]
    pub fn reversing_lines(original: &Transaction) -> Vec<LineInput> {
        original
            .lines()
            .iter()
            .map(|line| LineInput {
                account_id: line.account_id,
                debit: line.credit,
                credit: line.debit,
                memo: if line.memo.is_empty() {
                    "Reversal".to_string()
                } else {
                    format!("Reversal: {}", line.memo)
                },
            })
            .collect()
    }

    /// Builds the offsetting transaction for a posted one.
    ///
    /// The memo defaults to `Reversal of {reference}`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotPosted` if `original` is still a draft.
    pub fn build(
        original: &Transaction,
        date: NaiveDate,
        memo: Option<String>,
    ) -> Result<NewTransaction, LedgerError> {
        if !original.is_posted() {
            return Err(LedgerError::NotPosted(original.id));
        }

        let memo = memo.unwrap_or_else(|| format!("Reversal of {}", original.reference));
        Ok(NewTransaction::new(date, memo, Self::reversing_lines(original))
            .with_source(EntrySource::Reversal))
    }
}
