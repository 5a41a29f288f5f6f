//! Bulk import of proposed lines keyed by account number.

use riska_shared::types::{AccountId, parse_amount};
use serde::{Deserialize, Serialize};

use super::error::LedgerError;
use super::types::{LineInput, TransactionTotals};
use super::validation::validate_line_amounts;

/// One row of an external tabular file: account number, debit, credit, memo.
///
/// Amount cells are raw text; a blank cell means zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRow {
    /// Tenant account number.
    pub account_number: String,
    /// Debit cell.
    #[serde(default)]
    pub debit: String,
    /// Credit cell.
    #[serde(default)]
    pub credit: String,
    /// Line memo.
    #[serde(default)]
    pub memo: String,
}

impl ImportRow {
    /// Convenience constructor.
    #[must_use]
    pub fn new(account_number: &str, debit: &str, credit: &str, memo: &str) -> Self {
        Self {
            account_number: account_number.to_string(),
            debit: debit.to_string(),
            credit: credit.to_string(),
            memo: memo.to_string(),
        }
    }
}

/// Resolves import rows into draft lines.
///
/// The whole batch fails on the first bad row; nothing partial is returned.
///
/// # Errors
///
/// - `UnknownAccountNumber` if `lookup` cannot resolve a row's number
/// - `Input` for an unparseable amount cell
/// - `NegativeAmount` / `BothSidesSet` for malformed line amounts
/// - `EmptyTransaction` for an empty batch
/// - `UnbalancedBatch` if debits and credits differ
pub fn resolve_import(
    rows: &[ImportRow],
    lookup: impl Fn(&str) -> Option<AccountId>,
) -> Result<Vec<LineInput>, LedgerError> {
    let mut lines = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        let number = row.account_number.trim();
        let account_id = lookup(number).ok_or_else(|| LedgerError::UnknownAccountNumber {
            row: index + 1,
            account_number: number.to_string(),
        })?;

        lines.push(LineInput {
            account_id,
            debit: parse_amount(&row.debit)?,
            credit: parse_amount(&row.credit)?,
            memo: row.memo.trim().to_string(),
        });
    }

    validate_line_amounts(&lines)?;

    if lines.is_empty() {
        return Err(LedgerError::EmptyTransaction);
    }

    let totals = TransactionTotals::sum(lines.iter().map(|l| (l.debit, l.credit)));
    if !totals.is_balanced {
        return Err(LedgerError::UnbalancedBatch {
            debit_total: totals.debit_total,
            credit_total: totals.credit_total,
        });
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use riska_shared::InputError;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn chart() -> HashMap<String, AccountId> {
        ["1000", "4000", "6100"]
            .into_iter()
            .map(|n| (n.to_string(), AccountId::new()))
            .collect()
    }

    #[test]
    fn test_resolves_balanced_batch() {
        let chart = chart();
        let rows = vec![
            ImportRow::new("1000", "250.00", "", "deposit"),
            ImportRow::new(" 4000 ", "", "250.00", " sale "),
        ];

        let lines = resolve_import(&rows, |n| chart.get(n).copied()).unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].account_id, chart["1000"]);
        assert_eq!(lines[0].debit, dec!(250.00));
        assert_eq!(lines[0].credit, Decimal::ZERO);
        assert_eq!(lines[1].account_id, chart["4000"]);
        assert_eq!(lines[1].memo, "sale");
    }

    #[test]
    fn test_unknown_account_fails_whole_batch() {
        let chart = chart();
        let rows = vec![
            ImportRow::new("1000", "10", "", ""),
            ImportRow::new("9999", "", "10", ""),
        ];
        assert_eq!(
            resolve_import(&rows, |n| chart.get(n).copied()),
            Err(LedgerError::UnknownAccountNumber {
                row: 2,
                account_number: "9999".into(),
            })
        );
    }

    #[test]
    fn test_unbalanced_batch() {
        let chart = chart();
        let rows = vec![
            ImportRow::new("6100", "100", "", ""),
            ImportRow::new("1000", "", "90", ""),
        ];
        assert_eq!(
            resolve_import(&rows, |n| chart.get(n).copied()),
            Err(LedgerError::UnbalancedBatch {
                debit_total: dec!(100),
                credit_total: dec!(90),
            })
        );
    }

    #[test]
    fn test_malformed_amount() {
        let chart = chart();
        let rows = vec![ImportRow::new("1000", "12,00", "", "")];
        assert_eq!(
            resolve_import(&rows, |n| chart.get(n).copied()),
            Err(LedgerError::Input(InputError::MalformedAmount("12,00".into())))
        );
    }

    #[test]
    fn test_empty_batch() {
        assert_eq!(
            resolve_import(&[], |_| None),
            Err(LedgerError::EmptyTransaction)
        );
    }
}
