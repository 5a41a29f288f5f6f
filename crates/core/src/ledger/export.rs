//! Tabular export of transactions.
//!
//! Rows are plain values; encoding them (CSV, spreadsheet) is left to the caller.

use std::collections::HashMap;

use chrono::NaiveDate;
use riska_shared::types::AccountId;
use rust_decimal::Decimal;
use serde::Serialize;

use super::types::{Transaction, TransactionStatus};
use crate::accounts::Account;

/// One exported line with its transaction header repeated.
///
/// A transaction without lines still exports one header-only row whose
/// account and amount cells are empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    /// Transaction reference.
    pub reference: String,
    /// Transaction date.
    pub date: NaiveDate,
    /// Transaction memo.
    pub memo: String,
    /// Transaction status.
    pub status: TransactionStatus,
    /// Account number of the line.
    pub account_number: String,
    /// Account name of the line.
    pub account_name: String,
    /// Line debit; `None` on a header-only row.
    pub debit: Option<Decimal>,
    /// Line credit; `None` on a header-only row.
    pub credit: Option<Decimal>,
    /// Line memo.
    pub line_memo: String,
}

impl ExportRow {
    /// Column headers, in record order.
    pub const COLUMNS: [&'static str; 9] = [
        "Reference",
        "Date",
        "Memo",
        "Status",
        "Account",
        "Account Name",
        "Debit",
        "Credit",
        "Line Memo",
    ];

    /// The row as text cells, in [`Self::COLUMNS`] order.
    #[must_use]
    pub fn to_record(&self) -> [String; 9] {
        [
            self.reference.clone(),
            self.date.format("%Y-%m-%d").to_string(),
            self.memo.clone(),
            self.status.to_string(),
            self.account_number.clone(),
            self.account_name.clone(),
            self.debit.map(|d| d.to_string()).unwrap_or_default(),
            self.credit.map(|c| c.to_string()).unwrap_or_default(),
            self.line_memo.clone(),
        ]
    }
}

/// Rows for one transaction, one per line in line order.
///
/// A transaction with no lines yields a single header-only row.
#[must_use]
pub fn export_transaction(
    txn: &Transaction,
    accounts: &HashMap<AccountId, Account>,
) -> Vec<ExportRow> {
    let header = |account_number, account_name, debit, credit, line_memo| ExportRow {
        reference: txn.reference.clone(),
        date: txn.date,
        memo: txn.memo.clone(),
        status: txn.status(),
        account_number,
        account_name,
        debit,
        credit,
        line_memo,
    };

    if txn.lines().is_empty() {
        return vec![header(String::new(), String::new(), None, None, String::new())];
    }

    txn.lines()
        .iter()
        .map(|line| {
            let (account_number, account_name) = accounts
                .get(&line.account_id)
                .map(|a| (a.number.clone(), a.name.clone()))
                .unwrap_or_default();
            header(
                account_number,
                account_name,
                Some(line.debit),
                Some(line.credit),
                line.memo.clone(),
            )
        })
        .collect()
}

/// Rows for many transactions, in the order given.
pub fn export_all<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    accounts: &HashMap<AccountId, Account>,
) -> Vec<ExportRow> {
    transactions
        .into_iter()
        .flat_map(|txn| export_transaction(txn, accounts))
        .collect()
}
