//! Report data types.

use std::sync::Arc;

use chrono::NaiveDate;
use riska_shared::types::{AccountId, DateRange, LineId, TransactionId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accounts::{Account, AccountClass, AccountFamily};
use crate::ledger::Transaction;

/// Read-only view of one tenant's ledger that reports are computed from.
///
/// Transactions are shared, so taking a snapshot copies pointers, not lines.
/// Their order is posting order.
#[derive(Debug, Clone, Default)]
pub struct LedgerSnapshot {
    /// The tenant's chart of accounts.
    pub accounts: Vec<Account>,
    /// Posted transactions, in posting order.
    pub transactions: Vec<Arc<Transaction>>,
    /// Tenant currency code.
    pub currency: String,
}

impl LedgerSnapshot {
    /// Creates a snapshot.
    #[must_use]
    pub fn new(
        accounts: Vec<Account>,
        transactions: Vec<Arc<Transaction>>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            accounts,
            transactions,
            currency: currency.into(),
        }
    }

    /// Looks up an account by ID.
    #[must_use]
    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }
}

/// Net activity of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// Account ID.
    pub account_id: AccountId,
    /// Account number.
    pub number: String,
    /// Account name.
    pub name: String,
    /// Classification.
    pub class: AccountClass,
    /// Reporting family.
    pub family: AccountFamily,
    /// Total debit amount.
    pub total_debit: Decimal,
    /// Total credit amount.
    pub total_credit: Decimal,
    /// Net balance, signed per the account's polarity.
    pub balance: Decimal,
}

/// One trial balance row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account ID.
    pub account_id: AccountId,
    /// Account number.
    pub number: String,
    /// Account name.
    pub name: String,
    /// Classification.
    pub class: AccountClass,
    /// Debit column.
    pub debit: Decimal,
    /// Credit column.
    pub credit: Decimal,
}

/// Trial balance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// Report type identifier.
    pub report_type: String,
    /// As of date.
    pub as_of: NaiveDate,
    /// Currency code.
    pub currency: String,
    /// One row per account, ordered by account number.
    pub rows: Vec<TrialBalanceRow>,
    /// Totals.
    pub totals: TrialBalanceTotals,
}

/// Trial balance totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceTotals {
    /// Total debit.
    pub total_debit: Decimal,
    /// Total credit.
    pub total_credit: Decimal,
    /// Whether debits equal credits.
    pub is_balanced: bool,
}

/// Income statement section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncomeStatementSection {
    /// Section total.
    pub total: Decimal,
    /// Accounts in this section.
    pub accounts: Vec<AccountBalance>,
}

/// Income statement report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStatementReport {
    /// Report type identifier.
    pub report_type: String,
    /// Period covered (inclusive).
    pub period: DateRange,
    /// Currency code.
    pub currency: String,
    /// Income section.
    pub income: IncomeStatementSection,
    /// Cost of goods sold section.
    pub cost_of_sales: IncomeStatementSection,
    /// Gross profit (income - cost of sales).
    pub gross_profit: Decimal,
    /// Operating expenses section.
    pub expenses: IncomeStatementSection,
    /// Net operating income (gross profit - expenses).
    pub net_operating_income: Decimal,
    /// Other income section.
    pub other_income: IncomeStatementSection,
    /// Other expense section.
    pub other_expenses: IncomeStatementSection,
    /// Other income - other expenses.
    pub net_other_income: Decimal,
    /// Net operating income + net other income.
    pub net_income: Decimal,
}

/// Balance sheet section (assets, liabilities, equity).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceSheetSection {
    /// Section total.
    pub total: Decimal,
    /// Accounts in this section.
    pub accounts: Vec<AccountBalance>,
}

/// Balance sheet report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// Report type identifier.
    pub report_type: String,
    /// As of date.
    pub as_of: NaiveDate,
    /// Currency code.
    pub currency: String,
    /// Assets section.
    pub assets: BalanceSheetSection,
    /// Liabilities section.
    pub liabilities: BalanceSheetSection,
    /// Equity section, excluding current net income.
    pub equity: BalanceSheetSection,
    /// Net income not yet closed to equity, up to the as-of date.
    pub current_net_income: Decimal,
    /// Total assets.
    pub total_assets: Decimal,
    /// Total liabilities.
    pub total_liabilities: Decimal,
    /// Total equity, including current net income.
    pub total_equity: Decimal,
    /// Liabilities plus equity.
    pub liabilities_and_equity: Decimal,
    /// Whether assets equal liabilities plus equity.
    pub is_balanced: bool,
}

/// Account ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLedgerEntry {
    /// Line ID.
    pub line_id: LineId,
    /// Transaction ID.
    pub transaction_id: TransactionId,
    /// Transaction date.
    pub date: NaiveDate,
    /// Transaction reference.
    pub reference: String,
    /// Transaction memo.
    pub memo: String,
    /// Line memo.
    pub line_memo: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Running balance after this line.
    pub running_balance: Decimal,
}

/// Running-balance ledger for one account over a range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountLedgerReport {
    /// Report type identifier.
    pub report_type: String,
    /// Account ID.
    pub account_id: AccountId,
    /// Account number.
    pub number: String,
    /// Account name.
    pub name: String,
    /// Period covered (inclusive).
    pub period: DateRange,
    /// Currency code.
    pub currency: String,
    /// Net movement of every posted line dated before the period.
    pub opening_balance: Decimal,
    /// Lines in chronological order.
    pub entries: Vec<AccountLedgerEntry>,
    /// Running balance after the last entry.
    pub closing_balance: Decimal,
}

/// Which accounts a custom ledger covers.
///
/// Explicit accounts win over classifications. Both empty means every account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSelection {
    /// Specific accounts.
    #[serde(default)]
    pub accounts: Vec<AccountId>,
    /// Classifications, used only when no account is listed.
    #[serde(default)]
    pub classes: Vec<AccountClass>,
}

impl AccountSelection {
    /// Every account in the chart.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Exactly these accounts.
    #[must_use]
    pub fn accounts(ids: impl IntoIterator<Item = AccountId>) -> Self {
        Self {
            accounts: ids.into_iter().collect(),
            classes: Vec::new(),
        }
    }

    /// Every account of these classifications.
    #[must_use]
    pub fn classes(classes: impl IntoIterator<Item = AccountClass>) -> Self {
        Self {
            accounts: Vec::new(),
            classes: classes.into_iter().collect(),
        }
    }

    /// Returns true if the selection covers `account`.
    #[must_use]
    pub fn includes(&self, account: &Account) -> bool {
        if !self.accounts.is_empty() {
            self.accounts.contains(&account.id)
        } else if !self.classes.is_empty() {
            self.classes.contains(&account.class)
        } else {
            true
        }
    }
}

/// Running-balance ledgers for a selection of accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomLedgerReport {
    /// Report type identifier.
    pub report_type: String,
    /// Period covered (inclusive).
    pub period: DateRange,
    /// Currency code.
    pub currency: String,
    /// One ledger per selected account with activity, ordered by number.
    pub accounts: Vec<AccountLedgerReport>,
}
