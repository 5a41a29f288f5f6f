//! Bank reconciliation domain types.

use chrono::{DateTime, NaiveDate, Utc};
use riska_shared::types::{
    AccountId, BankAccountId, DateRange, LineId, StatementLineId, TenantId, TransactionId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ReconciliationError;
use crate::accounts::{Account, AccountFamily};

/// A bank account mirrored onto one asset-family GL account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    /// Bank account ID.
    pub id: BankAccountId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Display name.
    pub name: String,
    /// External account number at the bank.
    pub account_number: String,
    /// The GL account whose lines are reconciled.
    pub gl_account_id: AccountId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl BankAccount {
    /// Creates a bank account mirrored onto `gl_account`.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` for a blank name, or `GlAccountNotAsset` if the
    /// GL account is not asset-family.
    pub fn new(
        tenant_id: TenantId,
        name: &str,
        account_number: &str,
        gl_account: &Account,
    ) -> Result<Self, ReconciliationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ReconciliationError::MissingField("name"));
        }
        if gl_account.family() != AccountFamily::Asset {
            return Err(ReconciliationError::GlAccountNotAsset {
                account_id: gl_account.id,
                class: gl_account.class,
            });
        }

        Ok(Self {
            id: BankAccountId::new(),
            tenant_id,
            name: name.to_string(),
            account_number: account_number.trim().to_string(),
            gl_account_id: gl_account.id,
            created_at: Utc::now(),
        })
    }
}

/// A typed statement line as supplied by a feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLineInput {
    /// Value date.
    pub date: NaiveDate,
    /// Bank description.
    pub description: String,
    /// Signed amount; deposits positive, withdrawals negative.
    pub amount: Decimal,
}

/// A raw statement row with text cells, as exported by a bank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStatementRow {
    /// Date cell.
    pub date: String,
    /// Description cell.
    pub description: String,
    /// Amount cell.
    pub amount: String,
}

impl RawStatementRow {
    /// Convenience constructor.
    #[must_use]
    pub fn new(date: &str, description: &str, amount: &str) -> Self {
        Self {
            date: date.to_string(),
            description: description.to_string(),
            amount: amount.to_string(),
        }
    }
}

/// Why a raw statement row was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Date matched none of the accepted formats.
    MalformedDate,
    /// Amount cell was empty after cleaning.
    MissingAmount,
    /// Amount cell was not a number.
    MalformedAmount,
}

/// A skipped raw row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    /// One-based row number.
    pub row: usize,
    /// Reason.
    pub reason: SkipReason,
}

/// Outcome of a statement import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementImportSummary {
    /// IDs of the stored lines, in input order.
    pub imported: Vec<StatementLineId>,
    /// Rows that were not stored.
    pub skipped: Vec<SkippedRow>,
}

/// Outcome of deleting a bank account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccountRemoval {
    /// The deleted bank account.
    pub bank_account: BankAccount,
    /// Statement lines deleted with it.
    pub statement_lines_removed: usize,
    /// Matches cleared along with those lines.
    pub matches_cleared: usize,
}

/// A stored statement line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    /// Statement line ID.
    pub id: StatementLineId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Bank account the line belongs to.
    pub bank_account_id: BankAccountId,
    /// Value date.
    pub date: NaiveDate,
    /// Bank description.
    pub description: String,
    /// Signed amount.
    pub amount: Decimal,
    /// Import timestamp.
    pub created_at: DateTime<Utc>,
}

impl StatementLine {
    /// Stores a typed line against a bank account.
    #[must_use]
    pub fn new(tenant_id: TenantId, bank_account_id: BankAccountId, input: StatementLineInput) -> Self {
        Self {
            id: StatementLineId::new(),
            tenant_id,
            bank_account_id,
            date: input.date,
            description: input.description.trim().to_string(),
            amount: input.amount,
            created_at: Utc::now(),
        }
    }
}

/// A posted ledger line on a bank's GL account, as seen by the matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerLineView {
    /// Line ID.
    pub line_id: LineId,
    /// Transaction ID.
    pub transaction_id: TransactionId,
    /// Transaction reference.
    pub reference: String,
    /// Transaction date.
    pub date: NaiveDate,
    /// Line memo, or the transaction memo when the line has none.
    pub memo: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Contribution on the GL account, comparable to a statement amount.
    pub net_amount: Decimal,
}

/// A matched statement line and its ledger counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedPair {
    /// Statement side.
    pub statement: StatementLine,
    /// Ledger side.
    pub ledger: LedgerLineView,
}

/// Matched and unmatched partitions of one bank account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationView {
    /// Bank account ID.
    pub bank_account_id: BankAccountId,
    /// The mirrored GL account.
    pub gl_account_id: AccountId,
    /// Applied date window, if any.
    pub window: Option<DateRange>,
    /// Unmatched statement lines, oldest first.
    pub unmatched_statement: Vec<StatementLine>,
    /// Unmatched posted GL lines, oldest first.
    pub unmatched_ledger: Vec<LedgerLineView>,
    /// Matched pairs, newest first.
    pub matched: Vec<MatchedPair>,
    /// Sum of unmatched statement amounts.
    pub unmatched_statement_total: Decimal,
    /// Sum of unmatched ledger net amounts.
    pub unmatched_ledger_total: Decimal,
    /// Sum of matched statement amounts.
    pub matched_total: Decimal,
}
