//! Ledger domain types for transaction creation and posting.
//!
//! This module defines the voucher (transaction) and its lines, the
//! Draft → Posted state machine, and the inputs producers hand to the ledger.

use chrono::{DateTime, NaiveDate, Utc};
use riska_shared::types::{AccountId, LineId, TenantId, TransactionId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;
use super::validation::validate_line_amounts;

/// Transaction status.
///
/// Posted is terminal: there is no way back to Draft and no void state.
/// Corrections are new offsetting transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Lines may be replaced wholesale.
    Draft,
    /// Committed to account balances (immutable).
    Posted,
}

impl TransactionStatus {
    /// Returns true if the transaction can be modified.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Posted => "Posted",
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The producer that assembled a transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    /// Manual journal entry.
    #[default]
    Manual,
    /// Invoice payment.
    Invoice,
    /// Expense entry.
    Expense,
    /// Depreciation run.
    Depreciation,
    /// Inventory adjustment.
    InventoryAdjustment,
    /// Bulk import.
    Import,
    /// Offsetting entry for a posted transaction.
    Reversal,
}

/// A proposed line, as handed in by a producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineInput {
    /// Account to post against.
    pub account_id: AccountId,
    /// Debit amount (>= 0).
    pub debit: Decimal,
    /// Credit amount (>= 0).
    pub credit: Decimal,
    /// Line memo.
    #[serde(default)]
    pub memo: String,
}

impl LineInput {
    /// A debit line.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal, memo: impl Into<String>) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
            memo: memo.into(),
        }
    }

    /// A credit line.
    #[must_use]
    pub fn credit(account_id: AccountId, amount: Decimal, memo: impl Into<String>) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
            memo: memo.into(),
        }
    }
}

/// A proposed transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    /// Transaction date.
    pub date: NaiveDate,
    /// Free-text memo.
    pub memo: String,
    /// Producer tag.
    #[serde(default)]
    pub source: EntrySource,
    /// Ordered lines.
    pub lines: Vec<LineInput>,
}

impl NewTransaction {
    /// A manual transaction.
    #[must_use]
    pub fn new(date: NaiveDate, memo: impl Into<String>, lines: Vec<LineInput>) -> Self {
        Self {
            date,
            memo: memo.into(),
            source: EntrySource::Manual,
            lines,
        }
    }

    /// Sets the producer tag.
    #[must_use]
    pub const fn with_source(mut self, source: EntrySource) -> Self {
        self.source = source;
        self
    }
}

/// A stored transaction line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// Line ID.
    pub id: LineId,
    /// Owning transaction.
    pub transaction_id: TransactionId,
    /// Referenced account.
    pub account_id: AccountId,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Line memo.
    pub memo: String,
}

/// Transaction totals for validation and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionTotals {
    /// Sum of line debits.
    pub debit_total: Decimal,
    /// Sum of line credits.
    pub credit_total: Decimal,
    /// Whether debits == credits, exactly.
    pub is_balanced: bool,
}

impl TransactionTotals {
    /// Creates totals from debit and credit sums.
    #[must_use]
    pub fn new(debit_total: Decimal, credit_total: Decimal) -> Self {
        Self {
            debit_total,
            credit_total,
            is_balanced: debit_total == credit_total,
        }
    }

    /// Sums any sequence of (debit, credit) pairs.
    pub fn sum(pairs: impl IntoIterator<Item = (Decimal, Decimal)>) -> Self {
        let (debit, credit) = pairs
            .into_iter()
            .fold((Decimal::ZERO, Decimal::ZERO), |(d, c), (debit, credit)| {
                (d + debit, c + credit)
            });
        Self::new(debit, credit)
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit_total - self.credit_total
    }
}

/// A voucher: a dated, referenced set of lines.
///
/// Status, posting timestamp and lines are only changed through
/// [`Transaction::replace_lines`] (while Draft) and the posting engine.
#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    /// Transaction ID.
    pub id: TransactionId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Unique reference number within the tenant.
    pub reference: String,
    /// Transaction date.
    pub date: NaiveDate,
    /// Free-text memo.
    pub memo: String,
    /// Producer tag.
    pub source: EntrySource,
    /// The posted transaction this one offsets, if it is a reversal.
    pub reverses: Option<TransactionId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    pub(crate) status: TransactionStatus,
    pub(crate) posted_at: Option<DateTime<Utc>>,
    pub(crate) lines: Vec<Line>,
}

impl Transaction {
    /// Builds a Draft from a proposed transaction.
    ///
    /// Balance is not required at this point; it is checked on posting.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NegativeAmount` or `LedgerError::BothSidesSet`
    /// for malformed line amounts.
    pub fn draft(
        tenant_id: TenantId,
        reference: String,
        input: NewTransaction,
    ) -> Result<Self, LedgerError> {
        validate_line_amounts(&input.lines)?;

        let id = TransactionId::new();
        Ok(Self {
            id,
            tenant_id,
            reference,
            date: input.date,
            memo: input.memo,
            source: input.source,
            reverses: None,
            created_at: Utc::now(),
            status: TransactionStatus::Draft,
            posted_at: None,
            lines: build_lines(id, input.lines),
        })
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> TransactionStatus {
        self.status
    }

    /// Returns true once the transaction has been posted.
    #[must_use]
    pub const fn is_posted(&self) -> bool {
        matches!(self.status, TransactionStatus::Posted)
    }

    /// Posting timestamp, set exactly when the status is Posted.
    #[must_use]
    pub const fn posted_at(&self) -> Option<DateTime<Utc>> {
        self.posted_at
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Debit and credit totals.
    #[must_use]
    pub fn totals(&self) -> TransactionTotals {
        TransactionTotals::sum(self.lines.iter().map(|l| (l.debit, l.credit)))
    }

    /// Replaces every line of a Draft.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotDraft` once posted, or a line amount error.
    pub fn replace_lines(&mut self, lines: Vec<LineInput>) -> Result<(), LedgerError> {
        if !self.status.is_editable() {
            return Err(LedgerError::NotDraft(self.id));
        }
        validate_line_amounts(&lines)?;
        self.lines = build_lines(self.id, lines);
        Ok(())
    }

    pub(crate) fn mark_posted(&mut self, at: DateTime<Utc>) {
        self.status = TransactionStatus::Posted;
        self.posted_at = Some(at);
    }
}

fn build_lines(transaction_id: TransactionId, lines: Vec<LineInput>) -> Vec<Line> {
    lines
        .into_iter()
        .map(|input| Line {
            id: LineId::new(),
            transaction_id,
            account_id: input.account_id,
            debit: input.debit,
            credit: input.credit,
            memo: input.memo,
        })
        .collect()
}
