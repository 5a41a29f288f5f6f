//! One tenant's ledger state.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use riska_core::accounts::Account;
use riska_core::budget::Budget;
use riska_core::ledger::{Line, Transaction};
use riska_core::reconciliation::{BankAccount, MatchBook, StatementLine};
use riska_core::reports::LedgerSnapshot;
use riska_shared::types::{
    AccountId, BankAccountId, LineId, StatementLineId, TransactionId,
};

/// Everything one tenant owns.
///
/// Posted transactions are shared pointers: they never change once posted,
/// so report snapshots clone the pointers and aggregate outside the lock.
#[derive(Debug, Default)]
pub struct Book {
    pub(crate) accounts: HashMap<AccountId, Account>,
    pub(crate) account_numbers: HashMap<String, AccountId>,
    pub(crate) drafts: HashMap<TransactionId, Transaction>,
    pub(crate) posted: Vec<Arc<Transaction>>,
    pub(crate) posted_index: HashMap<TransactionId, usize>,
    /// Posted line to (posted index, line index).
    pub(crate) line_index: HashMap<LineId, (usize, usize)>,
    /// Original transaction to its reversal.
    pub(crate) reversals: HashMap<TransactionId, TransactionId>,
    pub(crate) reference_seq: u64,
    pub(crate) budgets: Vec<Budget>,
    pub(crate) bank_accounts: HashMap<BankAccountId, BankAccount>,
    pub(crate) statement_lines: Vec<StatementLine>,
    pub(crate) statement_index: HashMap<StatementLineId, usize>,
    pub(crate) matches: MatchBook,
}

impl Book {
    /// Number of accounts.
    #[must_use]
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Number of posted transactions.
    #[must_use]
    pub fn posted_count(&self) -> usize {
        self.posted.len()
    }

    /// Number of drafts.
    #[must_use]
    pub fn draft_count(&self) -> usize {
        self.drafts.len()
    }

    /// Posted transactions in posting order.
    pub(crate) fn posted_transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.posted.iter().map(Arc::as_ref)
    }

    /// A draft or posted transaction.
    pub(crate) fn transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.drafts.get(&id).or_else(|| {
            self.posted_index
                .get(&id)
                .and_then(|index| self.posted.get(*index))
                .map(Arc::as_ref)
        })
    }

    /// Every transaction, drafts included, ordered by date then reference.
    pub(crate) fn all_transactions(&self) -> Vec<&Transaction> {
        let mut all: Vec<&Transaction> = self
            .posted_transactions()
            .chain(self.drafts.values())
            .collect();
        all.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.reference.cmp(&b.reference)));
        all
    }

    /// A posted line together with its transaction.
    pub(crate) fn posted_line(&self, line_id: LineId) -> Option<(&Transaction, &Line)> {
        let (txn_index, line_index) = *self.line_index.get(&line_id)?;
        let txn = self.posted.get(txn_index)?;
        let line = txn.lines().get(line_index)?;
        Some((txn.as_ref(), line))
    }

    /// Returns true if a draft has a line with this ID.
    pub(crate) fn is_draft_line(&self, line_id: LineId) -> bool {
        self.drafts
            .values()
            .flat_map(Transaction::lines)
            .any(|line| line.id == line_id)
    }

    /// Returns true if any draft or posted line references the account.
    pub(crate) fn is_account_referenced(&self, account_id: AccountId) -> bool {
        self.posted_transactions()
            .chain(self.drafts.values())
            .flat_map(Transaction::lines)
            .any(|line| line.account_id == account_id)
    }

    /// Allocates the next reference: `{prefix}-{YYYYMMDD}-{seq:05}`.
    ///
    /// The sequence is per tenant and never reused.
    pub(crate) fn next_reference(&mut self, prefix: &str, date: NaiveDate) -> String {
        self.reference_seq += 1;
        format!("{prefix}-{}-{:05}", date.format("%Y%m%d"), self.reference_seq)
    }

    /// Appends a freshly posted transaction and indexes its lines.
    pub(crate) fn push_posted(&mut self, txn: Transaction) {
        let index = self.posted.len();
        self.posted_index.insert(txn.id, index);
        for (line_index, line) in txn.lines().iter().enumerate() {
            self.line_index.insert(line.id, (index, line_index));
        }
        if let Some(original) = txn.reverses {
            self.reversals.insert(original, txn.id);
        }
        self.posted.push(Arc::new(txn));
    }

    /// Statement line by ID.
    pub(crate) fn statement_line(&self, id: StatementLineId) -> Option<&StatementLine> {
        self.statement_index
            .get(&id)
            .and_then(|index| self.statement_lines.get(*index))
    }

    /// Appends a statement line and indexes it.
    pub(crate) fn push_statement_line(&mut self, line: StatementLine) -> StatementLineId {
        let id = line.id;
        self.statement_index.insert(id, self.statement_lines.len());
        self.statement_lines.push(line);
        id
    }

    /// Drops every statement line of a bank account and clears their matches.
    ///
    /// Returns the number of lines removed and of matches cleared.
    pub(crate) fn remove_statement_lines(&mut self, bank_account_id: BankAccountId) -> (usize, usize) {
        let (removed, kept): (Vec<StatementLine>, Vec<StatementLine>) =
            std::mem::take(&mut self.statement_lines)
                .into_iter()
                .partition(|line| line.bank_account_id == bank_account_id);

        let cleared = removed
            .iter()
            .filter_map(|line| self.matches.unmatch(line.id))
            .count();

        self.statement_index = kept
            .iter()
            .enumerate()
            .map(|(index, line)| (line.id, index))
            .collect();
        self.statement_lines = kept;
        (removed.len(), cleared)
    }

    /// Copies what reports need: the chart and the posted log pointers.
    pub(crate) fn snapshot(&self, currency: &str) -> LedgerSnapshot {
        LedgerSnapshot::new(
            self.accounts.values().cloned().collect(),
            self.posted.clone(),
            currency,
        )
    }
}
