//! Transaction repository: drafts, posting, reversal, import and export.

use chrono::{NaiveDate, Utc};
use riska_core::ledger::{
    EntrySource, ExportRow, ImportRow, LedgerError, LineInput, NewTransaction, PostingEngine,
    PostingReceipt, ReversalService, Transaction, TransactionStatus, export_all,
    export_transaction, resolve_import, validate_line_accounts, validate_line_amounts,
};
use riska_shared::types::{DateRange, TenantId, TransactionId};
use tracing::info;

use crate::book::Book;
use crate::store::Store;

/// Filter options for listing transactions.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionFilter {
    /// Only this status.
    pub status: Option<TransactionStatus>,
    /// Only transactions dated inside this window.
    pub window: Option<DateRange>,
}

/// Transaction repository.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    store: Store,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Creates a Draft with a freshly allocated reference.
    ///
    /// Balance is not required until posting.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A line amount is negative or both sides are set
    /// - A line's account does not exist in the tenant
    /// - A line's account is inactive and inactive accounts are rejected
    pub fn create_draft(
        &self,
        tenant_id: TenantId,
        input: NewTransaction,
    ) -> Result<Transaction, LedgerError> {
        let prefix = self.store.config().reference_prefix.clone();
        self.store
            .write(tenant_id, |book| self.insert_draft(book, tenant_id, &prefix, input))
    }

    fn insert_draft(
        &self,
        book: &mut Book,
        tenant_id: TenantId,
        prefix: &str,
        input: NewTransaction,
    ) -> Result<Transaction, LedgerError> {
        validate_line_amounts(&input.lines)?;
        validate_line_accounts(
            &input.lines,
            &book.accounts,
            self.store.config().reject_inactive_accounts,
        )?;

        let reference = book.next_reference(prefix, input.date);
        let txn = Transaction::draft(tenant_id, reference, input)?;
        book.drafts.insert(txn.id, txn.clone());

        info!(
            tenant_id = %tenant_id,
            transaction_id = %txn.id,
            reference = %txn.reference,
            lines = txn.lines().len(),
            "Draft created"
        );
        Ok(txn)
    }

    /// Replaces every line of a Draft.
    ///
    /// # Errors
    ///
    /// Returns `NotDraft` once posted, `TransactionNotFound`, or a line
    /// validation error.
    pub fn replace_lines(
        &self,
        tenant_id: TenantId,
        transaction_id: TransactionId,
        lines: Vec<LineInput>,
    ) -> Result<Transaction, LedgerError> {
        let reject_inactive = self.store.config().reject_inactive_accounts;
        self.store.write_existing(tenant_id, |book| {
            if book.posted_index.contains_key(&transaction_id) {
                return Err(LedgerError::NotDraft(transaction_id));
            }
            validate_line_accounts(&lines, &book.accounts, reject_inactive)?;
            let txn = book
                .drafts
                .get_mut(&transaction_id)
                .ok_or(LedgerError::TransactionNotFound(transaction_id))?;
            txn.replace_lines(lines)?;
            info!(tenant_id = %tenant_id, transaction_id = %transaction_id, "Draft lines replaced");
            Ok(txn.clone())
        })
    }

    /// Posts a Draft: marks it Posted and applies every line to its account.
    ///
    /// Runs as one critical section under the tenant's write lock. On error
    /// neither the transaction nor any balance has changed.
    ///
    /// # Errors
    ///
    /// Returns, in order of checking: `NotDraft`, `UnbalancedEntry`,
    /// `EmptyTransaction`; or `TransactionNotFound`.
    pub fn post(
        &self,
        tenant_id: TenantId,
        transaction_id: TransactionId,
    ) -> Result<PostingReceipt, LedgerError> {
        self.store
            .write_existing(tenant_id, |book| post_draft(book, tenant_id, transaction_id))
    }

    /// Deletes a Draft.
    ///
    /// # Errors
    ///
    /// Returns `NotDraft` for a posted transaction, or `TransactionNotFound`.
    pub fn delete_draft(
        &self,
        tenant_id: TenantId,
        transaction_id: TransactionId,
    ) -> Result<(), LedgerError> {
        self.store.write_existing(tenant_id, |book| {
            if book.posted_index.contains_key(&transaction_id) {
                return Err(LedgerError::NotDraft(transaction_id));
            }
            book.drafts
                .remove(&transaction_id)
                .ok_or(LedgerError::TransactionNotFound(transaction_id))?;
            info!(tenant_id = %tenant_id, transaction_id = %transaction_id, "Draft deleted");
            Ok(())
        })
    }

    /// Creates and posts the offsetting transaction of a posted one.
    ///
    /// The memo defaults to `Reversal of {reference}`. The original is left
    /// untouched; the reversal links back to it.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound`, `NotPosted` for a draft, or
    /// `AlreadyReversed` if a reversal exists.
    pub fn reverse(
        &self,
        tenant_id: TenantId,
        transaction_id: TransactionId,
        date: NaiveDate,
        memo: Option<String>,
    ) -> Result<PostingReceipt, LedgerError> {
        let prefix = self.store.config().reference_prefix.clone();
        self.store.write_existing(tenant_id, |book| {
            if let Some(reversal) = book.reversals.get(&transaction_id) {
                return Err(LedgerError::AlreadyReversed {
                    original: transaction_id,
                    reversal: *reversal,
                });
            }
            let original = book
                .transaction(transaction_id)
                .ok_or(LedgerError::TransactionNotFound(transaction_id))?;
            let input = ReversalService::build(original, date, memo)?;

            let reference = book.next_reference(&prefix, date);
            let mut reversal = Transaction::draft(tenant_id, reference, input)?;
            reversal.reverses = Some(transaction_id);
            let receipt = PostingEngine::post(&mut reversal, &mut book.accounts, Utc::now())?;

            info!(
                tenant_id = %tenant_id,
                original_id = %transaction_id,
                reversal_id = %reversal.id,
                reference = %reversal.reference,
                "Transaction reversed"
            );
            book.push_posted(reversal);
            Ok(receipt)
        })
    }

    /// Imports rows keyed by account number as one Draft.
    ///
    /// The whole batch fails on the first bad row.
    ///
    /// # Errors
    ///
    /// Returns `UnknownAccountNumber`, an input error for a malformed amount,
    /// `EmptyTransaction` or `UnbalancedBatch`, or any draft creation error.
    pub fn import(
        &self,
        tenant_id: TenantId,
        date: NaiveDate,
        memo: &str,
        rows: &[ImportRow],
    ) -> Result<Transaction, LedgerError> {
        let prefix = self.store.config().import_reference_prefix.clone();
        self.store.write_existing(tenant_id, |book| {
            let lines = resolve_import(rows, |number| book.account_numbers.get(number).copied())?;
            let input = NewTransaction::new(date, memo, lines).with_source(EntrySource::Import);
            let txn = self.insert_draft(book, tenant_id, &prefix, input)?;
            info!(tenant_id = %tenant_id, transaction_id = %txn.id, rows = rows.len(), "Rows imported");
            Ok(txn)
        })
    }

    /// Finds a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` if the tenant has no such transaction.
    pub fn get(
        &self,
        tenant_id: TenantId,
        transaction_id: TransactionId,
    ) -> Result<Transaction, LedgerError> {
        self.store.read(tenant_id, |book| {
            book.transaction(transaction_id)
                .cloned()
                .ok_or(LedgerError::TransactionNotFound(transaction_id))
        })
    }

    /// Lists transactions, newest first.
    #[must_use]
    pub fn list(&self, tenant_id: TenantId, filter: TransactionFilter) -> Vec<Transaction> {
        self.store.read(tenant_id, |book| {
            let mut found: Vec<Transaction> = book
                .all_transactions()
                .into_iter()
                .filter(|txn| filter.status.is_none_or(|status| txn.status() == status))
                .filter(|txn| filter.window.is_none_or(|window| window.contains(txn.date)))
                .cloned()
                .collect();
            found.reverse();
            found
        })
    }

    /// Case-insensitive search over reference and memo, newest first.
    #[must_use]
    pub fn search(&self, tenant_id: TenantId, query: &str) -> Vec<Transaction> {
        let needle = query.trim().to_lowercase();
        self.store.read(tenant_id, |book| {
            let mut found: Vec<Transaction> = book
                .all_transactions()
                .into_iter()
                .filter(|txn| {
                    txn.reference.to_lowercase().contains(&needle)
                        || txn.memo.to_lowercase().contains(&needle)
                })
                .cloned()
                .collect();
            found.reverse();
            found
        })
    }

    /// Tabular rows for one transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` if the tenant has no such transaction.
    pub fn export(
        &self,
        tenant_id: TenantId,
        transaction_id: TransactionId,
    ) -> Result<Vec<ExportRow>, LedgerError> {
        self.store.read(tenant_id, |book| {
            let txn = book
                .transaction(transaction_id)
                .ok_or(LedgerError::TransactionNotFound(transaction_id))?;
            Ok(export_transaction(txn, &book.accounts))
        })
    }

    /// Tabular rows for every transaction of the tenant, oldest first.
    #[must_use]
    pub fn export_all(&self, tenant_id: TenantId) -> Vec<ExportRow> {
        self.store
            .read(tenant_id, |book| export_all(book.all_transactions(), &book.accounts))
    }
}

fn post_draft(
    book: &mut Book,
    tenant_id: TenantId,
    transaction_id: TransactionId,
) -> Result<PostingReceipt, LedgerError> {
    if book.posted_index.contains_key(&transaction_id) {
        return Err(LedgerError::NotDraft(transaction_id));
    }
    let txn = book
        .drafts
        .get_mut(&transaction_id)
        .ok_or(LedgerError::TransactionNotFound(transaction_id))?;
    let receipt = PostingEngine::post(txn, &mut book.accounts, Utc::now())?;

    if let Some(posted) = book.drafts.remove(&transaction_id) {
        info!(
            tenant_id = %tenant_id,
            transaction_id = %transaction_id,
            reference = %posted.reference,
            debit_total = %receipt.totals.debit_total,
            accounts = receipt.changes.len(),
            "Transaction posted"
        );
        book.push_posted(posted);
    }
    Ok(receipt)
}
