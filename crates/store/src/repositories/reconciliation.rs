//! Reconciliation repository: bank accounts, statements and matching.

use riska_core::reconciliation::{
    BankAccount, BankAccountRemoval, MatchedPair, RawStatementRow, ReconciliationError,
    ReconciliationService, ReconciliationView, SkippedRow, StatementImportSummary, StatementLine,
    StatementLineInput,
};
use riska_shared::types::{AccountId, BankAccountId, DateRange, LineId, StatementLineId, TenantId};
use tracing::{debug, info};

use crate::book::Book;
use crate::store::Store;

/// Reconciliation repository.
#[derive(Debug, Clone)]
pub struct ReconciliationRepository {
    store: Store,
}

impl ReconciliationRepository {
    /// Creates a new reconciliation repository.
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Registers a bank account mirrored onto an asset GL account.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound`, `GlAccountNotAsset`, `MissingField`, or
    /// `GlAccountAlreadyMirrored` if another bank account uses the GL account.
    pub fn create_bank_account(
        &self,
        tenant_id: TenantId,
        name: &str,
        account_number: &str,
        gl_account_id: AccountId,
    ) -> Result<BankAccount, ReconciliationError> {
        self.store.write_existing(tenant_id, |book| {
            let gl_account = book
                .accounts
                .get(&gl_account_id)
                .ok_or(ReconciliationError::AccountNotFound(gl_account_id))?;
            if book
                .bank_accounts
                .values()
                .any(|b| b.gl_account_id == gl_account_id)
            {
                return Err(ReconciliationError::GlAccountAlreadyMirrored(gl_account_id));
            }
            let bank = BankAccount::new(tenant_id, name, account_number, gl_account)?;
            book.bank_accounts.insert(bank.id, bank.clone());
            info!(
                tenant_id = %tenant_id,
                bank_account_id = %bank.id,
                gl_account_id = %gl_account_id,
                "Bank account created"
            );
            Ok(bank)
        })
    }

    /// Lists bank accounts ordered by name.
    #[must_use]
    pub fn list_bank_accounts(&self, tenant_id: TenantId) -> Vec<BankAccount> {
        self.store.read(tenant_id, |book| {
            let mut banks: Vec<BankAccount> = book.bank_accounts.values().cloned().collect();
            banks.sort_by(|a, b| a.name.cmp(&b.name));
            banks
        })
    }

    /// Deletes a bank account together with its statement lines.
    ///
    /// Matches on those lines are cleared first; the GL account and its
    /// posted lines are untouched.
    ///
    /// # Errors
    ///
    /// Returns `BankAccountNotFound` if the tenant has no such bank account.
    pub fn delete_bank_account(
        &self,
        tenant_id: TenantId,
        bank_account_id: BankAccountId,
    ) -> Result<BankAccountRemoval, ReconciliationError> {
        self.store.write_existing(tenant_id, |book| {
            let bank_account = book
                .bank_accounts
                .remove(&bank_account_id)
                .ok_or(ReconciliationError::BankAccountNotFound(bank_account_id))?;
            let (statement_lines_removed, matches_cleared) =
                book.remove_statement_lines(bank_account_id);
            info!(
                tenant_id = %tenant_id,
                bank_account_id = %bank_account_id,
                statement_lines_removed,
                matches_cleared,
                "Bank account deleted"
            );
            Ok(BankAccountRemoval {
                bank_account,
                statement_lines_removed,
                matches_cleared,
            })
        })
    }

    /// Stores typed statement lines against a bank account.
    ///
    /// # Errors
    ///
    /// Returns `BankAccountNotFound` if the tenant has no such bank account.
    pub fn import_statement(
        &self,
        tenant_id: TenantId,
        bank_account_id: BankAccountId,
        lines: Vec<StatementLineInput>,
    ) -> Result<StatementImportSummary, ReconciliationError> {
        self.store.write_existing(tenant_id, |book| {
            store_statement_lines(book, tenant_id, bank_account_id, lines, Vec::new())
        })
    }

    /// Cleans raw exported rows and stores the readable ones.
    ///
    /// Rows with an unreadable date or amount are skipped and reported in the
    /// summary; they never fail the import.
    ///
    /// # Errors
    ///
    /// Returns `BankAccountNotFound` if the tenant has no such bank account.
    pub fn import_raw_statement(
        &self,
        tenant_id: TenantId,
        bank_account_id: BankAccountId,
        rows: &[RawStatementRow],
    ) -> Result<StatementImportSummary, ReconciliationError> {
        let (lines, skipped) = ReconciliationService::normalize_rows(rows);
        self.store.write_existing(tenant_id, |book| {
            store_statement_lines(book, tenant_id, bank_account_id, lines, skipped)
        })
    }

    /// Matches a statement line to a posted line on the bank's GL account.
    ///
    /// The check and the insert happen under one write lock, so two racing
    /// proposals for the same line cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for either side, `LineNotPosted`,
    /// `LineNotOnBankAccount`, `AlreadyMatched` or `AmountMismatch`.
    pub fn propose_match(
        &self,
        tenant_id: TenantId,
        statement_line_id: StatementLineId,
        line_id: LineId,
    ) -> Result<MatchedPair, ReconciliationError> {
        self.store.write_existing(tenant_id, |book| {
            let statement = book
                .statement_line(statement_line_id)
                .ok_or(ReconciliationError::StatementLineNotFound(statement_line_id))?;
            let bank = book
                .bank_accounts
                .get(&statement.bank_account_id)
                .ok_or(ReconciliationError::BankAccountNotFound(statement.bank_account_id))?;
            let gl_account = book
                .accounts
                .get(&bank.gl_account_id)
                .ok_or(ReconciliationError::AccountNotFound(bank.gl_account_id))?;

            let Some((txn, line)) = book.posted_line(line_id) else {
                return Err(if book.is_draft_line(line_id) {
                    ReconciliationError::LineNotPosted(line_id)
                } else {
                    ReconciliationError::LedgerLineNotFound(line_id)
                });
            };
            let ledger = ReconciliationService::ledger_line_view(gl_account, txn, line)?;
            let pair = MatchedPair {
                statement: statement.clone(),
                ledger,
            };

            book.matches.propose(&pair.statement, &pair.ledger)?;
            info!(
                tenant_id = %tenant_id,
                statement_line_id = %statement_line_id,
                line_id = %line_id,
                amount = %pair.statement.amount,
                "Statement line matched"
            );
            Ok(pair)
        })
    }

    /// Clears a statement line's match, returning the former ledger line.
    ///
    /// Unconditional and without any balance effect.
    ///
    /// # Errors
    ///
    /// Returns `StatementLineNotFound` if the tenant has no such line.
    pub fn unmatch(
        &self,
        tenant_id: TenantId,
        statement_line_id: StatementLineId,
    ) -> Result<Option<LineId>, ReconciliationError> {
        self.store.write_existing(tenant_id, |book| {
            if book.statement_line(statement_line_id).is_none() {
                return Err(ReconciliationError::StatementLineNotFound(statement_line_id));
            }
            let cleared = book.matches.unmatch(statement_line_id);
            info!(
                tenant_id = %tenant_id,
                statement_line_id = %statement_line_id,
                was_matched = cleared.is_some(),
                "Statement line unmatched"
            );
            Ok(cleared)
        })
    }

    /// Matched and unmatched partitions of a bank account.
    ///
    /// # Errors
    ///
    /// Returns `BankAccountNotFound` or `AccountNotFound` for its GL mirror.
    pub fn view(
        &self,
        tenant_id: TenantId,
        bank_account_id: BankAccountId,
        window: Option<DateRange>,
    ) -> Result<ReconciliationView, ReconciliationError> {
        self.store.read(tenant_id, |book| {
            let bank = book
                .bank_accounts
                .get(&bank_account_id)
                .ok_or(ReconciliationError::BankAccountNotFound(bank_account_id))?;
            let gl_account = book
                .accounts
                .get(&bank.gl_account_id)
                .ok_or(ReconciliationError::AccountNotFound(bank.gl_account_id))?;

            let view = ReconciliationService::build_view(
                bank,
                gl_account,
                &book.statement_lines,
                book.posted_transactions(),
                &book.matches,
                window,
            );
            debug!(
                tenant_id = %tenant_id,
                bank_account_id = %bank_account_id,
                matched = view.matched.len(),
                unmatched_statement = view.unmatched_statement.len(),
                unmatched_ledger = view.unmatched_ledger.len(),
                "Reconciliation view generated"
            );
            Ok(view)
        })
    }
}

fn store_statement_lines(
    book: &mut Book,
    tenant_id: TenantId,
    bank_account_id: BankAccountId,
    lines: Vec<StatementLineInput>,
    skipped: Vec<SkippedRow>,
) -> Result<StatementImportSummary, ReconciliationError> {
    if !book.bank_accounts.contains_key(&bank_account_id) {
        return Err(ReconciliationError::BankAccountNotFound(bank_account_id));
    }
    let imported: Vec<StatementLineId> = lines
        .into_iter()
        .map(|input| book.push_statement_line(StatementLine::new(tenant_id, bank_account_id, input)))
        .collect();

    info!(
        tenant_id = %tenant_id,
        bank_account_id = %bank_account_id,
        imported = imported.len(),
        skipped = skipped.len(),
        "Statement imported"
    );
    Ok(StatementImportSummary { imported, skipped })
}
