//! Account repository for chart of accounts operations.

use std::sync::Arc;

use riska_core::accounts::{Account, AccountClass, AccountError};
use riska_core::ledger::{PostingEngine, RecomputeOutcome};
use riska_shared::types::{AccountId, TenantId};
use serde::Deserialize;
use tracing::{info, warn};

use crate::book::Book;
use crate::store::Store;

/// Input for creating an account.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccountInput {
    /// Account number (must be unique within the tenant).
    pub number: String,
    /// Account name.
    pub name: String,
    /// Classification label, e.g. "Bank" or "Cost of Goods Sold".
    pub classification: String,
}

impl CreateAccountInput {
    /// Convenience constructor.
    #[must_use]
    pub fn new(number: &str, name: &str, classification: &str) -> Self {
        Self {
            number: number.to_string(),
            name: name.to_string(),
            classification: classification.to_string(),
        }
    }
}

/// Filter options for listing accounts.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountFilter {
    /// Only active accounts.
    pub active_only: bool,
    /// Only this classification.
    pub class: Option<AccountClass>,
}

/// Account repository.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    store: Store,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Creates an active account with a zero balance.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The classification label is unknown
    /// - The number or name is blank
    /// - The number already exists in the tenant
    pub fn create(
        &self,
        tenant_id: TenantId,
        input: CreateAccountInput,
    ) -> Result<Account, AccountError> {
        let class: AccountClass = input.classification.parse()?;
        let account = Account::new(tenant_id, &input.number, &input.name, class)?;

        self.store.write(tenant_id, |book| {
            if book.account_numbers.contains_key(&account.number) {
                return Err(AccountError::DuplicateAccountNumber(account.number.clone()));
            }
            book.account_numbers
                .insert(account.number.clone(), account.id);
            book.accounts.insert(account.id, account.clone());

            info!(
                tenant_id = %tenant_id,
                account_id = %account.id,
                number = %account.number,
                class = %account.class,
                "Account created"
            );
            Ok(account)
        })
    }

    /// Finds an account by ID.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the tenant has no such account.
    pub fn get(&self, tenant_id: TenantId, account_id: AccountId) -> Result<Account, AccountError> {
        self.store.read(tenant_id, |book| {
            book.accounts
                .get(&account_id)
                .cloned()
                .ok_or(AccountError::AccountNotFound(account_id))
        })
    }

    /// Finds an account by number.
    #[must_use]
    pub fn find_by_number(&self, tenant_id: TenantId, number: &str) -> Option<Account> {
        self.store.read(tenant_id, |book| {
            book.account_numbers
                .get(number.trim())
                .and_then(|id| book.accounts.get(id))
                .cloned()
        })
    }

    /// Lists accounts ordered by number.
    #[must_use]
    pub fn list(&self, tenant_id: TenantId, filter: AccountFilter) -> Vec<Account> {
        self.store.read(tenant_id, |book| {
            let mut accounts: Vec<Account> = book
                .accounts
                .values()
                .filter(|a| !filter.active_only || a.is_active)
                .filter(|a| filter.class.is_none_or(|class| a.class == class))
                .cloned()
                .collect();
            accounts.sort_by(|a, b| a.number.cmp(&b.number));
            accounts
        })
    }

    /// Case-insensitive search over account number and name, ordered by number.
    ///
    /// A blank query returns every account.
    #[must_use]
    pub fn search(&self, tenant_id: TenantId, query: &str) -> Vec<Account> {
        let needle = query.trim().to_lowercase();
        self.store.read(tenant_id, |book| {
            let mut found: Vec<Account> = book
                .accounts
                .values()
                .filter(|a| {
                    a.number.to_lowercase().contains(&needle)
                        || a.name.to_lowercase().contains(&needle)
                })
                .cloned()
                .collect();
            found.sort_by(|a, b| a.number.cmp(&b.number));
            found
        })
    }

    /// Marks an account inactive. Its balance and history are untouched.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the tenant has no such account.
    pub fn deactivate(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
    ) -> Result<Account, AccountError> {
        self.set_active(tenant_id, account_id, false)
    }

    /// Marks an account active again.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the tenant has no such account.
    pub fn reactivate(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
    ) -> Result<Account, AccountError> {
        self.set_active(tenant_id, account_id, true)
    }

    fn set_active(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
        is_active: bool,
    ) -> Result<Account, AccountError> {
        self.store.write_existing(tenant_id, |book| {
            let account = book
                .accounts
                .get_mut(&account_id)
                .ok_or(AccountError::AccountNotFound(account_id))?;
            account.is_active = is_active;
            info!(tenant_id = %tenant_id, account_id = %account_id, is_active, "Account status changed");
            Ok(account.clone())
        })
    }

    /// Deletes an account no line has ever referenced.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound`, or `AccountInUse` if any draft or posted
    /// line references the account.
    pub fn delete(&self, tenant_id: TenantId, account_id: AccountId) -> Result<(), AccountError> {
        self.store.write_existing(tenant_id, |book| {
            if !book.accounts.contains_key(&account_id) {
                return Err(AccountError::AccountNotFound(account_id));
            }
            if book.is_account_referenced(account_id)
                || book.bank_accounts.values().any(|b| b.gl_account_id == account_id)
                || book.budgets.iter().any(|b| b.item(account_id).is_some())
            {
                return Err(AccountError::AccountInUse(account_id));
            }
            if let Some(account) = book.accounts.remove(&account_id) {
                book.account_numbers.remove(&account.number);
            }
            info!(tenant_id = %tenant_id, account_id = %account_id, "Account deleted");
            Ok(())
        })
    }

    /// Rebuilds one cached balance from the posted log.
    ///
    /// Runs under the tenant's write lock, so it cannot interleave with a
    /// posting that touches the account. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the tenant has no such account.
    pub fn recompute_balance(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
    ) -> Result<RecomputeOutcome, AccountError> {
        self.store.write_existing(tenant_id, |book| {
            let outcome = recompute_one(book, account_id)
                .ok_or(AccountError::AccountNotFound(account_id))?;
            report_drift(tenant_id, &outcome);
            Ok(outcome)
        })
    }

    /// Rebuilds every cached balance of the tenant.
    #[must_use]
    pub fn recompute_all(&self, tenant_id: TenantId) -> Vec<RecomputeOutcome> {
        self.store.write_existing(tenant_id, |book| {
            let mut ids: Vec<AccountId> = book.accounts.keys().copied().collect();
            ids.sort();
            let outcomes: Vec<RecomputeOutcome> = ids
                .into_iter()
                .filter_map(|id| recompute_one(book, id))
                .collect();
            for outcome in &outcomes {
                report_drift(tenant_id, outcome);
            }
            info!(tenant_id = %tenant_id, accounts = outcomes.len(), "Balances recomputed");
            outcomes
        })
    }

    /// Compares every cached balance with a replay, without repairing.
    ///
    /// Returns only the accounts that drifted.
    #[must_use]
    pub fn verify_balances(&self, tenant_id: TenantId) -> Vec<RecomputeOutcome> {
        self.store.read(tenant_id, |book| {
            let mut drifted: Vec<RecomputeOutcome> = book
                .accounts
                .values()
                .map(|account| PostingEngine::verify(account, book.posted_transactions()))
                .filter(RecomputeOutcome::has_drift)
                .collect();
            drifted.sort_by_key(|outcome| outcome.account_id);
            for outcome in &drifted {
                report_drift(tenant_id, outcome);
            }
            drifted
        })
    }
}

fn recompute_one(book: &mut Book, account_id: AccountId) -> Option<RecomputeOutcome> {
    let account = book.accounts.get_mut(&account_id)?;
    Some(PostingEngine::apply_all_posted_for_account(
        account,
        book.posted.iter().map(Arc::as_ref),
    ))
}

fn report_drift(tenant_id: TenantId, outcome: &RecomputeOutcome) {
    if outcome.has_drift() {
        warn!(
            tenant_id = %tenant_id,
            account_id = %outcome.account_id,
            cached = %outcome.cached_before,
            recomputed = %outcome.recomputed,
            drift = %outcome.drift(),
            "Cached balance disagrees with posted lines"
        );
    }
}
