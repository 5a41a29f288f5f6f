//! Budget repository.

use riska_core::budget::{Budget, BudgetError, BudgetItem, BudgetService, BudgetVarianceReport};
use riska_shared::types::{AccountId, BudgetId, TenantId};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::store::Store;

/// Budget repository.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    store: Store,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Creates an empty budget for a calendar year.
    ///
    /// # Errors
    ///
    /// Returns `MissingName`, or an input error for an out-of-range year.
    pub fn create(
        &self,
        tenant_id: TenantId,
        name: &str,
        year: i32,
        description: &str,
    ) -> Result<Budget, BudgetError> {
        let budget = Budget::new(tenant_id, name, year, description)?;
        self.store.write(tenant_id, |book| {
            book.budgets.push(budget.clone());
        });
        info!(tenant_id = %tenant_id, budget_id = %budget.id, year, "Budget created");
        Ok(budget)
    }

    /// Adds a monthly target for one income or expense account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `AccountNotFound`, `NegativeAmount`,
    /// `AccountNotBudgetable` or `DuplicateItem`.
    pub fn add_item(
        &self,
        tenant_id: TenantId,
        budget_id: BudgetId,
        account_id: AccountId,
        monthly_amount: Decimal,
    ) -> Result<BudgetItem, BudgetError> {
        self.store.write_existing(tenant_id, |book| {
            let account = book
                .accounts
                .get(&account_id)
                .ok_or(BudgetError::AccountNotFound(account_id))?;
            let budget = book
                .budgets
                .iter_mut()
                .find(|b| b.id == budget_id)
                .ok_or(BudgetError::NotFound(budget_id))?;
            let item = BudgetService::validate_item(budget, account, monthly_amount)?;
            budget.items.push(item);
            info!(
                tenant_id = %tenant_id,
                budget_id = %budget_id,
                account_id = %account_id,
                monthly_amount = %monthly_amount,
                "Budget item added"
            );
            Ok(item)
        })
    }

    /// Finds a budget by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the tenant has no such budget.
    pub fn get(&self, tenant_id: TenantId, budget_id: BudgetId) -> Result<Budget, BudgetError> {
        self.store.read(tenant_id, |book| {
            book.budgets
                .iter()
                .find(|b| b.id == budget_id)
                .cloned()
                .ok_or(BudgetError::NotFound(budget_id))
        })
    }

    /// Lists budgets, newest year first.
    #[must_use]
    pub fn list(&self, tenant_id: TenantId) -> Vec<Budget> {
        self.store.read(tenant_id, |book| {
            let mut budgets = book.budgets.clone();
            budgets.sort_by(|a, b| b.year.cmp(&a.year).then(b.created_at.cmp(&a.created_at)));
            budgets
        })
    }

    /// The most recently created budget for a year.
    ///
    /// # Errors
    ///
    /// Returns `NoBudgetForYear` if none exists.
    pub fn latest_for_year(&self, tenant_id: TenantId, year: i32) -> Result<Budget, BudgetError> {
        self.store.read(tenant_id, |book| {
            book.budgets
                .iter()
                .rev()
                .find(|b| b.year == year)
                .cloned()
                .ok_or(BudgetError::NoBudgetForYear(year))
        })
    }

    /// The budget with the highest year; among equal years, the last created.
    ///
    /// # Errors
    ///
    /// Returns `NoBudgets` if the tenant has none.
    pub fn latest(&self, tenant_id: TenantId) -> Result<Budget, BudgetError> {
        self.store.read(tenant_id, |book| {
            book.budgets
                .iter()
                .enumerate()
                .max_by_key(|(created, b)| (b.year, *created))
                .map(|(_, b)| b.clone())
                .ok_or(BudgetError::NoBudgets)
        })
    }

    /// Variance of a budget against the posted ledger.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, or an error from the variance computation.
    pub fn variance(
        &self,
        tenant_id: TenantId,
        budget_id: BudgetId,
    ) -> Result<BudgetVarianceReport, BudgetError> {
        let currency = self.store.config().currency.clone();
        let (budget, snapshot) = self.store.read(tenant_id, |book| {
            let budget = book
                .budgets
                .iter()
                .find(|b| b.id == budget_id)
                .cloned()
                .ok_or(BudgetError::NotFound(budget_id))?;
            Ok::<_, BudgetError>((budget, book.snapshot(&currency)))
        })?;

        let report = BudgetService::variance_report(&budget, &snapshot)?;
        debug!(
            tenant_id = %tenant_id,
            budget_id = %budget_id,
            net_actual = %report.net_actual,
            "Budget variance generated"
        );
        Ok(report)
    }

    /// Variance of the latest budget for a year.
    ///
    /// # Errors
    ///
    /// Returns `NoBudgetForYear`, or an error from the variance computation.
    pub fn variance_for_year(
        &self,
        tenant_id: TenantId,
        year: i32,
    ) -> Result<BudgetVarianceReport, BudgetError> {
        let budget = self.latest_for_year(tenant_id, year)?;
        self.variance(tenant_id, budget.id)
    }

    /// Variance of the latest budget across all years.
    ///
    /// # Errors
    ///
    /// Returns `NoBudgets`, or an error from the variance computation.
    pub fn variance_latest(&self, tenant_id: TenantId) -> Result<BudgetVarianceReport, BudgetError> {
        let budget = self.latest(tenant_id)?;
        self.variance(tenant_id, budget.id)
    }
}
