//! Budget service for item validation and variance reporting.

use rust_decimal::Decimal;

use super::error::BudgetError;
use super::types::{
    Budget, BudgetItem, BudgetSide, BudgetVarianceReport, BudgetVarianceRow, VarianceTotals,
};
use super::variance::BudgetVariance;
use crate::accounts::Account;
use crate::reports::{LedgerSnapshot, ReportService};

/// Budget service for business logic.
pub struct BudgetService;

impl BudgetService {
    /// The budget side of an account.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::AccountNotBudgetable` for balance sheet accounts.
    pub fn side_for(account: &Account) -> Result<BudgetSide, BudgetError> {
        BudgetSide::for_family(account.family()).ok_or(BudgetError::AccountNotBudgetable {
            account_id: account.id,
            class: account.class,
        })
    }

    /// Validates a new budget item.
    ///
    /// # Errors
    ///
    /// Returns `NegativeAmount`, `AccountNotBudgetable`, or `DuplicateItem`
    /// if the budget already covers the account.
    pub fn validate_item(
        budget: &Budget,
        account: &Account,
        monthly_amount: Decimal,
    ) -> Result<BudgetItem, BudgetError> {
        if monthly_amount < Decimal::ZERO {
            return Err(BudgetError::NegativeAmount);
        }
        Self::side_for(account)?;
        if budget.item(account.id).is_some() {
            return Err(BudgetError::DuplicateItem(account.id));
        }

        Ok(BudgetItem {
            account_id: account.id,
            monthly_amount,
        })
    }

    /// Compares each item's annual target against the year's posted activity.
    ///
    /// Actuals are signed per each account's polarity: credit-normal income
    /// accounts count credits minus debits, debit-normal expense accounts
    /// count debits minus credits.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if an item's account is missing from the
    /// snapshot, or `AccountNotBudgetable` if its classification changed.
    pub fn variance_report(
        budget: &Budget,
        snapshot: &LedgerSnapshot,
    ) -> Result<BudgetVarianceReport, BudgetError> {
        let period = budget.period()?;
        let movements = ReportService::account_movements(snapshot, |date| period.contains(date));

        let mut income = Vec::new();
        let mut expenses = Vec::new();
        for item in &budget.items {
            let account = snapshot
                .account(item.account_id)
                .ok_or(BudgetError::AccountNotFound(item.account_id))?;
            let side = Self::side_for(account)?;
            let (debit, credit) = movements
                .get(&account.id)
                .copied()
                .unwrap_or((Decimal::ZERO, Decimal::ZERO));
            let actual = account.polarity().contribution(debit, credit);
            let variance = BudgetVariance::for_side(side, item.annual_target(), actual);

            let row = BudgetVarianceRow {
                account_id: account.id,
                number: account.number.clone(),
                name: account.name.clone(),
                side,
                monthly_amount: item.monthly_amount,
                target: variance.target,
                actual: variance.actual,
                variance: variance.variance,
                percent_of_budget: variance.percent_of_budget,
                status: variance.status,
            };
            match side {
                BudgetSide::Income => income.push(row),
                BudgetSide::Expense => expenses.push(row),
            }
        }
        income.sort_by(|a, b| a.number.cmp(&b.number));
        expenses.sort_by(|a, b| a.number.cmp(&b.number));

        let mut income_totals = VarianceTotals::default();
        income.iter().for_each(|row| income_totals.add(row));
        let mut expense_totals = VarianceTotals::default();
        expenses.iter().for_each(|row| expense_totals.add(row));

        Ok(BudgetVarianceReport {
            report_type: "budget_variance".to_string(),
            budget_id: budget.id,
            name: budget.name.clone(),
            year: budget.year,
            currency: snapshot.currency.clone(),
            income,
            expenses,
            income_totals,
            expense_totals,
            net_target: income_totals.target - expense_totals.target,
            net_actual: income_totals.actual - expense_totals.actual,
        })
    }
}
