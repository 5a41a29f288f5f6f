//! Budget domain types.

use chrono::{DateTime, Utc};
use riska_shared::types::{AccountId, BudgetId, DateRange, TenantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::BudgetError;
use crate::accounts::AccountFamily;

/// Months in a budget year.
pub const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// A named annual plan of flat monthly targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    /// Budget ID.
    pub id: BudgetId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Budget name.
    pub name: String,
    /// Calendar year the budget covers.
    pub year: i32,
    /// Free-text description.
    pub description: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Items, at most one per account.
    pub items: Vec<BudgetItem>,
}

impl Budget {
    /// Creates an empty budget.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::MissingName` for a blank name, or an input error
    /// if the year is out of range.
    pub fn new(
        tenant_id: TenantId,
        name: &str,
        year: i32,
        description: &str,
    ) -> Result<Self, BudgetError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BudgetError::MissingName);
        }
        DateRange::calendar_year(year)?;

        Ok(Self {
            id: BudgetId::new(),
            tenant_id,
            name: name.to_string(),
            year,
            description: description.trim().to_string(),
            created_at: Utc::now(),
            items: Vec::new(),
        })
    }

    /// January 1 through December 31 of the budget year.
    ///
    /// # Errors
    ///
    /// Returns an input error if the year is out of range.
    pub fn period(&self) -> Result<DateRange, BudgetError> {
        Ok(DateRange::calendar_year(self.year)?)
    }

    /// The item for `account_id`, if any.
    #[must_use]
    pub fn item(&self, account_id: AccountId) -> Option<&BudgetItem> {
        self.items.iter().find(|item| item.account_id == account_id)
    }
}

/// A monthly target for one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetItem {
    /// Budgeted account.
    pub account_id: AccountId,
    /// Flat monthly amount.
    pub monthly_amount: Decimal,
}

impl BudgetItem {
    /// Monthly amount × 12.
    #[must_use]
    pub fn annual_target(&self) -> Decimal {
        self.monthly_amount * MONTHS_PER_YEAR
    }
}

/// Which side of the income statement a budgeted account sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetSide {
    /// Income and other income: beating the target is favorable.
    Income,
    /// Cost of sales, expenses and other expenses: staying under is favorable.
    Expense,
}

impl BudgetSide {
    /// The side for a reporting family; `None` for balance sheet families.
    #[must_use]
    pub const fn for_family(family: AccountFamily) -> Option<Self> {
        match family {
            AccountFamily::Income | AccountFamily::OtherIncome => Some(Self::Income),
            AccountFamily::CostOfSales | AccountFamily::Expense | AccountFamily::OtherExpense => {
                Some(Self::Expense)
            }
            AccountFamily::Asset | AccountFamily::Liability | AccountFamily::Equity => None,
        }
    }
}

/// Variance status classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceStatus {
    /// Favorable variance (under budget for expenses, over target for income).
    Favorable,
    /// Unfavorable variance (over budget for expenses, under target for income).
    Unfavorable,
    /// On budget (no variance).
    OnBudget,
}

/// Budget vs actual for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetVarianceRow {
    /// Account ID.
    pub account_id: AccountId,
    /// Account number.
    pub number: String,
    /// Account name.
    pub name: String,
    /// Income or expense side.
    pub side: BudgetSide,
    /// Monthly amount.
    pub monthly_amount: Decimal,
    /// Annual target.
    pub target: Decimal,
    /// Net movement over the budget year, signed per the account's polarity.
    pub actual: Decimal,
    /// Positive when favorable.
    pub variance: Decimal,
    /// Actual as a percentage of target.
    pub percent_of_budget: Decimal,
    /// Variance status.
    pub status: VarianceStatus,
}

/// Totals of one side of a variance report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarianceTotals {
    /// Sum of targets.
    pub target: Decimal,
    /// Sum of actuals.
    pub actual: Decimal,
    /// Sum of variances.
    pub variance: Decimal,
}

impl VarianceTotals {
    pub(crate) fn add(&mut self, row: &BudgetVarianceRow) {
        self.target += row.target;
        self.actual += row.actual;
        self.variance += row.variance;
    }
}

/// Budget variance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetVarianceReport {
    /// Report type identifier.
    pub report_type: String,
    /// Budget ID.
    pub budget_id: BudgetId,
    /// Budget name.
    pub name: String,
    /// Budget year.
    pub year: i32,
    /// Currency code.
    pub currency: String,
    /// Income-side rows, ordered by account number.
    pub income: Vec<BudgetVarianceRow>,
    /// Expense-side rows, ordered by account number.
    pub expenses: Vec<BudgetVarianceRow>,
    /// Income-side totals.
    pub income_totals: VarianceTotals,
    /// Expense-side totals.
    pub expense_totals: VarianceTotals,
    /// Income target minus expense target.
    pub net_target: Decimal,
    /// Income actual minus expense actual.
    pub net_actual: Decimal,
}
