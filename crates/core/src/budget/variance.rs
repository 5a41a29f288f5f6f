//! Budget variance calculations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{BudgetSide, VarianceStatus};

/// Budget vs actual variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetVariance {
    /// Annual target.
    pub target: Decimal,
    /// Actual amount.
    pub actual: Decimal,
    /// Variance amount, positive when favorable.
    pub variance: Decimal,
    /// Actual as a percentage of target (zero when the target is zero).
    pub percent_of_budget: Decimal,
    /// Variance status.
    pub status: VarianceStatus,
}

impl BudgetVariance {
    /// Calculates variance for an expense-side account.
    ///
    /// variance = target - actual: under budget is favorable.
    #[must_use]
    pub fn for_expense(target: Decimal, actual: Decimal) -> Self {
        Self::build(target, actual, target - actual)
    }

    /// Calculates variance for an income-side account.
    ///
    /// variance = actual - target: over target is favorable.
    #[must_use]
    pub fn for_income(target: Decimal, actual: Decimal) -> Self {
        Self::build(target, actual, actual - target)
    }

    /// Dispatches on the account's side.
    #[must_use]
    pub fn for_side(side: BudgetSide, target: Decimal, actual: Decimal) -> Self {
        match side {
            BudgetSide::Income => Self::for_income(target, actual),
            BudgetSide::Expense => Self::for_expense(target, actual),
        }
    }

    fn build(target: Decimal, actual: Decimal, variance: Decimal) -> Self {
        let percent_of_budget = if target.is_zero() {
            Decimal::ZERO
        } else {
            (actual / target * Decimal::ONE_HUNDRED).round_dp(2)
        };

        let status = match variance.cmp(&Decimal::ZERO) {
            std::cmp::Ordering::Greater => VarianceStatus::Favorable,
            std::cmp::Ordering::Less => VarianceStatus::Unfavorable,
            std::cmp::Ordering::Equal => VarianceStatus::OnBudget,
        };

        Self {
            target,
            actual,
            variance,
            percent_of_budget,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_expense_under_budget_is_favorable() {
        let v = BudgetVariance::for_expense(dec!(1200), dec!(900));
        assert_eq!(v.variance, dec!(300));
        assert_eq!(v.status, VarianceStatus::Favorable);
        assert_eq!(v.percent_of_budget, dec!(75));
    }

    #[test]
    fn test_income_under_target_is_unfavorable() {
        let v = BudgetVariance::for_income(dec!(1200), dec!(900));
        assert_eq!(v.variance, dec!(-300));
        assert_eq!(v.status, VarianceStatus::Unfavorable);
    }

    #[test]
    fn test_zero_target() {
        let v = BudgetVariance::for_side(BudgetSide::Expense, Decimal::ZERO, dec!(50));
        assert_eq!(v.percent_of_budget, Decimal::ZERO);
        assert_eq!(v.status, VarianceStatus::Unfavorable);
    }

    #[test]
    fn test_on_budget() {
        let v = BudgetVariance::for_side(BudgetSide::Income, dec!(10), dec!(10));
        assert_eq!(v.status, VarianceStatus::OnBudget);
        assert_eq!(v.percent_of_budget, dec!(100));
    }
}
