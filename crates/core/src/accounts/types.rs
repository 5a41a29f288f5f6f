//! Account domain types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use riska_shared::types::{AccountId, TenantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::AccountError;

/// Normal balance of an account.
///
/// - Debit-normal: balance += debit - credit
/// - Credit-normal: balance += credit - debit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Balance grows with debits (assets, expenses).
    Debit,
    /// Balance grows with credits (liabilities, equity, income).
    Credit,
}

impl Polarity {
    /// Signed effect of a (debit, credit) pair on an account of this polarity.
    #[must_use]
    pub fn contribution(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

/// Reporting family an account classification rolls up to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountFamily {
    /// Asset-like accounts.
    Asset,
    /// Liability-like accounts.
    Liability,
    /// Owner's equity.
    Equity,
    /// Operating income.
    Income,
    /// Cost of sales.
    CostOfSales,
    /// Operating expenses.
    Expense,
    /// Non-operating income.
    OtherIncome,
    /// Non-operating expenses.
    OtherExpense,
}

impl AccountFamily {
    /// Polarity shared by every account of this family.
    #[must_use]
    pub const fn polarity(self) -> Polarity {
        match self {
            Self::Asset | Self::CostOfSales | Self::Expense | Self::OtherExpense => Polarity::Debit,
            Self::Liability | Self::Equity | Self::Income | Self::OtherIncome => Polarity::Credit,
        }
    }

    /// Returns true for families reported on the balance sheet.
    #[must_use]
    pub const fn is_balance_sheet(self) -> bool {
        matches!(self, Self::Asset | Self::Liability | Self::Equity)
    }

    /// Returns true for families reported on the income statement.
    #[must_use]
    pub const fn is_income_statement(self) -> bool {
        !self.is_balance_sheet()
    }
}

/// Account classification.
///
/// A closed taxonomy. Polarity is a pure function of the classification and
/// can never be chosen independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountClass {
    /// Accounts receivable (A/R).
    AccountsReceivable,
    /// Other current assets.
    OtherCurrentAssets,
    /// Bank and cash accounts.
    Bank,
    /// Fixed assets.
    FixedAssets,
    /// Other assets.
    OtherAssets,
    /// Accounts payable (A/P).
    AccountsPayable,
    /// Credit cards.
    CreditCard,
    /// Other current liabilities.
    OtherCurrentLiabilities,
    /// Long term liabilities.
    LongTermLiabilities,
    /// Equity.
    Equity,
    /// Income.
    Income,
    /// Other income.
    OtherIncome,
    /// Cost of goods sold.
    CostOfGoodsSold,
    /// Expenses.
    Expenses,
    /// Other expense.
    OtherExpense,
}

impl AccountClass {
    /// Every classification, in chart-of-accounts order.
    pub const ALL: [Self; 15] = [
        Self::AccountsReceivable,
        Self::OtherCurrentAssets,
        Self::Bank,
        Self::FixedAssets,
        Self::OtherAssets,
        Self::AccountsPayable,
        Self::CreditCard,
        Self::OtherCurrentLiabilities,
        Self::LongTermLiabilities,
        Self::Equity,
        Self::Income,
        Self::OtherIncome,
        Self::CostOfGoodsSold,
        Self::Expenses,
        Self::OtherExpense,
    ];

    /// The reporting family of this classification.
    #[must_use]
    pub const fn family(self) -> AccountFamily {
        match self {
            Self::AccountsReceivable
            | Self::OtherCurrentAssets
            | Self::Bank
            | Self::FixedAssets
            | Self::OtherAssets => AccountFamily::Asset,
            Self::AccountsPayable
            | Self::CreditCard
            | Self::OtherCurrentLiabilities
            | Self::LongTermLiabilities => AccountFamily::Liability,
            Self::Equity => AccountFamily::Equity,
            Self::Income => AccountFamily::Income,
            Self::OtherIncome => AccountFamily::OtherIncome,
            Self::CostOfGoodsSold => AccountFamily::CostOfSales,
            Self::Expenses => AccountFamily::Expense,
            Self::OtherExpense => AccountFamily::OtherExpense,
        }
    }

    /// The normal balance of this classification.
    #[must_use]
    pub const fn polarity(self) -> Polarity {
        self.family().polarity()
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AccountsReceivable => "Accounts Receivable",
            Self::OtherCurrentAssets => "Other Current Assets",
            Self::Bank => "Bank",
            Self::FixedAssets => "Fixed Assets",
            Self::OtherAssets => "Other Assets",
            Self::AccountsPayable => "Accounts Payable",
            Self::CreditCard => "Credit Card",
            Self::OtherCurrentLiabilities => "Other Current Liabilities",
            Self::LongTermLiabilities => "Long Term Liabilities",
            Self::Equity => "Equity",
            Self::Income => "Income",
            Self::OtherIncome => "Other Income",
            Self::CostOfGoodsSold => "Cost of Goods Sold",
            Self::Expenses => "Expenses",
            Self::OtherExpense => "Other Expense",
        }
    }
}

impl std::fmt::Display for AccountClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AccountClass {
    type Err = AccountError;

    /// Parses a label case-insensitively. The "(A/R)" and "(A/P)" suffixes and
    /// snake_case identifiers are accepted too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .trim_end_matches("(A/R)")
            .trim_end_matches("(A/P)")
            .trim()
            .replace('_', " ")
            .to_lowercase();

        Self::ALL
            .into_iter()
            .find(|class| class.label().to_lowercase() == normalized)
            .ok_or_else(|| AccountError::UnknownClassification(s.to_string()))
    }
}

/// A chart of accounts entry.
///
/// The cached balance is readable by anyone but only the posting engine can
/// change it.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    /// Account ID.
    pub id: AccountId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Account number, unique within the tenant.
    pub number: String,
    /// Descriptive name.
    pub name: String,
    /// Classification.
    pub class: AccountClass,
    /// Whether the account accepts new draft lines.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    pub(crate) balance: Decimal,
}

impl Account {
    /// Creates an active account with a zero balance.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::MissingField` if the number or name is blank.
    pub fn new(
        tenant_id: TenantId,
        number: &str,
        name: &str,
        class: AccountClass,
    ) -> Result<Self, AccountError> {
        let number = number.trim();
        let name = name.trim();
        if number.is_empty() {
            return Err(AccountError::MissingField("number"));
        }
        if name.is_empty() {
            return Err(AccountError::MissingField("name"));
        }

        Ok(Self {
            id: AccountId::new(),
            tenant_id,
            number: number.to_string(),
            name: name.to_string(),
            class,
            is_active: true,
            created_at: Utc::now(),
            balance: Decimal::ZERO,
        })
    }

    /// The account's normal balance.
    #[must_use]
    pub const fn polarity(&self) -> Polarity {
        self.class.polarity()
    }

    /// The account's reporting family.
    #[must_use]
    pub const fn family(&self) -> AccountFamily {
        self.class.family()
    }

    /// Cached signed balance.
    #[must_use]
    pub const fn balance(&self) -> Decimal {
        self.balance
    }
}
