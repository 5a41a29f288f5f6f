//! Report generation service.
//!
//! Every report is computed from posted lines only and never mutates state.
//! Date windows are inclusive on both ends.

use std::collections::HashMap;

use chrono::NaiveDate;
use riska_shared::types::{AccountId, DateRange};
use rust_decimal::Decimal;

use super::error::ReportError;
use super::types::{
    AccountBalance, AccountLedgerEntry, AccountLedgerReport, AccountSelection, BalanceSheetReport,
    BalanceSheetSection, CustomLedgerReport, IncomeStatementReport, IncomeStatementSection, LedgerSnapshot,
    TrialBalanceReport, TrialBalanceRow, TrialBalanceTotals,
};
use crate::accounts::{Account, AccountFamily, Polarity};
use crate::ledger::{Line, Transaction};

/// Debit and credit sums of one account.
#[derive(Debug, Clone, Copy, Default)]
struct Movement {
    debit: Decimal,
    credit: Decimal,
}

impl Movement {
    fn add(&mut self, line: &Line) {
        self.debit += line.debit;
        self.credit += line.credit;
    }
}

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Trial balance as of a date.
    ///
    /// Each account's net movement lands in its natural column when the
    /// polarity-signed net is non-negative, otherwise its absolute value lands
    /// in the opposite column. Every account appears, ordered by number.
    #[must_use]
    pub fn trial_balance(snapshot: &LedgerSnapshot, as_of: NaiveDate) -> TrialBalanceReport {
        let movements = Self::movements(snapshot, |date| date <= as_of);

        let rows: Vec<TrialBalanceRow> = Self::by_number(snapshot)
            .into_iter()
            .map(|account| {
                let movement = movements.get(&account.id).copied().unwrap_or_default();
                let net = account.polarity().contribution(movement.debit, movement.credit);
                let (debit, credit) = match (account.polarity(), net >= Decimal::ZERO) {
                    (Polarity::Debit, true) => (net, Decimal::ZERO),
                    (Polarity::Debit, false) => (Decimal::ZERO, net.abs()),
                    (Polarity::Credit, true) => (Decimal::ZERO, net),
                    (Polarity::Credit, false) => (net.abs(), Decimal::ZERO),
                };
                TrialBalanceRow {
                    account_id: account.id,
                    number: account.number.clone(),
                    name: account.name.clone(),
                    class: account.class,
                    debit,
                    credit,
                }
            })
            .collect();

        let total_debit: Decimal = rows.iter().map(|r| r.debit).sum();
        let total_credit: Decimal = rows.iter().map(|r| r.credit).sum();

        TrialBalanceReport {
            report_type: "trial_balance".to_string(),
            as_of,
            currency: snapshot.currency.clone(),
            rows,
            totals: TrialBalanceTotals {
                total_debit,
                total_credit,
                is_balanced: total_debit == total_credit,
            },
        }
    }

    /// Income statement over an inclusive range.
    ///
    /// Accounts with zero net movement in the range are omitted.
    #[must_use]
    pub fn income_statement(snapshot: &LedgerSnapshot, period: DateRange) -> IncomeStatementReport {
        let movements = Self::movements(snapshot, |date| period.contains(date));

        let mut income = IncomeStatementSection::default();
        let mut cost_of_sales = IncomeStatementSection::default();
        let mut expenses = IncomeStatementSection::default();
        let mut other_income = IncomeStatementSection::default();
        let mut other_expenses = IncomeStatementSection::default();

        for account in Self::by_number(snapshot) {
            let Some(movement) = movements.get(&account.id) else {
                continue;
            };
            let row = Self::account_balance(account, *movement);
            if row.balance.is_zero() {
                continue;
            }
            let section = match account.family() {
                AccountFamily::Income => &mut income,
                AccountFamily::CostOfSales => &mut cost_of_sales,
                AccountFamily::Expense => &mut expenses,
                AccountFamily::OtherIncome => &mut other_income,
                AccountFamily::OtherExpense => &mut other_expenses,
                AccountFamily::Asset | AccountFamily::Liability | AccountFamily::Equity => continue,
            };
            section.total += row.balance;
            section.accounts.push(row);
        }

        let gross_profit = income.total - cost_of_sales.total;
        let net_operating_income = gross_profit - expenses.total;
        let net_other_income = other_income.total - other_expenses.total;

        IncomeStatementReport {
            report_type: "income_statement".to_string(),
            period,
            currency: snapshot.currency.clone(),
            income,
            cost_of_sales,
            gross_profit,
            expenses,
            net_operating_income,
            other_income,
            other_expenses,
            net_other_income,
            net_income: net_operating_income + net_other_income,
        }
    }

    /// Balance sheet as of a date.
    ///
    /// Net income of every posted line up to `as_of` is folded into equity,
    /// so assets equal liabilities plus equity whenever the ledger balances.
    #[must_use]
    pub fn balance_sheet(snapshot: &LedgerSnapshot, as_of: NaiveDate) -> BalanceSheetReport {
        let movements = Self::movements(snapshot, |date| date <= as_of);

        let mut assets = BalanceSheetSection::default();
        let mut liabilities = BalanceSheetSection::default();
        let mut equity = BalanceSheetSection::default();
        let mut current_net_income = Decimal::ZERO;

        for account in Self::by_number(snapshot) {
            let Some(movement) = movements.get(&account.id) else {
                continue;
            };
            let row = Self::account_balance(account, *movement);
            let section = match account.family() {
                AccountFamily::Asset => &mut assets,
                AccountFamily::Liability => &mut liabilities,
                AccountFamily::Equity => &mut equity,
                AccountFamily::Income | AccountFamily::OtherIncome => {
                    current_net_income += row.balance;
                    continue;
                }
                AccountFamily::CostOfSales | AccountFamily::Expense | AccountFamily::OtherExpense => {
                    current_net_income -= row.balance;
                    continue;
                }
            };
            if row.balance.is_zero() {
                continue;
            }
            section.total += row.balance;
            section.accounts.push(row);
        }

        let total_assets = assets.total;
        let total_liabilities = liabilities.total;
        let total_equity = equity.total + current_net_income;
        let liabilities_and_equity = total_liabilities + total_equity;

        BalanceSheetReport {
            report_type: "balance_sheet".to_string(),
            as_of,
            currency: snapshot.currency.clone(),
            assets,
            liabilities,
            equity,
            current_net_income,
            total_assets,
            total_liabilities,
            total_equity,
            liabilities_and_equity,
            is_balanced: total_assets == liabilities_and_equity,
        }
    }

    /// Running-balance ledger of one account over an inclusive range.
    ///
    /// The opening balance covers every posted line dated before the range.
    /// Lines are ordered by date, then posting order, so the same inputs always
    /// produce the same sequence.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::AccountNotFound` if the account is not in the snapshot.
    pub fn account_ledger(
        snapshot: &LedgerSnapshot,
        account_id: AccountId,
        period: DateRange,
    ) -> Result<AccountLedgerReport, ReportError> {
        let account = snapshot
            .account(account_id)
            .ok_or(ReportError::AccountNotFound(account_id))?;
        Ok(Self::ledger_walk(snapshot, account, period))
    }

    /// Running-balance ledgers of several accounts over an inclusive range.
    ///
    /// Explicit accounts take priority over classifications; an empty
    /// selection covers the whole chart. Ids not in the snapshot are ignored.
    /// Accounts with no lines in the range and a zero cached balance are left
    /// out.
    #[must_use]
    pub fn custom_ledger(
        snapshot: &LedgerSnapshot,
        period: DateRange,
        selection: &AccountSelection,
    ) -> CustomLedgerReport {
        let accounts = Self::by_number(snapshot)
            .into_iter()
            .filter(|account| selection.includes(account))
            .filter_map(|account| {
                let ledger = Self::ledger_walk(snapshot, account, period);
                (!ledger.entries.is_empty() || !account.balance().is_zero()).then_some(ledger)
            })
            .collect();

        CustomLedgerReport {
            report_type: "custom_ledger".to_string(),
            period,
            currency: snapshot.currency.clone(),
            accounts,
        }
    }

    fn ledger_walk(
        snapshot: &LedgerSnapshot,
        account: &Account,
        period: DateRange,
    ) -> AccountLedgerReport {
        let polarity = account.polarity();

        let mut opening_balance = Decimal::ZERO;
        let mut in_range: Vec<(&Transaction, &Line)> = Vec::new();
        for (txn, line) in Self::posted_lines(snapshot).filter(|(_, l)| l.account_id == account.id) {
            if txn.date < period.start() {
                opening_balance += polarity.contribution(line.debit, line.credit);
            } else if txn.date <= period.end() {
                in_range.push((txn, line));
            }
        }
        in_range.sort_by_key(|(txn, _)| txn.date);

        let mut running_balance = opening_balance;
        let entries = in_range
            .into_iter()
            .map(|(txn, line)| {
                running_balance += polarity.contribution(line.debit, line.credit);
                AccountLedgerEntry {
                    line_id: line.id,
                    transaction_id: txn.id,
                    date: txn.date,
                    reference: txn.reference.clone(),
                    memo: txn.memo.clone(),
                    line_memo: line.memo.clone(),
                    debit: line.debit,
                    credit: line.credit,
                    running_balance,
                }
            })
            .collect();

        AccountLedgerReport {
            report_type: "account_ledger".to_string(),
            account_id: account.id,
            number: account.number.clone(),
            name: account.name.clone(),
            period,
            currency: snapshot.currency.clone(),
            opening_balance,
            entries,
            closing_balance: running_balance,
        }
    }

    /// Net movement of every account over posted lines whose date passes `include`.
    pub(crate) fn account_movements(
        snapshot: &LedgerSnapshot,
        include: impl Fn(NaiveDate) -> bool,
    ) -> HashMap<AccountId, (Decimal, Decimal)> {
        Self::movements(snapshot, include)
            .into_iter()
            .map(|(id, m)| (id, (m.debit, m.credit)))
            .collect()
    }

    fn movements(
        snapshot: &LedgerSnapshot,
        include: impl Fn(NaiveDate) -> bool,
    ) -> HashMap<AccountId, Movement> {
        let mut movements: HashMap<AccountId, Movement> = HashMap::new();
        for (_, line) in Self::posted_lines(snapshot).filter(|(txn, _)| include(txn.date)) {
            movements.entry(line.account_id).or_default().add(line);
        }
        movements
    }

    fn posted_lines(snapshot: &LedgerSnapshot) -> impl Iterator<Item = (&Transaction, &Line)> {
        snapshot
            .transactions
            .iter()
            .filter(|txn| txn.is_posted())
            .flat_map(|txn| txn.lines().iter().map(move |line| (txn.as_ref(), line)))
    }

    fn by_number(snapshot: &LedgerSnapshot) -> Vec<&Account> {
        let mut accounts: Vec<&Account> = snapshot.accounts.iter().collect();
        accounts.sort_by(|a, b| a.number.cmp(&b.number));
        accounts
    }

    fn account_balance(account: &Account, movement: Movement) -> AccountBalance {
        AccountBalance {
            account_id: account.id,
            number: account.number.clone(),
            name: account.name.clone(),
            class: account.class,
            family: account.family(),
            total_debit: movement.debit,
            total_credit: movement.credit,
            balance: account.polarity().contribution(movement.debit, movement.credit),
        }
    }
}
