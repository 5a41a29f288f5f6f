//! One-to-one matching of statement lines against posted ledger lines.
//!
//! Matching is metadata over posted facts; nothing here touches a balance.

use std::collections::HashMap;

use chrono::NaiveDate;
use riska_shared::types::{
    DateRange, LineId, StatementLineId, parse_statement_amount, parse_statement_date,
};
use rust_decimal::Decimal;

use super::error::{MatchSide, ReconciliationError};
use super::types::{
    BankAccount, LedgerLineView, MatchedPair, RawStatementRow, ReconciliationView, SkipReason,
    SkippedRow, StatementLine, StatementLineInput,
};
use crate::accounts::Account;
use crate::ledger::{Line, Transaction};

/// The match relation: each statement line and each ledger line has at most
/// one counterpart.
///
/// Both directions are indexed so either side can be checked in O(1).
#[derive(Debug, Clone, Default)]
pub struct MatchBook {
    by_statement: HashMap<StatementLineId, LineId>,
    by_line: HashMap<LineId, StatementLineId>,
}

impl MatchBook {
    /// Creates an empty relation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks and records a match in one step.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyMatched` if either side is taken, or `AmountMismatch`
    /// unless the statement amount equals the ledger line's net amount exactly.
    pub fn propose(
        &mut self,
        statement: &StatementLine,
        ledger: &LedgerLineView,
    ) -> Result<(), ReconciliationError> {
        if self.by_statement.contains_key(&statement.id) {
            return Err(ReconciliationError::AlreadyMatched {
                side: MatchSide::Statement,
            });
        }
        if self.by_line.contains_key(&ledger.line_id) {
            return Err(ReconciliationError::AlreadyMatched {
                side: MatchSide::Ledger,
            });
        }
        if statement.amount != ledger.net_amount {
            return Err(ReconciliationError::AmountMismatch {
                statement_amount: statement.amount,
                ledger_net_amount: ledger.net_amount,
            });
        }

        self.by_statement.insert(statement.id, ledger.line_id);
        self.by_line.insert(ledger.line_id, statement.id);
        Ok(())
    }

    /// Clears the match of a statement line, returning the former counterpart.
    pub fn unmatch(&mut self, statement_line_id: StatementLineId) -> Option<LineId> {
        let line_id = self.by_statement.remove(&statement_line_id)?;
        self.by_line.remove(&line_id);
        Some(line_id)
    }

    /// The ledger line matched to a statement line.
    #[must_use]
    pub fn ledger_line_for(&self, statement_line_id: StatementLineId) -> Option<LineId> {
        self.by_statement.get(&statement_line_id).copied()
    }

    /// The statement line matched to a ledger line.
    #[must_use]
    pub fn statement_line_for(&self, line_id: LineId) -> Option<StatementLineId> {
        self.by_line.get(&line_id).copied()
    }

    /// Returns true if the statement line has a match.
    #[must_use]
    pub fn is_statement_matched(&self, statement_line_id: StatementLineId) -> bool {
        self.by_statement.contains_key(&statement_line_id)
    }

    /// Returns true if the ledger line has a match.
    #[must_use]
    pub fn is_line_matched(&self, line_id: LineId) -> bool {
        self.by_line.contains_key(&line_id)
    }

    /// Number of matched pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_statement.len()
    }

    /// Returns true if nothing is matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_statement.is_empty()
    }
}

/// Stateless reconciliation rules.
pub struct ReconciliationService;

impl ReconciliationService {
    /// Cleans raw statement rows into typed lines.
    ///
    /// Amounts lose `$`, `,` and whitespace, and parentheses mean negative.
    /// Rows with an unreadable date or amount are skipped, not fatal.
    #[must_use]
    pub fn normalize_rows(rows: &[RawStatementRow]) -> (Vec<StatementLineInput>, Vec<SkippedRow>) {
        let mut lines = Vec::with_capacity(rows.len());
        let mut skipped = Vec::new();

        for (index, raw) in rows.iter().enumerate() {
            let row = index + 1;
            let Some(date) = parse_statement_date(&raw.date) else {
                skipped.push(SkippedRow {
                    row,
                    reason: SkipReason::MalformedDate,
                });
                continue;
            };
            let amount = match parse_statement_amount(&raw.amount) {
                Ok(Some(amount)) => amount,
                Ok(None) => {
                    skipped.push(SkippedRow {
                        row,
                        reason: SkipReason::MissingAmount,
                    });
                    continue;
                }
                Err(_) => {
                    skipped.push(SkippedRow {
                        row,
                        reason: SkipReason::MalformedAmount,
                    });
                    continue;
                }
            };
            lines.push(StatementLineInput {
                date,
                description: raw.description.trim().to_string(),
                amount,
            });
        }

        (lines, skipped)
    }

    /// Projects a ledger line for matching against `bank`.
    ///
    /// # Errors
    ///
    /// Returns `LineNotOnBankAccount` if the line posts elsewhere, or
    /// `LineNotPosted` if its transaction is still a draft.
    pub fn ledger_line_view(
        gl_account: &Account,
        txn: &Transaction,
        line: &Line,
    ) -> Result<LedgerLineView, ReconciliationError> {
        if line.account_id != gl_account.id {
            return Err(ReconciliationError::LineNotOnBankAccount {
                line_id: line.id,
                gl_account_id: gl_account.id,
            });
        }
        if !txn.is_posted() {
            return Err(ReconciliationError::LineNotPosted(line.id));
        }

        Ok(LedgerLineView {
            line_id: line.id,
            transaction_id: txn.id,
            reference: txn.reference.clone(),
            date: txn.date,
            memo: if line.memo.is_empty() {
                txn.memo.clone()
            } else {
                line.memo.clone()
            },
            debit: line.debit,
            credit: line.credit,
            net_amount: gl_account.polarity().contribution(line.debit, line.credit),
        })
    }

    /// Builds the matched and unmatched partitions of one bank account.
    ///
    /// The window, when given, applies to statement dates and ledger dates alike.
    pub fn build_view<'a>(
        bank: &BankAccount,
        gl_account: &Account,
        statement_lines: impl IntoIterator<Item = &'a StatementLine>,
        transactions: impl IntoIterator<Item = &'a Transaction>,
        matches: &MatchBook,
        window: Option<DateRange>,
    ) -> ReconciliationView {
        let in_window = |date: NaiveDate| window.is_none_or(|w| w.contains(date));

        let mut ledger_lines: HashMap<LineId, LedgerLineView> = HashMap::new();
        let mut ledger_order: Vec<LineId> = Vec::new();
        for txn in transactions.into_iter().filter(|txn| txn.is_posted()) {
            for line in txn.lines().iter().filter(|l| l.account_id == gl_account.id) {
                if let Ok(view) = Self::ledger_line_view(gl_account, txn, line) {
                    ledger_order.push(view.line_id);
                    ledger_lines.insert(view.line_id, view);
                }
            }
        }

        let mut unmatched_statement = Vec::new();
        let mut matched = Vec::new();
        for statement in statement_lines
            .into_iter()
            .filter(|s| s.bank_account_id == bank.id && in_window(s.date))
        {
            match matches
                .ledger_line_for(statement.id)
                .and_then(|line_id| ledger_lines.get(&line_id))
            {
                Some(ledger) => matched.push(MatchedPair {
                    statement: statement.clone(),
                    ledger: ledger.clone(),
                }),
                None => unmatched_statement.push(statement.clone()),
            }
        }
        unmatched_statement.sort_by_key(|s| s.date);
        matched.sort_by(|a, b| b.statement.date.cmp(&a.statement.date));

        let mut unmatched_ledger: Vec<LedgerLineView> = ledger_order
            .iter()
            .filter(|id| !matches.is_line_matched(**id))
            .filter_map(|id| ledger_lines.get(id))
            .filter(|view| in_window(view.date))
            .cloned()
            .collect();
        unmatched_ledger.sort_by_key(|view| view.date);

        ReconciliationView {
            bank_account_id: bank.id,
            gl_account_id: gl_account.id,
            window,
            unmatched_statement_total: unmatched_statement.iter().map(|s| s.amount).sum(),
            unmatched_ledger_total: unmatched_ledger.iter().map(|v| v.net_amount).sum(),
            matched_total: matched.iter().map(|m| m.statement.amount).sum::<Decimal>(),
            unmatched_statement,
            unmatched_ledger,
            matched,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::AccountClass;
    use crate::ledger::{LineInput, NewTransaction, PostingEngine};
    use chrono::Utc;
    use riska_shared::types::TenantId;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    struct Setup {
        checking: Account,
        bank: BankAccount,
        posted: Vec<Transaction>,
    }

    /// Checking with a -250 payment, a -100 payment and a +400 deposit.
    fn setup() -> Setup {
        let tenant = TenantId::new();
        let checking = Account::new(tenant, "1000", "Checking", AccountClass::Bank).unwrap();
        let supplies = Account::new(tenant, "6100", "Supplies", AccountClass::Expenses).unwrap();
        let sales = Account::new(tenant, "4000", "Sales", AccountClass::Income).unwrap();
        let bank = BankAccount::new(tenant, "Operating", "****1234", &checking).unwrap();
        let mut accounts: HashMap<_, _> = [checking.clone(), supplies.clone(), sales.clone()]
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        let mut posted = Vec::new();
        for (date, debit, credit, amount) in [
            (d(2025, 3, 3), supplies.id, checking.id, dec!(250.00)),
            (d(2025, 3, 5), supplies.id, checking.id, dec!(100.00)),
            (d(2025, 3, 1), checking.id, sales.id, dec!(400.00)),
        ] {
            let mut txn = Transaction::draft(
                tenant,
                format!("JV-{}", posted.len() + 1),
                NewTransaction::new(
                    date,
                    "payment",
                    vec![
                        LineInput::debit(debit, amount, ""),
                        LineInput::credit(credit, amount, ""),
                    ],
                ),
            )
            .unwrap();
            PostingEngine::post(&mut txn, &mut accounts, Utc::now()).unwrap();
            posted.push(txn);
        }

        Setup {
            checking,
            bank,
            posted,
        }
    }

    fn checking_line(setup: &Setup, index: usize) -> LedgerLineView {
        let txn = &setup.posted[index];
        let line = txn
            .lines()
            .iter()
            .find(|l| l.account_id == setup.checking.id)
            .unwrap();
        ReconciliationService::ledger_line_view(&setup.checking, txn, line).unwrap()
    }

    fn statement(setup: &Setup, date: NaiveDate, amount: Decimal) -> StatementLine {
        StatementLine::new(
            setup.bank.tenant_id,
            setup.bank.id,
            StatementLineInput {
                date,
                description: "CARD PURCHASE".into(),
                amount,
            },
        )
    }

    #[test]
    fn test_match_exact_amount() {
        let s = setup();
        let payment = checking_line(&s, 0);
        assert_eq!(payment.net_amount, dec!(-250.00));

        let mut book = MatchBook::new();
        let line = statement(&s, d(2025, 3, 4), dec!(-250.00));
        book.propose(&line, &payment).unwrap();

        assert!(book.is_statement_matched(line.id));
        assert!(book.is_line_matched(payment.line_id));
        assert_eq!(book.ledger_line_for(line.id), Some(payment.line_id));
        assert_eq!(book.statement_line_for(payment.line_id), Some(line.id));
    }

    #[test]
    fn test_mismatched_amount_rejected() {
        let s = setup();
        let small_payment = checking_line(&s, 1);
        let mut book = MatchBook::new();
        let line = statement(&s, d(2025, 3, 4), dec!(-250.00));

        assert_eq!(
            book.propose(&line, &small_payment),
            Err(ReconciliationError::AmountMismatch {
                statement_amount: dec!(-250.00),
                ledger_net_amount: dec!(-100.00),
            })
        );
        assert!(book.is_empty());
    }

    #[test]
    fn test_each_side_matches_once() {
        let s = setup();
        let payment = checking_line(&s, 0);
        let mut book = MatchBook::new();
        let first = statement(&s, d(2025, 3, 4), dec!(-250.00));
        let second = statement(&s, d(2025, 3, 4), dec!(-250.00));
        book.propose(&first, &payment).unwrap();

        assert_eq!(
            book.propose(&second, &payment),
            Err(ReconciliationError::AlreadyMatched {
                side: MatchSide::Ledger
            })
        );
        assert_eq!(
            book.propose(&first, &checking_line(&s, 1)),
            Err(ReconciliationError::AlreadyMatched {
                side: MatchSide::Statement
            })
        );
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_unmatch_frees_both_sides() {
        let s = setup();
        let payment = checking_line(&s, 0);
        let mut book = MatchBook::new();
        let line = statement(&s, d(2025, 3, 4), dec!(-250.00));
        book.propose(&line, &payment).unwrap();

        assert_eq!(book.unmatch(line.id), Some(payment.line_id));
        assert!(!book.is_line_matched(payment.line_id));
        assert_eq!(book.unmatch(line.id), None);

        let other = statement(&s, d(2025, 3, 6), dec!(-250.00));
        book.propose(&other, &payment).unwrap();
    }

    #[test]
    fn test_ledger_line_view_rejects_other_account() {
        let s = setup();
        let txn = &s.posted[0];
        let expense_line = txn
            .lines()
            .iter()
            .find(|l| l.account_id != s.checking.id)
            .unwrap();
        assert_eq!(
            ReconciliationService::ledger_line_view(&s.checking, txn, expense_line),
            Err(ReconciliationError::LineNotOnBankAccount {
                line_id: expense_line.id,
                gl_account_id: s.checking.id,
            })
        );
    }

    #[test]
    fn test_bank_account_requires_asset_mirror() {
        let tenant = TenantId::new();
        let card = Account::new(tenant, "2100", "Card", AccountClass::CreditCard).unwrap();
        assert_eq!(
            BankAccount::new(tenant, "Card", "", &card),
            Err(ReconciliationError::GlAccountNotAsset {
                account_id: card.id,
                class: AccountClass::CreditCard,
            })
        );
    }

    #[rstest]
    #[case("03/14/2025", "$1,250.00", Some(dec!(1250.00)))]
    #[case("2025-03-14", "(45.10)", Some(dec!(-45.10)))]
    #[case("14/03/2025", "-3", Some(dec!(-3)))]
    #[case("03-14-2025", " 7 ", Some(dec!(7)))]
    fn test_normalize_accepts(#[case] date: &str, #[case] amount: &str, #[case] expected: Option<Decimal>) {
        let (lines, skipped) =
            ReconciliationService::normalize_rows(&[RawStatementRow::new(date, " ATM ", amount)]);
        assert!(skipped.is_empty());
        assert_eq!(Some(lines[0].amount), expected);
        assert_eq!(lines[0].date, d(2025, 3, 14));
        assert_eq!(lines[0].description, "ATM");
    }

    #[test]
    fn test_normalize_skips_bad_rows() {
        let rows = [
            RawStatementRow::new("not a date", "x", "1"),
            RawStatementRow::new("2025-03-01", "x", ""),
            RawStatementRow::new("2025-03-01", "x", "abc"),
            RawStatementRow::new("2025-03-01", "ok", "10"),
        ];
        let (lines, skipped) = ReconciliationService::normalize_rows(&rows);

        assert_eq!(lines.len(), 1);
        assert_eq!(
            skipped,
            [
                SkippedRow { row: 1, reason: SkipReason::MalformedDate },
                SkippedRow { row: 2, reason: SkipReason::MissingAmount },
                SkippedRow { row: 3, reason: SkipReason::MalformedAmount },
            ]
        );
    }

    #[test]
    fn test_view_partitions_and_orders() {
        let s = setup();
        let payment = checking_line(&s, 0);
        let mut book = MatchBook::new();
        let matched = statement(&s, d(2025, 3, 4), dec!(-250.00));
        let open_late = statement(&s, d(2025, 3, 9), dec!(-12.00));
        let open_early = statement(&s, d(2025, 3, 2), dec!(400.00));
        book.propose(&matched, &payment).unwrap();
        let statements = [open_late.clone(), matched.clone(), open_early.clone()];

        let view = ReconciliationService::build_view(
            &s.bank,
            &s.checking,
            &statements,
            &s.posted,
            &book,
            None,
        );

        let open: Vec<_> = view.unmatched_statement.iter().map(|l| l.id).collect();
        assert_eq!(open, [open_early.id, open_late.id]);
        let ledger_dates: Vec<_> = view.unmatched_ledger.iter().map(|v| v.date).collect();
        assert_eq!(ledger_dates, [d(2025, 3, 1), d(2025, 3, 5)]);
        assert_eq!(view.matched.len(), 1);
        assert_eq!(view.matched[0].ledger.line_id, payment.line_id);
        assert_eq!(view.unmatched_statement_total, dec!(388.00));
        assert_eq!(view.unmatched_ledger_total, dec!(300.00));
        assert_eq!(view.matched_total, dec!(-250.00));

        let window = DateRange::new(d(2025, 3, 3), d(2025, 3, 5)).unwrap();
        let view = ReconciliationService::build_view(
            &s.bank,
            &s.checking,
            &statements,
            &s.posted,
            &book,
            Some(window),
        );
        assert!(view.unmatched_statement.is_empty());
        assert_eq!(view.unmatched_ledger.len(), 1);
        assert_eq!(view.matched.len(), 1);
    }
}
