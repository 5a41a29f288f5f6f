//! Posting engine: the only code path that changes account balances.
//!
//! Two modes share the same contribution rule:
//! - Incremental: [`PostingEngine::post`] applies one transaction's lines
//! - Recompute: [`PostingEngine::apply_all_posted_for_account`] rebuilds a
//!   cached balance from the posted log
//!
//! Tests assert the two always agree.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use riska_shared::types::{AccountId, TransactionId};
use rust_decimal::Decimal;
use serde::Serialize;

use super::error::LedgerError;
use super::types::{Line, Transaction, TransactionTotals};
use super::validation::validate_for_posting;
use crate::accounts::Account;

/// Net balance change applied to one account by a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BalanceChange {
    /// The account.
    pub account_id: AccountId,
    /// Signed change in the account's cached balance.
    pub delta: Decimal,
    /// Cached balance after the posting.
    pub balance_after: Decimal,
}

/// Result of a successful posting.
#[derive(Debug, Clone, Serialize)]
pub struct PostingReceipt {
    /// The posted transaction.
    pub transaction_id: TransactionId,
    /// Posting timestamp.
    pub posted_at: DateTime<Utc>,
    /// Totals of the posted lines.
    pub totals: TransactionTotals,
    /// One entry per touched account, ordered by account ID.
    pub changes: Vec<BalanceChange>,
}

/// Outcome of rebuilding (or verifying) one account's cached balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecomputeOutcome {
    /// The account.
    pub account_id: AccountId,
    /// Cached balance before the replay.
    pub cached_before: Decimal,
    /// Balance replayed from posted lines.
    pub recomputed: Decimal,
}

impl RecomputeOutcome {
    /// Cached minus replayed; zero when consistent.
    #[must_use]
    pub fn drift(&self) -> Decimal {
        self.cached_before - self.recomputed
    }

    /// Returns true if the cached balance disagreed with the log.
    #[must_use]
    pub fn has_drift(&self) -> bool {
        self.cached_before != self.recomputed
    }
}

/// Stateless posting engine.
pub struct PostingEngine;

impl PostingEngine {
    /// Signed effect of `line` on `account`, per the account's polarity.
    #[must_use]
    pub fn contribution(account: &Account, line: &Line) -> Decimal {
        account.polarity().contribution(line.debit, line.credit)
    }

    /// Applies one line to its account's cached balance.
    pub fn apply(account: &mut Account, line: &Line) -> Decimal {
        debug_assert_eq!(account.id, line.account_id);
        let delta = Self::contribution(account, line);
        account.balance += delta;
        delta
    }

    /// Posts a Draft: validates, then marks it Posted and applies every line.
    ///
    /// All lookups happen before anything is mutated, so on error neither the
    /// transaction nor any balance has changed.
    ///
    /// # Errors
    ///
    /// Returns `NotDraft`, `UnbalancedEntry`, `EmptyTransaction`, or
    /// `AccountNotFound` if a line's account is missing from `accounts`.
    pub fn post(
        txn: &mut Transaction,
        accounts: &mut HashMap<AccountId, Account>,
        posted_at: DateTime<Utc>,
    ) -> Result<PostingReceipt, LedgerError> {
        let totals = validate_for_posting(txn)?;

        if let Some(line) = txn
            .lines()
            .iter()
            .find(|line| !accounts.contains_key(&line.account_id))
        {
            return Err(LedgerError::AccountNotFound(line.account_id));
        }

        let mut deltas: BTreeMap<AccountId, Decimal> = BTreeMap::new();
        for line in txn.lines() {
            if let Some(account) = accounts.get_mut(&line.account_id) {
                let delta = Self::apply(account, line);
                *deltas.entry(line.account_id).or_default() += delta;
            }
        }
        txn.mark_posted(posted_at);

        let changes = deltas
            .into_iter()
            .map(|(account_id, delta)| BalanceChange {
                account_id,
                delta,
                balance_after: accounts
                    .get(&account_id)
                    .map_or(Decimal::ZERO, Account::balance),
            })
            .collect();

        Ok(PostingReceipt {
            transaction_id: txn.id,
            posted_at,
            totals,
            changes,
        })
    }

    /// Sum of contributions of every posted line referencing `account`.
    ///
    /// Drafts are ignored. Order does not matter.
    pub fn replay<'a>(
        account: &Account,
        transactions: impl IntoIterator<Item = &'a Transaction>,
    ) -> Decimal {
        transactions
            .into_iter()
            .filter(|txn| txn.is_posted())
            .flat_map(Transaction::lines)
            .filter(|line| line.account_id == account.id)
            .map(|line| Self::contribution(account, line))
            .sum()
    }

    /// Compares the cached balance against a replay without mutating anything.
    pub fn verify<'a>(
        account: &Account,
        transactions: impl IntoIterator<Item = &'a Transaction>,
    ) -> RecomputeOutcome {
        RecomputeOutcome {
            account_id: account.id,
            cached_before: account.balance,
            recomputed: Self::replay(account, transactions),
        }
    }

    /// Resets the cached balance to zero and re-applies every posted line.
    ///
    /// Idempotent: running it twice yields the same balance.
    pub fn apply_all_posted_for_account<'a>(
        account: &mut Account,
        transactions: impl IntoIterator<Item = &'a Transaction>,
    ) -> RecomputeOutcome {
        let account_id = account.id;
        let cached_before = account.balance;
        account.balance = Decimal::ZERO;
        for line in transactions
            .into_iter()
            .filter(|txn| txn.is_posted())
            .flat_map(Transaction::lines)
            .filter(|line| line.account_id == account_id)
        {
            Self::apply(account, line);
        }

        RecomputeOutcome {
            account_id: account.id,
            cached_before,
            recomputed: account.balance,
        }
    }
}
