//! Draft lifecycle, posting and balance integrity through the store.

mod common;

use common::{Chart, balance, d, post_transfer, transfer};
use proptest::prelude::*;
use riska_core::accounts::{AccountError, Polarity};
use riska_core::ledger::{EntrySource, LedgerError, LineInput, NewTransaction, TransactionStatus};
use riska_shared::LedgerConfig;
use riska_shared::types::TransactionId;
use riska_store::{AccountFilter, CreateAccountInput, Store, TransactionFilter};
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn test_office_supplies_paid_from_checking() {
    let store = Store::default();
    let chart = Chart::create(&store);

    let (txn, receipt) = post_transfer(
        &store,
        chart.tenant,
        d(2025, 3, 14),
        chart.supplies,
        chart.checking,
        dec!(500.00),
    );

    assert_eq!(txn.status(), TransactionStatus::Posted);
    assert!(txn.posted_at().is_some());
    assert_eq!(receipt.totals.debit_total, dec!(500.00));
    assert_eq!(balance(&store, chart.tenant, chart.supplies), dec!(500.00));
    assert_eq!(balance(&store, chart.tenant, chart.checking), dec!(-500.00));
}

#[test]
fn test_unbalanced_post_changes_nothing() {
    let store = Store::default();
    let chart = Chart::create(&store);
    let txns = store.transactions();
    let draft = txns
        .create_draft(
            chart.tenant,
            NewTransaction::new(
                d(2025, 3, 14),
                "short",
                vec![
                    LineInput::debit(chart.supplies, dec!(500), ""),
                    LineInput::credit(chart.checking, dec!(450), ""),
                ],
            ),
        )
        .unwrap();

    assert_eq!(
        txns.post(chart.tenant, draft.id).unwrap_err(),
        LedgerError::UnbalancedEntry {
            debit_total: dec!(500),
            credit_total: dec!(450),
        }
    );
    assert_eq!(txns.get(chart.tenant, draft.id).unwrap().status(), TransactionStatus::Draft);
    assert_eq!(balance(&store, chart.tenant, chart.supplies), Decimal::ZERO);
    assert_eq!(balance(&store, chart.tenant, chart.checking), Decimal::ZERO);
}

#[test]
fn test_post_checks_run_in_order() {
    let store = Store::default();
    let chart = Chart::create(&store);
    let txns = store.transactions();

    let empty = txns
        .create_draft(chart.tenant, NewTransaction::new(d(2025, 1, 1), "", Vec::new()))
        .unwrap();
    assert_eq!(
        txns.post(chart.tenant, empty.id).unwrap_err(),
        LedgerError::EmptyTransaction
    );

    let (posted, _) = post_transfer(
        &store,
        chart.tenant,
        d(2025, 1, 2),
        chart.checking,
        chart.equity,
        dec!(1000),
    );
    assert_eq!(
        txns.post(chart.tenant, posted.id).unwrap_err(),
        LedgerError::NotDraft(posted.id)
    );
    assert_eq!(balance(&store, chart.tenant, chart.checking), dec!(1000));

    let missing = TransactionId::new();
    assert_eq!(
        txns.post(chart.tenant, missing).unwrap_err(),
        LedgerError::TransactionNotFound(missing)
    );
}

#[test]
fn test_posted_is_immutable() {
    let store = Store::default();
    let chart = Chart::create(&store);
    let txns = store.transactions();
    let (posted, _) = post_transfer(
        &store,
        chart.tenant,
        d(2025, 1, 2),
        chart.checking,
        chart.equity,
        dec!(1000),
    );

    assert_eq!(
        txns.replace_lines(
            chart.tenant,
            posted.id,
            vec![LineInput::debit(chart.checking, dec!(1), "")]
        )
        .unwrap_err(),
        LedgerError::NotDraft(posted.id)
    );
    assert_eq!(
        txns.delete_draft(chart.tenant, posted.id).unwrap_err(),
        LedgerError::NotDraft(posted.id)
    );
    assert_eq!(txns.get(chart.tenant, posted.id).unwrap().lines().len(), 2);
}

#[test]
fn test_draft_lines_replaced_then_posted() {
    let store = Store::default();
    let chart = Chart::create(&store);
    let txns = store.transactions();
    let draft = txns
        .create_draft(
            chart.tenant,
            NewTransaction::new(
                d(2025, 2, 1),
                "stock purchase",
                vec![LineInput::debit(chart.cogs, dec!(80), "")],
            ),
        )
        .unwrap();

    let replaced = txns
        .replace_lines(
            chart.tenant,
            draft.id,
            vec![
                LineInput::debit(chart.cogs, dec!(80), "goods"),
                LineInput::credit(chart.payable, dec!(80), "supplier"),
            ],
        )
        .unwrap();
    assert_eq!(replaced.lines().len(), 2);
    assert_eq!(replaced.reference, draft.reference);

    txns.post(chart.tenant, draft.id).unwrap();
    assert_eq!(balance(&store, chart.tenant, chart.payable), dec!(80));
}

#[test]
fn test_draft_rejects_bad_lines() {
    let store = Store::default();
    let chart = Chart::create(&store);
    let txns = store.transactions();

    assert_eq!(
        txns.create_draft(
            chart.tenant,
            NewTransaction::new(
                d(2025, 1, 1),
                "",
                vec![LineInput {
                    account_id: chart.checking,
                    debit: dec!(5),
                    credit: dec!(5),
                    memo: String::new(),
                }],
            ),
        )
        .unwrap_err(),
        LedgerError::BothSidesSet { line: 0 }
    );

    let stranger = riska_shared::types::AccountId::new();
    assert_eq!(
        txns.create_draft(chart.tenant, transfer(d(2025, 1, 1), stranger, chart.checking, dec!(1)))
            .unwrap_err(),
        LedgerError::AccountNotFound(stranger)
    );
    assert!(txns.list(chart.tenant, TransactionFilter::default()).is_empty());
}

#[test]
fn test_inactive_account_blocks_new_drafts_only() {
    let store = Store::default();
    let chart = Chart::create(&store);
    let txns = store.transactions();
    let pending = txns
        .create_draft(chart.tenant, transfer(d(2025, 1, 5), chart.supplies, chart.checking, dec!(20)))
        .unwrap();

    store.accounts().deactivate(chart.tenant, chart.supplies).unwrap();
    assert_eq!(
        txns.create_draft(chart.tenant, transfer(d(2025, 1, 6), chart.supplies, chart.checking, dec!(5)))
            .unwrap_err(),
        LedgerError::AccountInactive(chart.supplies)
    );
    txns.post(chart.tenant, pending.id).unwrap();
    assert_eq!(balance(&store, chart.tenant, chart.supplies), dec!(20));

    let active = store.accounts().list(
        chart.tenant,
        AccountFilter {
            active_only: true,
            class: None,
        },
    );
    assert!(active.iter().all(|a| a.id != chart.supplies));

    store.accounts().reactivate(chart.tenant, chart.supplies).unwrap();
    txns.create_draft(chart.tenant, transfer(d(2025, 1, 6), chart.supplies, chart.checking, dec!(5)))
        .unwrap();
}

#[test]
fn test_inactive_accounts_allowed_when_configured() {
    let store = Store::new(LedgerConfig {
        reject_inactive_accounts: false,
        ..LedgerConfig::default()
    });
    let chart = Chart::create(&store);
    store.accounts().deactivate(chart.tenant, chart.supplies).unwrap();
    post_transfer(&store, chart.tenant, d(2025, 1, 6), chart.supplies, chart.checking, dec!(5));
    assert_eq!(balance(&store, chart.tenant, chart.supplies), dec!(5));
}

#[test]
fn test_references_follow_prefix_and_sequence() {
    let store = Store::new(LedgerConfig {
        reference_prefix: "GJ".to_string(),
        ..LedgerConfig::default()
    });
    let chart = Chart::create(&store);
    let txns = store.transactions();

    let first = txns
        .create_draft(chart.tenant, transfer(d(2025, 3, 14), chart.supplies, chart.checking, dec!(1)))
        .unwrap();
    let second = txns
        .create_draft(chart.tenant, transfer(d(2025, 3, 15), chart.supplies, chart.checking, dec!(1)))
        .unwrap();

    assert_eq!(first.reference, "GJ-20250314-00001");
    assert_eq!(second.reference, "GJ-20250315-00002");
    assert_eq!(first.source, EntrySource::Manual);
}

#[test]
fn test_delete_draft() {
    let store = Store::default();
    let chart = Chart::create(&store);
    let txns = store.transactions();
    let draft = txns
        .create_draft(chart.tenant, transfer(d(2025, 3, 14), chart.supplies, chart.checking, dec!(1)))
        .unwrap();

    txns.delete_draft(chart.tenant, draft.id).unwrap();
    assert_eq!(
        txns.get(chart.tenant, draft.id).unwrap_err(),
        LedgerError::TransactionNotFound(draft.id)
    );
}

#[test]
fn test_reversal_offsets_original() {
    let store = Store::default();
    let chart = Chart::create(&store);
    let txns = store.transactions();
    let (original, _) = post_transfer(
        &store,
        chart.tenant,
        d(2025, 3, 14),
        chart.supplies,
        chart.checking,
        dec!(500),
    );

    let receipt = txns
        .reverse(chart.tenant, original.id, d(2025, 3, 20), None)
        .unwrap();
    let reversal = txns.get(chart.tenant, receipt.transaction_id).unwrap();

    assert_eq!(reversal.reverses, Some(original.id));
    assert_eq!(reversal.source, EntrySource::Reversal);
    assert_eq!(reversal.memo, format!("Reversal of {}", original.reference));
    assert!(reversal.is_posted());
    assert_eq!(balance(&store, chart.tenant, chart.supplies), Decimal::ZERO);
    assert_eq!(balance(&store, chart.tenant, chart.checking), Decimal::ZERO);
    assert!(txns.get(chart.tenant, original.id).unwrap().is_posted());

    assert_eq!(
        txns.reverse(chart.tenant, original.id, d(2025, 3, 21), None)
            .unwrap_err(),
        LedgerError::AlreadyReversed {
            original: original.id,
            reversal: reversal.id,
        }
    );
}

#[test]
fn test_reversal_requires_posted() {
    let store = Store::default();
    let chart = Chart::create(&store);
    let txns = store.transactions();
    let draft = txns
        .create_draft(chart.tenant, transfer(d(2025, 3, 14), chart.supplies, chart.checking, dec!(1)))
        .unwrap();

    assert_eq!(
        txns.reverse(chart.tenant, draft.id, d(2025, 3, 20), Some("undo".to_string()))
            .unwrap_err(),
        LedgerError::NotPosted(draft.id)
    );
}

#[test]
fn test_list_and_search() {
    let store = Store::default();
    let chart = Chart::create(&store);
    let txns = store.transactions();
    post_transfer(&store, chart.tenant, d(2025, 1, 10), chart.checking, chart.equity, dec!(1000));
    txns.create_draft(
        chart.tenant,
        NewTransaction::new(
            d(2025, 2, 10),
            "Printer paper",
            vec![LineInput::debit(chart.supplies, dec!(30), "")],
        ),
    )
    .unwrap();

    let all = txns.list(chart.tenant, TransactionFilter::default());
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].date, d(2025, 2, 10));

    let drafts = txns.list(
        chart.tenant,
        TransactionFilter {
            status: Some(TransactionStatus::Draft),
            window: None,
        },
    );
    assert_eq!(drafts.len(), 1);

    let found = txns.search(chart.tenant, "PRINTER");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].memo, "Printer paper");
    assert_eq!(txns.search(chart.tenant, "20250110").len(), 1);
}

#[test]
fn test_account_registry_rules() {
    let store = Store::default();
    let chart = Chart::create(&store);
    let accounts = store.accounts();

    assert_eq!(
        accounts
            .create(chart.tenant, CreateAccountInput::new("1000", "Savings", "Bank"))
            .unwrap_err(),
        AccountError::DuplicateAccountNumber("1000".to_string())
    );
    assert_eq!(
        accounts
            .create(chart.tenant, CreateAccountInput::new("1300", "Stock", "Inventory"))
            .unwrap_err(),
        AccountError::UnknownClassification("Inventory".to_string())
    );

    let spare = accounts
        .create(chart.tenant, CreateAccountInput::new("1900", "Suspense", "other current assets"))
        .unwrap();
    assert_eq!(accounts.find_by_number(chart.tenant, "1900").unwrap().id, spare.id);
    accounts.delete(chart.tenant, spare.id).unwrap();
    assert!(accounts.find_by_number(chart.tenant, "1900").is_none());

    post_transfer(&store, chart.tenant, d(2025, 1, 10), chart.checking, chart.equity, dec!(10));
    assert_eq!(
        accounts.delete(chart.tenant, chart.checking).unwrap_err(),
        AccountError::AccountInUse(chart.checking)
    );

    let numbers: Vec<String> = accounts
        .list(chart.tenant, AccountFilter::default())
        .into_iter()
        .map(|a| a.number)
        .collect();
    let mut sorted = numbers.clone();
    sorted.sort();
    assert_eq!(numbers, sorted);
}

#[test]
fn test_recompute_is_idempotent_and_matches_cache() {
    let store = Store::default();
    let chart = Chart::create(&store);
    post_transfer(&store, chart.tenant, d(2025, 1, 10), chart.checking, chart.equity, dec!(1000));
    post_transfer(&store, chart.tenant, d(2025, 1, 11), chart.supplies, chart.checking, dec!(75.25));
    store
        .transactions()
        .create_draft(chart.tenant, transfer(d(2025, 1, 12), chart.supplies, chart.checking, dec!(9)))
        .unwrap();

    let accounts = store.accounts();
    assert!(accounts.verify_balances(chart.tenant).is_empty());

    let first = accounts.recompute_balance(chart.tenant, chart.checking).unwrap();
    let second = accounts.recompute_balance(chart.tenant, chart.checking).unwrap();
    assert!(!first.has_drift());
    assert_eq!(first.recomputed, dec!(924.75));
    assert_eq!(second.recomputed, first.recomputed);

    let all = accounts.recompute_all(chart.tenant);
    assert_eq!(all.len(), 9);
    assert!(all.iter().all(|outcome| !outcome.has_drift()));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Whatever gets posted, the cache equals a replay and the trial balance balances.
    #[test]
    fn prop_cached_balances_match_replay(
        amounts in prop::collection::vec((1i64..1_000_000, 0usize..9, 0usize..9, any::<bool>()), 1..40),
    ) {
        let store = Store::default();
        let chart = Chart::create(&store);
        let ids = [
            chart.checking, chart.receivable, chart.payable, chart.equity, chart.sales,
            chart.cogs, chart.supplies, chart.interest, chart.bank_fees,
        ];
        let txns = store.transactions();

        for (cents, debit, credit, balanced) in amounts {
            let amount = Decimal::new(cents, 2);
            let credit_amount = if balanced { amount } else { amount + Decimal::ONE };
            let draft = txns
                .create_draft(
                    chart.tenant,
                    NewTransaction::new(
                        d(2025, 6, 1),
                        "",
                        vec![
                            LineInput::debit(ids[debit], amount, ""),
                            LineInput::credit(ids[credit], credit_amount, ""),
                        ],
                    ),
                )
                .unwrap();
            let posted = txns.post(chart.tenant, draft.id);
            prop_assert_eq!(posted.is_ok(), balanced);
        }

        prop_assert!(store.accounts().verify_balances(chart.tenant).is_empty());
        let trial = store.reports().trial_balance(chart.tenant, d(2025, 12, 31));
        prop_assert!(trial.totals.is_balanced);
        prop_assert_eq!(trial.totals.total_debit, trial.totals.total_credit);
    }
}

#[rstest]
#[case::negative_debit(dec!(-1), dec!(0), LedgerError::NegativeAmount { line: 1 })]
#[case::negative_credit(dec!(0), dec!(-0.01), LedgerError::NegativeAmount { line: 1 })]
#[case::both_sides(dec!(2), dec!(3), LedgerError::BothSidesSet { line: 1 })]
fn test_draft_rejects_bad_second_line(
    #[case] debit: Decimal,
    #[case] credit: Decimal,
    #[case] expected: LedgerError,
) {
    let store = Store::default();
    let chart = Chart::create(&store);
    let lines = vec![
        LineInput::debit(chart.supplies, dec!(10), ""),
        LineInput {
            account_id: chart.checking,
            debit,
            credit,
            memo: String::new(),
        },
    ];

    let err = store
        .transactions()
        .create_draft(chart.tenant, NewTransaction::new(d(2025, 1, 1), "", lines))
        .unwrap_err();
    assert_eq!(err, expected);
    assert_eq!(store.transactions().list(chart.tenant, TransactionFilter::default()).len(), 0);
}

#[rstest]
#[case("Bank", Polarity::Debit)]
#[case("credit card", Polarity::Credit)]
#[case("Cost of Goods Sold", Polarity::Debit)]
#[case("Other Income", Polarity::Credit)]
#[case("Long Term Liabilities", Polarity::Credit)]
#[case("Accounts Receivable (A/R)", Polarity::Debit)]
fn test_created_account_takes_polarity_from_label(#[case] label: &str, #[case] expected: Polarity) {
    let store = Store::default();
    let tenant = riska_shared::types::TenantId::new();
    let account = store
        .accounts()
        .create(tenant, CreateAccountInput::new("1000", "Any", label))
        .unwrap();
    assert_eq!(account.polarity(), expected);
    assert_eq!(account.balance(), Decimal::ZERO);
}

#[test]
fn test_account_search_by_number_or_name() {
    let store = Store::default();
    let chart = Chart::create(&store);
    let accounts = store.accounts();

    let payable: Vec<String> = accounts
        .search(chart.tenant, "  PAYABLE ")
        .into_iter()
        .map(|a| a.number)
        .collect();
    assert_eq!(payable, ["2000"]);

    let by_number: Vec<String> = accounts
        .search(chart.tenant, "00")
        .into_iter()
        .map(|a| a.number)
        .collect();
    assert_eq!(by_number.len(), 9);
    assert_eq!(by_number[0], "1000");

    let income: Vec<String> = accounts
        .search(chart.tenant, "income")
        .into_iter()
        .map(|a| a.name)
        .collect();
    assert_eq!(income, ["Interest Income"]);

    assert_eq!(accounts.search(chart.tenant, "").len(), 9);
    assert!(accounts.search(chart.tenant, "inventory").is_empty());
    assert!(accounts.search(riska_shared::types::TenantId::new(), "").is_empty());
}
