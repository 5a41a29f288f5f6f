//! Tenant isolation: another tenant's entities read exactly like missing ones.

mod common;

use common::{Chart, balance, d, post_transfer, transfer};
use riska_core::accounts::AccountError;
use riska_core::budget::BudgetError;
use riska_core::ledger::LedgerError;
use riska_core::reconciliation::ReconciliationError;
use riska_core::reports::ReportError;
use riska_core::ledger::ImportRow;
use riska_shared::types::{
    AccountId, BankAccountId, BudgetId, DateRange, LineId, StatementLineId, TenantId, TransactionId,
};
use riska_store::{AccountFilter, Store, TransactionFilter};
use rust_decimal_macros::dec;

#[test]
fn test_foreign_entities_are_not_found() {
    let store = Store::default();
    let ours = Chart::create(&store);
    let theirs = Chart::create(&store);
    let (txn, _) = post_transfer(&store, ours.tenant, d(2025, 1, 2), ours.checking, ours.equity, dec!(700));

    assert_eq!(
        store.accounts().get(theirs.tenant, ours.checking).unwrap_err(),
        AccountError::AccountNotFound(ours.checking)
    );
    assert_eq!(
        store.transactions().get(theirs.tenant, txn.id).unwrap_err(),
        LedgerError::TransactionNotFound(txn.id)
    );
    assert_eq!(
        store
            .transactions()
            .reverse(theirs.tenant, txn.id, d(2025, 1, 3), None)
            .unwrap_err(),
        LedgerError::TransactionNotFound(txn.id)
    );
    assert_eq!(
        store
            .transactions()
            .create_draft(
                theirs.tenant,
                transfer(d(2025, 1, 2), ours.checking, theirs.equity, dec!(1))
            )
            .unwrap_err(),
        LedgerError::AccountNotFound(ours.checking)
    );
    assert_eq!(
        store
            .reports()
            .account_ledger(
                theirs.tenant,
                ours.checking,
                DateRange::new(d(2025, 1, 1), d(2025, 1, 31)).unwrap()
            )
            .unwrap_err(),
        ReportError::AccountNotFound(ours.checking)
    );
    assert_eq!(
        store
            .reconciliation()
            .create_bank_account(theirs.tenant, "Sneaky", "", ours.checking)
            .unwrap_err(),
        ReconciliationError::AccountNotFound(ours.checking)
    );

    let budget = store.budgets().create(ours.tenant, "Plan", 2025, "").unwrap();
    assert_eq!(
        store.budgets().get(theirs.tenant, budget.id).unwrap_err(),
        BudgetError::NotFound(budget.id)
    );
}

#[test]
fn test_tenants_do_not_share_balances_or_numbers() {
    let store = Store::default();
    let ours = Chart::create(&store);
    let theirs = Chart::create(&store);
    post_transfer(&store, ours.tenant, d(2025, 1, 2), ours.checking, ours.equity, dec!(700));

    assert_eq!(balance(&store, ours.tenant, ours.checking), dec!(700));
    assert_eq!(balance(&store, theirs.tenant, theirs.checking), dec!(0));
    assert_eq!(store.accounts().list(theirs.tenant, AccountFilter::default()).len(), 9);
    assert!(
        store
            .transactions()
            .list(theirs.tenant, TransactionFilter::default())
            .is_empty()
    );

    let trial = store.reports().trial_balance(theirs.tenant, d(2025, 12, 31));
    assert_eq!(trial.totals.total_debit, dec!(0));

    let (first, _) = post_transfer(&store, theirs.tenant, d(2025, 1, 2), theirs.checking, theirs.equity, dec!(1));
    assert!(first.reference.ends_with("-00001"));
}

#[test]
fn test_failed_writes_do_not_register_tenants() {
    let store = Store::default();
    let chart = Chart::create(&store);
    assert_eq!(store.tenant_count(), 1);

    for _ in 0..100 {
        let stranger = TenantId::new();
        let txn = TransactionId::new();
        assert_eq!(
            store.transactions().post(stranger, txn).unwrap_err(),
            LedgerError::TransactionNotFound(txn)
        );
        assert!(store.transactions().replace_lines(stranger, txn, vec![]).is_err());
        assert!(store.transactions().delete_draft(stranger, txn).is_err());
        assert!(store.transactions().reverse(stranger, txn, d(2025, 1, 1), None).is_err());
        assert!(
            store
                .transactions()
                .import(stranger, d(2025, 1, 1), "", &[ImportRow::new("1000", "1", "", "")])
                .is_err()
        );
        assert!(store.accounts().deactivate(stranger, chart.checking).is_err());
        assert!(store.accounts().delete(stranger, chart.checking).is_err());
        assert!(store.accounts().recompute_balance(stranger, AccountId::new()).is_err());
        assert!(store.accounts().recompute_all(stranger).is_empty());
        assert!(
            store
                .budgets()
                .add_item(stranger, BudgetId::new(), chart.sales, dec!(1))
                .is_err()
        );
        let recon = store.reconciliation();
        assert!(recon.create_bank_account(stranger, "Ops", "1", chart.checking).is_err());
        assert!(recon.import_statement(stranger, BankAccountId::new(), vec![]).is_err());
        assert!(recon.import_raw_statement(stranger, BankAccountId::new(), &[]).is_err());
        assert!(recon.propose_match(stranger, StatementLineId::new(), LineId::new()).is_err());
        assert!(recon.unmatch(stranger, StatementLineId::new()).is_err());
    }

    assert_eq!(store.tenant_count(), 1);
}
