//! Shared fixtures for store integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use riska_core::ledger::{LineInput, NewTransaction, PostingReceipt, Transaction};
use riska_shared::types::{AccountId, TenantId};
use riska_store::{CreateAccountInput, Store};
use rust_decimal::Decimal;

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// A small chart of accounts for one tenant.
pub struct Chart {
    pub tenant: TenantId,
    pub checking: AccountId,
    pub receivable: AccountId,
    pub payable: AccountId,
    pub equity: AccountId,
    pub sales: AccountId,
    pub cogs: AccountId,
    pub supplies: AccountId,
    pub interest: AccountId,
    pub bank_fees: AccountId,
}

impl Chart {
    pub fn create(store: &Store) -> Self {
        let tenant = TenantId::new();
        let accounts = store.accounts();
        let open = |number: &str, name: &str, class: &str| {
            accounts
                .create(tenant, CreateAccountInput::new(number, name, class))
                .unwrap()
                .id
        };

        Self {
            tenant,
            checking: open("1000", "Checking", "Bank"),
            receivable: open("1200", "Accounts Receivable", "Accounts Receivable (A/R)"),
            payable: open("2000", "Accounts Payable", "Accounts Payable (A/P)"),
            equity: open("3000", "Owner's Equity", "Equity"),
            sales: open("4000", "Sales", "Income"),
            cogs: open("5000", "Cost of Goods Sold", "Cost of Goods Sold"),
            supplies: open("6100", "Office Supplies", "Expenses"),
            interest: open("7000", "Interest Income", "Other Income"),
            bank_fees: open("8000", "Bank Fees", "Other Expense"),
        }
    }
}

pub fn transfer(date: NaiveDate, debit: AccountId, credit: AccountId, amount: Decimal) -> NewTransaction {
    NewTransaction::new(
        date,
        "transfer",
        vec![
            LineInput::debit(debit, amount, ""),
            LineInput::credit(credit, amount, ""),
        ],
    )
}

/// Creates and posts a two-line transaction.
pub fn post_transfer(
    store: &Store,
    tenant: TenantId,
    date: NaiveDate,
    debit: AccountId,
    credit: AccountId,
    amount: Decimal,
) -> (Transaction, PostingReceipt) {
    let txns = store.transactions();
    let draft = txns.create_draft(tenant, transfer(date, debit, credit, amount)).unwrap();
    let receipt = txns.post(tenant, draft.id).unwrap();
    (txns.get(tenant, draft.id).unwrap(), receipt)
}

pub fn balance(store: &Store, tenant: TenantId, account: AccountId) -> Decimal {
    store.accounts().get(tenant, account).unwrap().balance()
}
