//! Demo seeder for Riska development and testing.
//!
//! Seeds one tenant with a chart of accounts, a quarter of posted activity,
//! a budget and a bank statement, then prints every report as JSON.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::NaiveDate;
use riska_core::accounts::AccountClass;
use riska_core::ledger::{ImportRow, LineInput, NewTransaction};
use riska_core::reconciliation::RawStatementRow;
use riska_core::reports::AccountSelection;
use riska_shared::types::{AccountId, DateRange, TenantId};
use riska_shared::{AppConfig, LoggingConfig};
use riska_store::{CreateAccountInput, Store};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// Demo tenant ID (consistent for all seeds)
const DEMO_TENANT_ID: Uuid = Uuid::from_u128(1);

/// Demo chart: number, name, classification label.
const CHART: [(&str, &str, &str); 10] = [
    ("1000", "Checking", "Bank"),
    ("1200", "Accounts Receivable", "Accounts Receivable (A/R)"),
    ("1500", "Equipment", "Fixed Assets"),
    ("2000", "Accounts Payable", "Accounts Payable (A/P)"),
    ("3000", "Owner's Equity", "Equity"),
    ("4000", "Consulting Revenue", "Income"),
    ("5000", "Subcontractors", "Cost of Goods Sold"),
    ("6100", "Office Supplies", "Expenses"),
    ("6200", "Rent", "Expenses"),
    ("7000", "Interest Income", "Other Income"),
];

fn main() -> anyhow::Result<()> {
    let config = AppConfig::load_with_dotenv().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    let store = Store::new(config.ledger.clone());
    let tenant = TenantId::from_uuid(DEMO_TENANT_ID);

    info!(tenant_id = %tenant, "Seeding chart of accounts");
    for (number, name, class) in CHART {
        store
            .accounts()
            .create(tenant, CreateAccountInput::new(number, name, class))?;
    }

    info!(tenant_id = %tenant, "Seeding transactions");
    seed_transactions(&store, tenant)?;

    info!(tenant_id = %tenant, "Seeding budget");
    seed_budget(&store, tenant)?;

    info!(tenant_id = %tenant, "Seeding bank statement");
    seed_reconciliation(&store, tenant)?;

    print_reports(&store, tenant)?;
    info!("Seeding complete!");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.filter.clone().into());
    let registry = tracing_subscriber::registry().with(filter);

    // Reports go to stdout, so logs go to stderr.
    if logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn date(y: i32, m: u32, d: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d).with_context(|| format!("invalid date {y}-{m}-{d}"))
}

fn account(store: &Store, tenant: TenantId, number: &str) -> anyhow::Result<AccountId> {
    store
        .accounts()
        .find_by_number(tenant, number)
        .map(|a| a.id)
        .with_context(|| format!("account {number} not seeded"))
}

fn post(
    store: &Store,
    tenant: TenantId,
    date: NaiveDate,
    memo: &str,
    debit: &str,
    credit: &str,
    amount: Decimal,
) -> anyhow::Result<()> {
    let lines = vec![
        LineInput::debit(account(store, tenant, debit)?, amount, ""),
        LineInput::credit(account(store, tenant, credit)?, amount, ""),
    ];
    let txns = store.transactions();
    let draft = txns.create_draft(tenant, NewTransaction::new(date, memo, lines))?;
    txns.post(tenant, draft.id)?;
    Ok(())
}

fn seed_transactions(store: &Store, tenant: TenantId) -> anyhow::Result<()> {
    post(store, tenant, date(2025, 1, 2)?, "Owner investment", "1000", "3000", dec!(25000))?;
    post(store, tenant, date(2025, 1, 6)?, "Laptop", "1500", "1000", dec!(2400))?;
    post(store, tenant, date(2025, 1, 31)?, "January rent", "6200", "1000", dec!(1500))?;
    post(store, tenant, date(2025, 2, 14)?, "Invoice 1001", "1200", "4000", dec!(8000))?;
    post(store, tenant, date(2025, 2, 20)?, "Printer paper", "6100", "1000", dec!(250))?;
    post(store, tenant, date(2025, 2, 28)?, "February rent", "6200", "1000", dec!(1500))?;
    post(store, tenant, date(2025, 3, 10)?, "Invoice 1001 paid", "1000", "1200", dec!(8000))?;
    post(store, tenant, date(2025, 3, 31)?, "Interest", "1000", "7000", dec!(12.40))?;

    let txns = store.transactions();
    let subcontract = txns.import(
        tenant,
        date(2025, 3, 15)?,
        "Subcontractor bill",
        &[
            ImportRow::new("5000", "3200.00", "", "March design work"),
            ImportRow::new("2000", "", "3200.00", ""),
        ],
    )?;
    txns.post(tenant, subcontract.id)?;

    let rent = txns
        .search(tenant, "february rent")
        .into_iter()
        .next()
        .context("February rent not found")?;
    txns.reverse(tenant, rent.id, date(2025, 3, 1)?, Some("Rent waived".to_string()))?;
    Ok(())
}

fn seed_budget(store: &Store, tenant: TenantId) -> anyhow::Result<()> {
    let budgets = store.budgets();
    let budget = budgets.create(tenant, "2025 Operating Plan", 2025, "Demo budget")?;
    for (number, monthly) in [("4000", dec!(3000)), ("6100", dec!(100)), ("6200", dec!(1500))] {
        budgets.add_item(tenant, budget.id, account(store, tenant, number)?, monthly)?;
    }
    Ok(())
}

fn seed_reconciliation(store: &Store, tenant: TenantId) -> anyhow::Result<()> {
    let recon = store.reconciliation();
    let bank = recon.create_bank_account(tenant, "Operating", "****4321", account(store, tenant, "1000")?)?;
    let summary = recon.import_raw_statement(
        tenant,
        bank.id,
        &[
            RawStatementRow::new("01/02/2025", "DEPOSIT", "$25,000.00"),
            RawStatementRow::new("01/07/2025", "ELECTRONICS STORE", "(2,400.00)"),
            RawStatementRow::new("02/21/2025", "OFFICE DEPOT", "(250.00)"),
            RawStatementRow::new("03/31/2025", "SERVICE FEE", "(4.00)"),
            RawStatementRow::new("pending", "HOLD", "10.00"),
        ],
    )?;

    let view = recon.view(tenant, bank.id, None)?;
    for statement in &view.unmatched_statement {
        let candidate = view
            .unmatched_ledger
            .iter()
            .find(|line| line.net_amount == statement.amount);
        if let Some(line) = candidate {
            recon.propose_match(tenant, statement.id, line.line_id)?;
        }
    }
    info!(
        imported = summary.imported.len(),
        skipped = summary.skipped.len(),
        "Statement reconciled"
    );
    Ok(())
}

fn print_reports(store: &Store, tenant: TenantId) -> anyhow::Result<()> {
    let reports = store.reports();
    let quarter = DateRange::new(date(2025, 1, 1)?, date(2025, 3, 31)?)?;
    let checking = account(store, tenant, "1000")?;
    let bank = store
        .reconciliation()
        .list_bank_accounts(tenant)
        .into_iter()
        .next()
        .context("bank account not seeded")?;

    let output = serde_json::json!({
        "trial_balance": reports.trial_balance(tenant, quarter.end()),
        "income_statement": reports.income_statement(tenant, quarter),
        "balance_sheet": reports.balance_sheet(tenant, quarter.end()),
        "account_ledger": reports.account_ledger(tenant, checking, quarter)?,
        "expense_ledgers": reports.custom_ledger(
            tenant,
            quarter,
            &AccountSelection::classes([AccountClass::Expenses, AccountClass::CostOfGoodsSold]),
        ),
        "budget_variance": store.budgets().variance_latest(tenant)?,
        "reconciliation": store.reconciliation().view(tenant, bank.id, Some(quarter))?,
        "balance_drift": store.accounts().verify_balances(tenant),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
