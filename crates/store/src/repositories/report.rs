//! Report repository.
//!
//! Each report takes a snapshot under the tenant's read lock and aggregates
//! outside it. Only posted transactions are ever visible to a report.

use chrono::NaiveDate;
use riska_core::reports::{
    AccountLedgerReport, AccountSelection, BalanceSheetReport, CustomLedgerReport,
    IncomeStatementReport, LedgerSnapshot, ReportError, ReportService, TrialBalanceReport,
};
use riska_shared::types::{AccountId, DateRange, TenantId};
use tracing::debug;

use crate::store::Store;

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    store: Store,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// A consistent read-only view of the tenant's posted ledger.
    #[must_use]
    pub fn snapshot(&self, tenant_id: TenantId) -> LedgerSnapshot {
        let currency = self.store.config().currency.clone();
        self.store
            .read(tenant_id, |book| book.snapshot(&currency))
    }

    /// Trial balance as of a date.
    #[must_use]
    pub fn trial_balance(&self, tenant_id: TenantId, as_of: NaiveDate) -> TrialBalanceReport {
        let report = ReportService::trial_balance(&self.snapshot(tenant_id), as_of);
        debug!(tenant_id = %tenant_id, %as_of, rows = report.rows.len(), "Trial balance generated");
        report
    }

    /// Income statement over an inclusive window.
    #[must_use]
    pub fn income_statement(&self, tenant_id: TenantId, period: DateRange) -> IncomeStatementReport {
        let report = ReportService::income_statement(&self.snapshot(tenant_id), period);
        debug!(
            tenant_id = %tenant_id,
            start = %period.start(),
            end = %period.end(),
            net_income = %report.net_income,
            "Income statement generated"
        );
        report
    }

    /// Balance sheet as of a date.
    #[must_use]
    pub fn balance_sheet(&self, tenant_id: TenantId, as_of: NaiveDate) -> BalanceSheetReport {
        let report = ReportService::balance_sheet(&self.snapshot(tenant_id), as_of);
        debug!(
            tenant_id = %tenant_id,
            %as_of,
            is_balanced = report.is_balanced,
            "Balance sheet generated"
        );
        report
    }

    /// Chronological ledger of one account over an inclusive window.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the tenant has no such account.
    pub fn account_ledger(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
        period: DateRange,
    ) -> Result<AccountLedgerReport, ReportError> {
        let report = ReportService::account_ledger(&self.snapshot(tenant_id), account_id, period)?;
        debug!(
            tenant_id = %tenant_id,
            account_id = %account_id,
            entries = report.entries.len(),
            "Account ledger generated"
        );
        Ok(report)
    }

    /// Running-balance ledgers for a selection of accounts.
    #[must_use]
    pub fn custom_ledger(
        &self,
        tenant_id: TenantId,
        period: DateRange,
        selection: &AccountSelection,
    ) -> CustomLedgerReport {
        let report = ReportService::custom_ledger(&self.snapshot(tenant_id), period, selection);
        debug!(
            tenant_id = %tenant_id,
            accounts = report.accounts.len(),
            "Custom ledger generated"
        );
        report
    }
}
