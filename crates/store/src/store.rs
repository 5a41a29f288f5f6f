//! The shared store handle.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use riska_shared::LedgerConfig;
use riska_shared::types::TenantId;

use crate::book::Book;
use crate::repositories::{
    AccountRepository, BudgetRepository, ReconciliationRepository, ReportRepository,
    TransactionRepository,
};

/// Cheaply cloneable handle to every tenant's book.
///
/// Tenants never share a lock. Within a tenant, mutations take the book's
/// write lock for their whole check-then-apply sequence, so a reader sees a
/// transaction either fully posted with every balance applied, or not at all.
#[derive(Debug, Clone, Default)]
pub struct Store {
    inner: Arc<StoreInner>,
}

#[derive(Debug, Default)]
struct StoreInner {
    books: DashMap<TenantId, Arc<RwLock<Book>>>,
    config: LedgerConfig,
}

impl Store {
    /// Creates an empty store.
    #[must_use]
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                books: DashMap::new(),
                config,
            }),
        }
    }

    /// Ledger configuration.
    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.inner.config
    }

    /// Number of tenants with a book.
    #[must_use]
    pub fn tenant_count(&self) -> usize {
        self.inner.books.len()
    }

    /// Account repository over this store.
    #[must_use]
    pub fn accounts(&self) -> AccountRepository {
        AccountRepository::new(self.clone())
    }

    /// Transaction repository over this store.
    #[must_use]
    pub fn transactions(&self) -> TransactionRepository {
        TransactionRepository::new(self.clone())
    }

    /// Report repository over this store.
    #[must_use]
    pub fn reports(&self) -> ReportRepository {
        ReportRepository::new(self.clone())
    }

    /// Budget repository over this store.
    #[must_use]
    pub fn budgets(&self) -> BudgetRepository {
        BudgetRepository::new(self.clone())
    }

    /// Reconciliation repository over this store.
    #[must_use]
    pub fn reconciliation(&self) -> ReconciliationRepository {
        ReconciliationRepository::new(self.clone())
    }

    /// Runs `f` under the tenant's read lock.
    ///
    /// A tenant without a book reads as an empty one.
    pub(crate) fn read<R>(&self, tenant_id: TenantId, f: impl FnOnce(&Book) -> R) -> R {
        // Clone the Arc out so the map shard is released before locking the book.
        let book = self
            .inner
            .books
            .get(&tenant_id)
            .map(|entry| Arc::clone(entry.value()));
        match book {
            Some(book) => f(&book.read()),
            None => f(&Book::default()),
        }
    }

    /// Runs `f` under the tenant's write lock without creating a book.
    ///
    /// A tenant without a book runs `f` against a throwaway empty one, so
    /// operations that need existing entities fail with their usual not-found
    /// error and the tenant map does not grow.
    pub(crate) fn write_existing<R>(&self, tenant_id: TenantId, f: impl FnOnce(&mut Book) -> R) -> R {
        let book = self
            .inner
            .books
            .get(&tenant_id)
            .map(|entry| Arc::clone(entry.value()));
        match book {
            Some(book) => f(&mut book.write()),
            None => f(&mut Book::default()),
        }
    }

    /// Runs `f` under the tenant's write lock, creating the book if needed.
    ///
    /// Reserved for operations that can succeed on an empty book.
    pub(crate) fn write<R>(&self, tenant_id: TenantId, f: impl FnOnce(&mut Book) -> R) -> R {
        let book = Arc::clone(self.inner.books.entry(tenant_id).or_default().value());
        let mut guard = book.write();
        f(&mut guard)
    }
}
