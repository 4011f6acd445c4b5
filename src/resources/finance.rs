//! Finance view: transaction ledger store plus income/expense rollups.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::client::{ApiClient, ListFilters};
use crate::envelope::Paginated;
use crate::error::ApiError;
use crate::store::cache::{CacheKey, QueryCache, DEFAULT_FRESHNESS};
use crate::store::notify::Notifier;
use crate::store::{Resource, ResourceBackend, ResourceStore};
use crate::types::{FinanceSummary, Transaction, TransactionType};

impl Resource for Transaction {
    const ENTITY: &'static str = "transactions";
    const NOUN: &'static str = "Transaction";

    fn id(&self) -> &str {
        &self.id
    }
}

pub struct TransactionsBackend {
    api: Arc<ApiClient>,
}

#[async_trait]
impl ResourceBackend for TransactionsBackend {
    type Entity = Transaction;
    type Filters = ListFilters;

    async fn list(&self, filters: &ListFilters) -> Result<Paginated<Transaction>, ApiError> {
        self.api.get_transactions(filters).await
    }

    async fn fetch(&self, id: &str) -> Result<Transaction, ApiError> {
        self.api.get_transaction(id).await
    }

    async fn create(&self, input: Transaction) -> Result<Transaction, ApiError> {
        self.api.create_transaction(&input).await
    }

    async fn update(&self, id: &str, patch: Value) -> Result<Transaction, ApiError> {
        self.api.update_transaction(id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.api.delete_transaction(id).await
    }
}

pub fn transactions_store(
    api: Arc<ApiClient>,
    cache: Arc<QueryCache>,
    notifier: Arc<dyn Notifier>,
) -> ResourceStore<TransactionsBackend> {
    ResourceStore::new(TransactionsBackend { api }, cache, notifier)
}

/// Cached finance aggregate (server-computed).
pub struct FinanceStore {
    api: Arc<ApiClient>,
    cache: Arc<QueryCache>,
}

impl FinanceStore {
    pub fn new(api: Arc<ApiClient>, cache: Arc<QueryCache>) -> Self {
        FinanceStore { api, cache }
    }

    pub async fn summary(&self) -> Result<FinanceSummary, ApiError> {
        let key = CacheKey::list("finance", &json!({}));
        if let Some(cached) = self.cache.get_fresh(&key) {
            if let Ok(summary) = serde_json::from_value(cached) {
                return Ok(summary);
            }
        }

        let summary = self.api.get_finance_summary().await?;
        if let Ok(value) = serde_json::to_value(&summary) {
            self.cache.put(key, value, DEFAULT_FRESHNESS);
        }
        Ok(summary)
    }
}

/// Income/expense rollup over fetched ledger data. Pure derivation; the
/// server-side summary is authoritative for the dashboard tiles.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LedgerTotals {
    pub income: f64,
    pub expense: f64,
    pub net: f64,
}

pub fn ledger_totals(transactions: &[Transaction]) -> LedgerTotals {
    let mut totals = LedgerTotals::default();
    for transaction in transactions {
        match transaction.transaction_type {
            TransactionType::Income => totals.income += transaction.amount,
            TransactionType::Expense => totals.expense += transaction.amount,
        }
    }
    totals.net = totals.income - totals.expense;
    totals
}
