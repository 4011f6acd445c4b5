//! Dashboard landing view: cached summary aggregate.

use std::sync::Arc;

use serde_json::json;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::store::cache::{CacheKey, QueryCache, VOLATILE_FRESHNESS};
use crate::types::DashboardSummary;

pub struct DashboardStore {
    api: Arc<ApiClient>,
    cache: Arc<QueryCache>,
}

impl DashboardStore {
    pub fn new(api: Arc<ApiClient>, cache: Arc<QueryCache>) -> Self {
        DashboardStore { api, cache }
    }

    /// The landing aggregate, fresh for under a minute.
    pub async fn summary(&self) -> Result<DashboardSummary, ApiError> {
        let key = CacheKey::list("dashboard", &json!({}));
        if let Some(cached) = self.cache.get_fresh(&key) {
            if let Ok(summary) = serde_json::from_value(cached) {
                return Ok(summary);
            }
        }

        let summary = self.api.get_dashboard_summary().await?;
        if let Ok(value) = serde_json::to_value(&summary) {
            self.cache.put(key, value, VOLATILE_FRESHNESS);
        }
        Ok(summary)
    }

    /// Drop the cached aggregate so the next read refetches.
    pub fn refresh(&self) {
        self.cache.invalidate_entity("dashboard");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::MockGateway;
    use crate::token_store::MemoryTokenStore;

    #[tokio::test]
    async fn test_summary_counts_fixtures() {
        let api = Arc::new(ApiClient::new(
            Arc::new(MockGateway::without_latency()),
            Arc::new(MemoryTokenStore::new()),
        ));
        let store = DashboardStore::new(api, Arc::new(QueryCache::new()));

        let summary = store.summary().await.unwrap();
        assert_eq!(summary.total_clients, 4);
        assert_eq!(summary.active_clients, 3);
        assert_eq!(summary.total_orders, 5);
        assert_eq!(summary.open_leads, 3);
        assert_eq!(summary.unread_notifications, 2);
        assert!((summary.outstanding_balance - 135200.0).abs() < 1e-6);
    }
}
