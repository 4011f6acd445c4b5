//! Analytics view: cached monthly revenue/conversion series.

use std::sync::Arc;

use serde_json::json;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::store::cache::{CacheKey, QueryCache, DEFAULT_FRESHNESS};
use crate::types::AnalyticsSummary;

pub struct AnalyticsStore {
    api: Arc<ApiClient>,
    cache: Arc<QueryCache>,
}

impl AnalyticsStore {
    pub fn new(api: Arc<ApiClient>, cache: Arc<QueryCache>) -> Self {
        AnalyticsStore { api, cache }
    }

    pub async fn summary(&self) -> Result<AnalyticsSummary, ApiError> {
        let key = CacheKey::list("analytics", &json!({}));
        if let Some(cached) = self.cache.get_fresh(&key) {
            if let Ok(summary) = serde_json::from_value(cached) {
                return Ok(summary);
            }
        }

        let summary = self.api.get_analytics_summary().await?;
        if let Ok(value) = serde_json::to_value(&summary) {
            self.cache.put(key, value, DEFAULT_FRESHNESS);
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::MockGateway;
    use crate::token_store::MemoryTokenStore;

    #[tokio::test]
    async fn test_monthly_series_is_chronological() {
        let api = Arc::new(ApiClient::new(
            Arc::new(MockGateway::without_latency()),
            Arc::new(MemoryTokenStore::new()),
        ));
        let store = AnalyticsStore::new(api, Arc::new(QueryCache::new()));

        let summary = store.summary().await.unwrap();
        assert_eq!(summary.monthly.len(), 4); // Jan..Apr fixture orders
        let months: Vec<&str> = summary.monthly.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, vec!["2026-01", "2026-02", "2026-03", "2026-04"]);
        assert!(summary.average_order_value > 0.0);
    }
}
