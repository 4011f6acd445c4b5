//! Security/compliance view: read-only audit trail.
//!
//! Audit events are written server-side; this layer only lists and inspects
//! them, so the module carries a slim cached reader instead of the full
//! CRUD store.

use std::sync::Arc;

use crate::client::{ApiClient, ListFilters};
use crate::envelope::Paginated;
use crate::error::ApiError;
use crate::store::cache::{CacheKey, QueryCache, DEFAULT_FRESHNESS};
use crate::types::{AuditEvent, AuditSeverity};

pub struct SecurityStore {
    api: Arc<ApiClient>,
    cache: Arc<QueryCache>,
}

impl SecurityStore {
    pub fn new(api: Arc<ApiClient>, cache: Arc<QueryCache>) -> Self {
        SecurityStore { api, cache }
    }

    pub async fn events(&self, filters: &ListFilters) -> Result<Paginated<AuditEvent>, ApiError> {
        let key = CacheKey::list("audit_events", filters);
        if let Some(cached) = self.cache.get_fresh(&key) {
            if let Ok(page) = serde_json::from_value(cached) {
                return Ok(page);
            }
        }

        let page = self.api.get_audit_events(filters).await?;
        if let Ok(value) = serde_json::to_value(&page) {
            self.cache.put(key, value, DEFAULT_FRESHNESS);
        }
        Ok(page)
    }

    pub async fn event(&self, id: &str) -> Result<AuditEvent, ApiError> {
        if id.trim().is_empty() {
            return Err(ApiError::MissingId);
        }

        let key = CacheKey::detail("audit_events", id);
        if let Some(cached) = self.cache.get_fresh(&key) {
            if let Ok(event) = serde_json::from_value(cached) {
                return Ok(event);
            }
        }

        let event = self.api.get_audit_event(id).await?;
        if let Ok(value) = serde_json::to_value(&event) {
            self.cache.put(key, value, DEFAULT_FRESHNESS);
        }
        Ok(event)
    }
}

/// Count events at warning severity or above.
pub fn alert_count(events: &[AuditEvent]) -> usize {
    events
        .iter()
        .filter(|e| e.severity != AuditSeverity::Info)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::MockGateway;
    use crate::token_store::MemoryTokenStore;

    fn setup() -> SecurityStore {
        let api = Arc::new(ApiClient::new(
            Arc::new(MockGateway::without_latency()),
            Arc::new(MemoryTokenStore::new()),
        ));
        SecurityStore::new(api, Arc::new(QueryCache::new()))
    }

    #[tokio::test]
    async fn test_events_list_and_alert_rollup() {
        let store = setup();
        let page = store.events(&ListFilters::default()).await.unwrap();
        assert_eq!(page.total, 4);
        assert_eq!(alert_count(&page.data), 2);
    }

    #[tokio::test]
    async fn test_event_detail() {
        let store = setup();
        let event = store.event("aud-3").await.unwrap();
        assert_eq!(event.action, "login.failed");
        assert_eq!(event.severity, AuditSeverity::Warning);

        assert!(matches!(
            store.event("").await.unwrap_err(),
            ApiError::MissingId
        ));
    }
}
