//! Notifications view: volatile cached store plus unread rollup.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::client::{ApiClient, ListFilters};
use crate::envelope::Paginated;
use crate::error::ApiError;
use crate::store::cache::{QueryCache, VOLATILE_FRESHNESS};
use crate::store::notify::Notifier;
use crate::store::{Resource, ResourceBackend, ResourceStore};
use crate::types::Notification;

impl Resource for Notification {
    const ENTITY: &'static str = "notifications";
    const NOUN: &'static str = "Notification";

    fn id(&self) -> &str {
        &self.id
    }
}

pub struct NotificationsBackend {
    api: Arc<ApiClient>,
}

#[async_trait]
impl ResourceBackend for NotificationsBackend {
    type Entity = Notification;
    type Filters = ListFilters;

    async fn list(&self, filters: &ListFilters) -> Result<Paginated<Notification>, ApiError> {
        self.api.get_notifications(filters).await
    }

    async fn fetch(&self, id: &str) -> Result<Notification, ApiError> {
        self.api.get_notification(id).await
    }

    async fn create(&self, input: Notification) -> Result<Notification, ApiError> {
        self.api.create_notification(&input).await
    }

    async fn update(&self, id: &str, patch: Value) -> Result<Notification, ApiError> {
        self.api.update_notification(id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.api.delete_notification(id).await
    }
}

/// Notifications move fast; the store uses the short freshness window.
pub fn notifications_store(
    api: Arc<ApiClient>,
    cache: Arc<QueryCache>,
    notifier: Arc<dyn Notifier>,
) -> ResourceStore<NotificationsBackend> {
    ResourceStore::new(NotificationsBackend { api }, cache, notifier)
        .with_freshness(VOLATILE_FRESHNESS)
}

/// Mark one notification read. Routed through the standard update mutation
/// so the cached detail picks up the server's record.
pub async fn mark_read(
    store: &ResourceStore<NotificationsBackend>,
    id: &str,
) -> Result<Notification, ApiError> {
    store.update(id, json!({ "read": true })).await
}

pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.read).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::MockGateway;
    use crate::store::notify::BufferNotifier;
    use crate::token_store::MemoryTokenStore;

    fn setup() -> ResourceStore<NotificationsBackend> {
        let api = Arc::new(ApiClient::new(
            Arc::new(MockGateway::without_latency()),
            Arc::new(MemoryTokenStore::new()),
        ));
        notifications_store(
            api,
            Arc::new(QueryCache::new()),
            Arc::new(BufferNotifier::new()),
        )
    }

    #[tokio::test]
    async fn test_mark_read_drops_unread_count() {
        let store = setup();

        let before = store.list(&ListFilters::default()).await.unwrap();
        assert_eq!(unread_count(&before.data), 2);

        mark_read(&store, "ntf-1").await.unwrap();
        mark_read(&store, "ntf-2").await.unwrap();

        let after = store.list(&ListFilters::default()).await.unwrap();
        assert_eq!(unread_count(&after.data), 0);
    }

    #[tokio::test]
    async fn test_dismiss_notification() {
        let store = setup();
        store.delete("ntf-3").await.unwrap();
        let page = store.list(&ListFilters::default()).await.unwrap();
        assert_eq!(page.total, 3);
        assert!(!page.data.iter().any(|n| n.id == "ntf-3"));
    }
}
