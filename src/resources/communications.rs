//! Communications view: channels and message templates.
//!
//! Both are slow-moving reference data, so their stores use the stretched
//! freshness window.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::client::{ApiClient, ListFilters};
use crate::envelope::Paginated;
use crate::error::ApiError;
use crate::store::cache::{QueryCache, REFERENCE_FRESHNESS};
use crate::store::notify::Notifier;
use crate::store::{Resource, ResourceBackend, ResourceStore};
use crate::types::{CommunicationChannel, Template};

impl Resource for CommunicationChannel {
    const ENTITY: &'static str = "channels";
    const NOUN: &'static str = "Channel";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for Template {
    const ENTITY: &'static str = "templates";
    const NOUN: &'static str = "Template";

    fn id(&self) -> &str {
        &self.id
    }
}

pub struct ChannelsBackend {
    api: Arc<ApiClient>,
}

#[async_trait]
impl ResourceBackend for ChannelsBackend {
    type Entity = CommunicationChannel;
    type Filters = ListFilters;

    async fn list(&self, filters: &ListFilters) -> Result<Paginated<CommunicationChannel>, ApiError> {
        self.api.get_channels(filters).await
    }

    async fn fetch(&self, id: &str) -> Result<CommunicationChannel, ApiError> {
        self.api.get_channel(id).await
    }

    async fn create(&self, input: CommunicationChannel) -> Result<CommunicationChannel, ApiError> {
        self.api.create_channel(&input).await
    }

    async fn update(&self, id: &str, patch: Value) -> Result<CommunicationChannel, ApiError> {
        self.api.update_channel(id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.api.delete_channel(id).await
    }
}

pub struct TemplatesBackend {
    api: Arc<ApiClient>,
}

#[async_trait]
impl ResourceBackend for TemplatesBackend {
    type Entity = Template;
    type Filters = ListFilters;

    async fn list(&self, filters: &ListFilters) -> Result<Paginated<Template>, ApiError> {
        self.api.get_templates(filters).await
    }

    async fn fetch(&self, id: &str) -> Result<Template, ApiError> {
        self.api.get_template(id).await
    }

    async fn create(&self, input: Template) -> Result<Template, ApiError> {
        self.api.create_template(&input).await
    }

    async fn update(&self, id: &str, patch: Value) -> Result<Template, ApiError> {
        self.api.update_template(id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.api.delete_template(id).await
    }
}

pub fn channels_store(
    api: Arc<ApiClient>,
    cache: Arc<QueryCache>,
    notifier: Arc<dyn Notifier>,
) -> ResourceStore<ChannelsBackend> {
    ResourceStore::new(ChannelsBackend { api }, cache, notifier)
        .with_freshness(REFERENCE_FRESHNESS)
}

pub fn templates_store(
    api: Arc<ApiClient>,
    cache: Arc<QueryCache>,
    notifier: Arc<dyn Notifier>,
) -> ResourceStore<TemplatesBackend> {
    ResourceStore::new(TemplatesBackend { api }, cache, notifier)
        .with_freshness(REFERENCE_FRESHNESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::MockGateway;
    use crate::store::notify::BufferNotifier;
    use crate::token_store::MemoryTokenStore;

    fn api() -> Arc<ApiClient> {
        Arc::new(ApiClient::new(
            Arc::new(MockGateway::without_latency()),
            Arc::new(MemoryTokenStore::new()),
        ))
    }

    #[tokio::test]
    async fn test_toggle_channel() {
        let store = channels_store(
            api(),
            Arc::new(QueryCache::new()),
            Arc::new(BufferNotifier::new()),
        );

        let updated = store
            .update("ch-2", serde_json::json!({"enabled": true}))
            .await
            .unwrap();
        assert!(updated.enabled);
        assert_eq!(updated.channel_type, "sms");
    }

    #[tokio::test]
    async fn test_template_variables_roundtrip() {
        let store = templates_store(
            api(),
            Arc::new(QueryCache::new()),
            Arc::new(BufferNotifier::new()),
        );

        let template = store.detail("tpl-1").await.unwrap();
        assert_eq!(
            template.variables,
            vec!["clientName", "orderNumber", "balanceAmount"]
        );
    }
}
