//! Consultants view: cached CRUD store.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::client::{ApiClient, ListFilters};
use crate::envelope::Paginated;
use crate::error::ApiError;
use crate::store::cache::QueryCache;
use crate::store::notify::Notifier;
use crate::store::{Resource, ResourceBackend, ResourceStore};
use crate::types::Consultant;

impl Resource for Consultant {
    const ENTITY: &'static str = "consultants";
    const NOUN: &'static str = "Consultant";

    fn id(&self) -> &str {
        &self.id
    }
}

pub struct ConsultantsBackend {
    api: Arc<ApiClient>,
}

#[async_trait]
impl ResourceBackend for ConsultantsBackend {
    type Entity = Consultant;
    type Filters = ListFilters;

    async fn list(&self, filters: &ListFilters) -> Result<Paginated<Consultant>, ApiError> {
        self.api.get_consultants(filters).await
    }

    async fn fetch(&self, id: &str) -> Result<Consultant, ApiError> {
        self.api.get_consultant(id).await
    }

    async fn create(&self, input: Consultant) -> Result<Consultant, ApiError> {
        self.api.create_consultant(&input).await
    }

    async fn update(&self, id: &str, patch: Value) -> Result<Consultant, ApiError> {
        self.api.update_consultant(id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.api.delete_consultant(id).await
    }
}

pub fn consultants_store(
    api: Arc<ApiClient>,
    cache: Arc<QueryCache>,
    notifier: Arc<dyn Notifier>,
) -> ResourceStore<ConsultantsBackend> {
    ResourceStore::new(ConsultantsBackend { api }, cache, notifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::MockGateway;
    use crate::store::notify::BufferNotifier;
    use crate::token_store::MemoryTokenStore;

    #[tokio::test]
    async fn test_availability_slots_roundtrip() {
        let api = Arc::new(ApiClient::new(
            Arc::new(MockGateway::without_latency()),
            Arc::new(MemoryTokenStore::new()),
        ));
        let store = consultants_store(
            api,
            Arc::new(QueryCache::new()),
            Arc::new(BufferNotifier::new()),
        );

        let consultant = store.detail("con-7").await.unwrap();
        assert_eq!(consultant.availability.len(), 2);
        assert_eq!(consultant.availability[0].day, "Mon");
        assert_eq!(consultant.hourly_rate, 3500.0);
    }
}
