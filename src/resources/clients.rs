//! Client onboarding view: cached CRUD store plus status stats.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::client::{ApiClient, ListFilters};
use crate::envelope::Paginated;
use crate::error::ApiError;
use crate::store::cache::QueryCache;
use crate::store::notify::Notifier;
use crate::store::{Resource, ResourceBackend, ResourceStore};
use crate::types::{Client, ClientStatus};

impl Resource for Client {
    const ENTITY: &'static str = "clients";
    const NOUN: &'static str = "Client";

    fn id(&self) -> &str {
        &self.id
    }
}

pub struct ClientsBackend {
    api: Arc<ApiClient>,
}

#[async_trait]
impl ResourceBackend for ClientsBackend {
    type Entity = Client;
    type Filters = ListFilters;

    async fn list(&self, filters: &ListFilters) -> Result<Paginated<Client>, ApiError> {
        self.api.get_clients(filters).await
    }

    async fn fetch(&self, id: &str) -> Result<Client, ApiError> {
        self.api.get_client(id).await
    }

    async fn create(&self, input: Client) -> Result<Client, ApiError> {
        self.api.create_client(&input).await
    }

    async fn update(&self, id: &str, patch: Value) -> Result<Client, ApiError> {
        self.api.update_client(id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.api.delete_client(id).await
    }
}

pub fn clients_store(
    api: Arc<ApiClient>,
    cache: Arc<QueryCache>,
    notifier: Arc<dyn Notifier>,
) -> ResourceStore<ClientsBackend> {
    ResourceStore::new(ClientsBackend { api }, cache, notifier)
}

/// Counts by lifecycle status, derived from already-fetched list data.
/// Recompute whenever the list data changes; no network request involved.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClientStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}

pub fn client_stats(clients: &[Client]) -> ClientStats {
    let active = clients
        .iter()
        .filter(|c| c.status == ClientStatus::Active)
        .count();
    ClientStats {
        total: clients.len(),
        active,
        inactive: clients.len() - active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::MockGateway;
    use crate::store::notify::BufferNotifier;
    use crate::token_store::MemoryTokenStore;

    fn setup() -> (ResourceStore<ClientsBackend>, Arc<BufferNotifier>) {
        let api = Arc::new(ApiClient::new(
            Arc::new(MockGateway::without_latency()),
            Arc::new(MemoryTokenStore::new()),
        ));
        let notifier = Arc::new(BufferNotifier::new());
        let store = clients_store(api, Arc::new(QueryCache::new()), notifier.clone());
        (store, notifier)
    }

    fn draft(name: &str, contact: &str) -> Client {
        Client {
            id: String::new(),
            client_name: name.into(),
            client_contact: contact.into(),
            client_email: String::new(),
            address: String::new(),
            gst: String::new(),
            pan: String::new(),
            status: ClientStatus::Active,
            entry_date: "2026-08-06".into(),
        }
    }

    #[tokio::test]
    async fn test_create_then_list_grows_by_one() {
        let (store, notifier) = setup();

        let before = store.list(&ListFilters::default()).await.unwrap();
        let created = store.create(draft("Acme", "9876543210")).await.unwrap();
        assert!(!created.id.is_empty());

        let after = store.list(&ListFilters::default()).await.unwrap();
        assert_eq!(after.data.len(), before.data.len() + 1);

        let acme = after.data.iter().find(|c| c.id == created.id).unwrap();
        assert_eq!(acme.status, ClientStatus::Active);
        assert_eq!(acme.client_name, "Acme");
        assert_eq!(notifier.successes(), vec!["Client created"]);
    }

    #[tokio::test]
    async fn test_detail_uses_cache_and_update_replaces_it() {
        let (store, _) = setup();

        let fetched = store.detail("cl-1001").await.unwrap();
        assert_eq!(fetched.client_name, "Sharma Textiles");

        let updated = store
            .update("cl-1001", serde_json::json!({"status": "inactive"}))
            .await
            .unwrap();
        assert_eq!(updated.status, ClientStatus::Inactive);

        // next detail read sees the server-returned object
        let again = store.detail("cl-1001").await.unwrap();
        assert_eq!(again.status, ClientStatus::Inactive);
    }

    #[tokio::test]
    async fn test_delete_removes_from_next_list() {
        let (store, _) = setup();

        store.delete("cl-1003").await.unwrap();
        let page = store.list(&ListFilters::default()).await.unwrap();
        assert!(!page.data.iter().any(|c| c.id == "cl-1003"));
        assert!(store.detail("cl-1003").await.is_err());
    }

    #[test]
    fn test_client_stats_counts_by_status() {
        let mut clients = vec![draft("A", "9000000001"), draft("B", "9000000002")];
        clients[1].status = ClientStatus::Inactive;
        let stats = client_stats(&clients);
        assert_eq!(
            stats,
            ClientStats {
                total: 2,
                active: 1,
                inactive: 1
            }
        );
    }
}
