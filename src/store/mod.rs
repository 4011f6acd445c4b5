//! Cached resource stores.
//!
//! One generic [`ResourceStore`] replaces the original's twelve duplicated
//! per-entity hook modules: given a backend (the per-entity function set)
//! it provides the five standard operations with a uniform caching,
//! invalidation, and notification contract.

pub mod cache;
pub mod notify;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::envelope::Paginated;
use crate::error::ApiError;
use cache::{CacheKey, QueryCache, DEFAULT_FRESHNESS};
use notify::Notifier;

/// A cacheable entity: names its cache namespace and exposes its identity.
pub trait Resource: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Cache-key namespace, e.g. `"clients"`.
    const ENTITY: &'static str;
    /// Display noun for notifications, e.g. `"Client"`.
    const NOUN: &'static str;

    fn id(&self) -> &str;
}

/// The per-entity function set handed to the store factory.
#[async_trait]
pub trait ResourceBackend: Send + Sync {
    type Entity: Resource;
    type Filters: Serialize + Send + Sync;

    async fn list(&self, filters: &Self::Filters) -> Result<Paginated<Self::Entity>, ApiError>;

    async fn fetch(&self, id: &str) -> Result<Self::Entity, ApiError>;

    async fn create(&self, input: Self::Entity) -> Result<Self::Entity, ApiError>;

    async fn update(&self, id: &str, patch: Value) -> Result<Self::Entity, ApiError>;

    async fn delete(&self, id: &str) -> Result<(), ApiError>;
}

/// The standard list/detail/create/update/delete surface over one entity.
///
/// Query failures surface only as `Err` (components render them inline);
/// mutation outcomes additionally produce exactly one notification each.
/// Failed mutations leave the cache exactly as it was; nothing is applied
/// optimistically, so there is nothing to roll back.
pub struct ResourceStore<B: ResourceBackend> {
    backend: B,
    cache: Arc<QueryCache>,
    notifier: Arc<dyn Notifier>,
    fresh_for: Duration,
}

impl<B: ResourceBackend> ResourceStore<B> {
    pub fn new(backend: B, cache: Arc<QueryCache>, notifier: Arc<dyn Notifier>) -> Self {
        ResourceStore {
            backend,
            cache,
            notifier,
            fresh_for: DEFAULT_FRESHNESS,
        }
    }

    /// Override the freshness window (volatile views shorten it, reference
    /// data stretches it).
    pub fn with_freshness(mut self, fresh_for: Duration) -> Self {
        self.fresh_for = fresh_for;
        self
    }

    /// List query: serves from cache inside the freshness window, otherwise
    /// fetches and caches under the filter-specific list key.
    pub async fn list(&self, filters: &B::Filters) -> Result<Paginated<B::Entity>, ApiError> {
        let key = CacheKey::list(B::Entity::ENTITY, filters);
        if let Some(cached) = self.cache.get_fresh(&key) {
            if let Ok(page) = serde_json::from_value(cached) {
                return Ok(page);
            }
        }

        let page = self.backend.list(filters).await?;
        if let Ok(value) = serde_json::to_value(&page) {
            self.cache.put(key, value, self.fresh_for);
        }
        Ok(page)
    }

    /// Detail query. An empty id is rejected before any fetch, mirroring
    /// the original's `enabled: !!id` guard.
    pub async fn detail(&self, id: &str) -> Result<B::Entity, ApiError> {
        if id.trim().is_empty() {
            return Err(ApiError::MissingId);
        }

        let key = CacheKey::detail(B::Entity::ENTITY, id);
        if let Some(cached) = self.cache.get_fresh(&key) {
            if let Ok(entity) = serde_json::from_value(cached) {
                return Ok(entity);
            }
        }

        let entity = self.backend.fetch(id).await?;
        if let Ok(value) = serde_json::to_value(&entity) {
            self.cache.put(key, value, self.fresh_for);
        }
        Ok(entity)
    }

    /// Create mutation: invalidates the list namespace on success.
    pub async fn create(&self, input: B::Entity) -> Result<B::Entity, ApiError> {
        match self.backend.create(input).await {
            Ok(created) => {
                self.cache.invalidate_lists(B::Entity::ENTITY);
                self.notifier
                    .success(&format!("{} created", B::Entity::NOUN));
                Ok(created)
            }
            Err(e) => {
                self.notifier.error(&e.to_string());
                Err(e)
            }
        }
    }

    /// Update mutation: invalidates the list namespace and replaces the
    /// cached detail entry with the server-returned object. The server
    /// response, not the submitted patch, is the new source of truth.
    pub async fn update(&self, id: &str, patch: Value) -> Result<B::Entity, ApiError> {
        match self.backend.update(id, patch).await {
            Ok(updated) => {
                self.cache.invalidate_lists(B::Entity::ENTITY);
                if let Ok(value) = serde_json::to_value(&updated) {
                    self.cache
                        .put_detail(B::Entity::ENTITY, updated.id(), value, self.fresh_for);
                }
                self.notifier
                    .success(&format!("{} updated", B::Entity::NOUN));
                Ok(updated)
            }
            Err(e) => {
                self.notifier.error(&e.to_string());
                Err(e)
            }
        }
    }

    /// Delete mutation: invalidates the list namespace and evicts the
    /// detail entry.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        match self.backend.delete(id).await {
            Ok(()) => {
                self.cache.invalidate_lists(B::Entity::ENTITY);
                self.cache.remove_detail(B::Entity::ENTITY, id);
                self.notifier
                    .success(&format!("{} deleted", B::Entity::NOUN));
                Ok(())
            }
            Err(e) => {
                self.notifier.error(&e.to_string());
                Err(e)
            }
        }
    }

    /// Drop everything cached for this entity.
    pub fn invalidate(&self) {
        self.cache.invalidate_entity(B::Entity::ENTITY);
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::notify::BufferNotifier;
    use super::*;
    use parking_lot::RwLock;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Widget {
        id: String,
        name: String,
    }

    impl Resource for Widget {
        const ENTITY: &'static str = "widgets";
        const NOUN: &'static str = "Widget";

        fn id(&self) -> &str {
            &self.id
        }
    }

    /// In-memory backend with togglable failure, plus a fetch counter so
    /// tests can observe cache hits.
    struct StubBackend {
        records: Arc<RwLock<Vec<Widget>>>,
        fail: Arc<RwLock<bool>>,
        list_calls: Arc<RwLock<usize>>,
    }

    impl StubBackend {
        fn new(records: Vec<Widget>) -> Self {
            StubBackend {
                records: Arc::new(RwLock::new(records)),
                fail: Arc::new(RwLock::new(false)),
                list_calls: Arc::new(RwLock::new(0)),
            }
        }

        fn check(&self) -> Result<(), ApiError> {
            if *self.fail.read() {
                Err(ApiError::Backend {
                    message: "stub backend down".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[derive(Debug, Clone, Default, Serialize, PartialEq)]
    struct NoFilters {}

    #[async_trait]
    impl ResourceBackend for StubBackend {
        type Entity = Widget;
        type Filters = NoFilters;

        async fn list(&self, _filters: &NoFilters) -> Result<Paginated<Widget>, ApiError> {
            self.check()?;
            *self.list_calls.write() += 1;
            let data = self.records.read().clone();
            let total = data.len() as u64;
            Ok(Paginated {
                data,
                total,
                page: 1,
                limit: 10,
                total_pages: total.div_ceil(10),
            })
        }

        async fn fetch(&self, id: &str) -> Result<Widget, ApiError> {
            self.check()?;
            self.records
                .read()
                .iter()
                .find(|w| w.id == id)
                .cloned()
                .ok_or_else(|| ApiError::Backend {
                    message: "Record not found".into(),
                })
        }

        async fn create(&self, input: Widget) -> Result<Widget, ApiError> {
            self.check()?;
            self.records.write().push(input.clone());
            Ok(input)
        }

        async fn update(&self, id: &str, patch: Value) -> Result<Widget, ApiError> {
            self.check()?;
            let mut records = self.records.write();
            let widget = records
                .iter_mut()
                .find(|w| w.id == id)
                .ok_or_else(|| ApiError::Backend {
                    message: "Record not found".into(),
                })?;
            if let Some(name) = patch.get("name").and_then(Value::as_str) {
                widget.name = name.to_string();
            }
            // emulate a server-side normalization the client did not submit
            widget.name = widget.name.trim().to_string();
            Ok(widget.clone())
        }

        async fn delete(&self, id: &str) -> Result<(), ApiError> {
            self.check()?;
            self.records.write().retain(|w| w.id != id);
            Ok(())
        }
    }

    fn store_with(
        records: Vec<Widget>,
    ) -> (ResourceStore<StubBackend>, Arc<BufferNotifier>, Arc<QueryCache>) {
        let cache = Arc::new(QueryCache::new());
        let notifier = Arc::new(BufferNotifier::new());
        let backend_notifier: Arc<dyn Notifier> = notifier.clone();
        let store = ResourceStore::new(StubBackend::new(records), Arc::clone(&cache), backend_notifier);
        (store, notifier, cache)
    }

    fn widget(id: &str, name: &str) -> Widget {
        Widget {
            id: id.into(),
            name: name.into(),
        }
    }

    #[tokio::test]
    async fn test_list_caches_until_invalidated() {
        let (store, _, _) = store_with(vec![widget("w-1", "Alpha")]);

        store.list(&NoFilters {}).await.unwrap();
        store.list(&NoFilters {}).await.unwrap();
        assert_eq!(*store.backend.list_calls.read(), 1);

        store.invalidate();
        store.list(&NoFilters {}).await.unwrap();
        assert_eq!(*store.backend.list_calls.read(), 2);
    }

    #[tokio::test]
    async fn test_create_then_list_includes_new_record() {
        let (store, notifier, _) = store_with(vec![widget("w-1", "Alpha")]);

        // warm the list cache
        assert_eq!(store.list(&NoFilters {}).await.unwrap().data.len(), 1);

        store.create(widget("w-2", "Beta")).await.unwrap();

        // create invalidated the list namespace, so this refetches
        let page = store.list(&NoFilters {}).await.unwrap();
        assert_eq!(page.data.len(), 2);
        assert!(page.data.iter().any(|w| w.id == "w-2"));
        assert_eq!(notifier.successes(), vec!["Widget created"]);
    }

    #[tokio::test]
    async fn test_update_replaces_cached_detail_with_server_object() {
        let (store, _, cache) = store_with(vec![widget("w-1", "Alpha")]);

        store.detail("w-1").await.unwrap();
        // submitted patch has padding; server trims it
        store.update("w-1", json!({"name": "  Beta  "})).await.unwrap();

        let cached = cache
            .get_fresh(&CacheKey::detail("widgets", "w-1"))
            .unwrap();
        let cached: Widget = serde_json::from_value(cached).unwrap();
        assert_eq!(cached.name, "Beta"); // the server's object, not the patch
    }

    #[tokio::test]
    async fn test_delete_evicts_detail_and_list() {
        let (store, _, cache) = store_with(vec![widget("w-1", "Alpha"), widget("w-2", "Beta")]);

        store.detail("w-1").await.unwrap();
        store.list(&NoFilters {}).await.unwrap();

        store.delete("w-1").await.unwrap();

        assert!(cache
            .get_fresh(&CacheKey::detail("widgets", "w-1"))
            .is_none());
        let page = store.list(&NoFilters {}).await.unwrap();
        assert!(!page.data.iter().any(|w| w.id == "w-1"));
    }

    #[tokio::test]
    async fn test_mutation_failure_notifies_once_and_leaves_cache() {
        let (store, notifier, cache) = store_with(vec![widget("w-1", "Alpha")]);

        store.list(&NoFilters {}).await.unwrap();
        let cached_before = cache.len();

        *store.backend.fail.write() = true;
        let err = store.create(widget("w-2", "Beta")).await.unwrap_err();
        assert_eq!(err.to_string(), "stub backend down");

        assert_eq!(notifier.count(), 1);
        assert_eq!(notifier.errors(), vec!["stub backend down"]);
        assert_eq!(cache.len(), cached_before);
    }

    #[tokio::test]
    async fn test_query_failure_produces_no_notification() {
        let (store, notifier, _) = store_with(vec![]);
        *store.backend.fail.write() = true;

        assert!(store.list(&NoFilters {}).await.is_err());
        assert!(store.detail("w-1").await.is_err());
        assert_eq!(notifier.count(), 0);
    }

    #[tokio::test]
    async fn test_detail_requires_id() {
        let (store, _, _) = store_with(vec![]);
        assert!(matches!(
            store.detail("").await.unwrap_err(),
            ApiError::MissingId
        ));
        assert!(matches!(
            store.detail("   ").await.unwrap_err(),
            ApiError::MissingId
        ));
    }

    #[tokio::test]
    async fn test_exactly_one_success_notification_per_mutation() {
        let (store, notifier, _) = store_with(vec![widget("w-1", "Alpha")]);

        store.create(widget("w-2", "Beta")).await.unwrap();
        store.update("w-1", json!({"name": "Gamma"})).await.unwrap();
        store.delete("w-2").await.unwrap();

        assert_eq!(
            notifier.successes(),
            vec!["Widget created", "Widget updated", "Widget deleted"]
        );
        assert_eq!(notifier.count(), 3);
    }
}
