//! Documents view: cached CRUD store over stored-file records.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::client::{ApiClient, ListFilters};
use crate::envelope::Paginated;
use crate::error::ApiError;
use crate::store::cache::QueryCache;
use crate::store::notify::Notifier;
use crate::store::{Resource, ResourceBackend, ResourceStore};
use crate::types::Document;

impl Resource for Document {
    const ENTITY: &'static str = "documents";
    const NOUN: &'static str = "Document";

    fn id(&self) -> &str {
        &self.id
    }
}

pub struct DocumentsBackend {
    api: Arc<ApiClient>,
}

#[async_trait]
impl ResourceBackend for DocumentsBackend {
    type Entity = Document;
    type Filters = ListFilters;

    async fn list(&self, filters: &ListFilters) -> Result<Paginated<Document>, ApiError> {
        self.api.get_documents(filters).await
    }

    async fn fetch(&self, id: &str) -> Result<Document, ApiError> {
        self.api.get_document(id).await
    }

    async fn create(&self, input: Document) -> Result<Document, ApiError> {
        self.api.create_document(&input).await
    }

    async fn update(&self, id: &str, patch: Value) -> Result<Document, ApiError> {
        self.api.update_document(id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.api.delete_document(id).await
    }
}

pub fn documents_store(
    api: Arc<ApiClient>,
    cache: Arc<QueryCache>,
    notifier: Arc<dyn Notifier>,
) -> ResourceStore<DocumentsBackend> {
    ResourceStore::new(DocumentsBackend { api }, cache, notifier)
}
