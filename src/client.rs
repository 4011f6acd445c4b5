//! Typed API client.
//!
//! Single point of contact between the stores and the backend. Generic verbs
//! pass straight through to the gateway in either mode; the typed
//! per-entity convenience methods are mock-only and fail with a fixed
//! "Backend API not configured" error against a live transport. That
//! asymmetry is deliberate: completing the live backend is out of scope.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::envelope::{ApiEnvelope, Paginated};
use crate::error::ApiError;
use crate::gateway::{BackendGateway, TransportMode};
use crate::token_store::TokenStore;
use crate::types::{
    AnalyticsSummary, AuditEvent, AuthSession, Client, CommunicationChannel, Consultant,
    DashboardSummary, Document, Employee, FinanceSummary, Lead, Notification, Order, Template,
    Transaction,
};

/// Common list-query filters. Distinct filter values produce distinct cache
/// keys, so this type also canonicalizes into the list key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl ListFilters {
    pub fn page(page: u64, limit: u64) -> Self {
        ListFilters {
            page: Some(page),
            limit: Some(limit),
            ..Default::default()
        }
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(ref search) = self.search {
            params.push(("search", search.clone()));
        }
        if let Some(ref status) = self.status {
            params.push(("status", status.clone()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

/// The API client. Construction decides the transport once; the decision is
/// immutable for the client's lifetime.
pub struct ApiClient {
    gateway: Arc<dyn BackendGateway>,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(gateway: Arc<dyn BackendGateway>, tokens: Arc<dyn TokenStore>) -> Self {
        ApiClient { gateway, tokens }
    }

    pub fn mode(&self) -> TransportMode {
        self.gateway.mode()
    }

    // --- generic verbs (dual-mode) ---

    pub async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> ApiEnvelope {
        self.gateway.get(endpoint, params).await
    }

    pub async fn post(&self, endpoint: &str, body: Value) -> ApiEnvelope {
        self.gateway.post(endpoint, body).await
    }

    pub async fn put(&self, endpoint: &str, body: Value) -> ApiEnvelope {
        self.gateway.put(endpoint, body).await
    }

    pub async fn delete(&self, endpoint: &str) -> ApiEnvelope {
        self.gateway.delete(endpoint).await
    }

    // --- auth (built on the generic verbs, dual-mode) ---

    /// Authenticate and persist the returned bearer token.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ApiError> {
        let env = self
            .post("/auth/login", json!({ "email": email, "password": password }))
            .await;
        let (data, _) = env.into_result("Login failed")?;
        let session: AuthSession =
            serde_json::from_value(data).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.tokens.save(&session);
        Ok(session)
    }

    pub fn logout(&self) {
        self.tokens.clear();
    }

    pub fn current_session(&self) -> Option<AuthSession> {
        self.tokens.load()
    }

    // --- shared plumbing for the typed convenience methods (mock-only) ---

    fn ensure_mock(&self) -> Result<(), ApiError> {
        match self.mode() {
            TransportMode::Mock => Ok(()),
            TransportMode::Live => Err(ApiError::NotConfigured),
        }
    }

    async fn list_entities<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        filters: &ListFilters,
        fallback: &str,
    ) -> Result<Paginated<T>, ApiError> {
        self.ensure_mock()?;
        let env = self.get(endpoint, &filters.to_params()).await;
        let (data, pagination) = env.into_result(fallback)?;
        let items: Vec<T> =
            serde_json::from_value(data).map_err(|e| ApiError::Decode(e.to_string()))?;
        let pagination =
            pagination.ok_or_else(|| ApiError::Decode("list response had no pagination".into()))?;
        Ok(Paginated::from_parts(items, pagination))
    }

    async fn fetch_entity<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        fallback: &str,
    ) -> Result<T, ApiError> {
        self.ensure_mock()?;
        let env = self.get(endpoint, &[]).await;
        let (data, _) = env.into_result(fallback)?;
        serde_json::from_value(data).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn create_entity<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
        fallback: &str,
    ) -> Result<T, ApiError> {
        self.ensure_mock()?;
        let body = serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        let env = self.post(endpoint, body).await;
        let (data, _) = env.into_result(fallback)?;
        serde_json::from_value(data).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn update_entity<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        patch: Value,
        fallback: &str,
    ) -> Result<T, ApiError> {
        self.ensure_mock()?;
        let env = self.put(endpoint, patch).await;
        let (data, _) = env.into_result(fallback)?;
        serde_json::from_value(data).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn delete_entity(&self, endpoint: &str, fallback: &str) -> Result<(), ApiError> {
        self.ensure_mock()?;
        let env = self.delete(endpoint).await;
        env.into_result(fallback)?;
        Ok(())
    }

    // --- clients ---

    pub async fn get_clients(&self, filters: &ListFilters) -> Result<Paginated<Client>, ApiError> {
        self.list_entities("/clients", filters, "Failed to fetch clients")
            .await
    }

    pub async fn get_client(&self, id: &str) -> Result<Client, ApiError> {
        self.fetch_entity(&format!("/clients/{}", id), "Failed to fetch client")
            .await
    }

    pub async fn create_client(&self, client: &Client) -> Result<Client, ApiError> {
        self.create_entity("/clients", client, "Failed to create client")
            .await
    }

    pub async fn update_client(&self, id: &str, patch: Value) -> Result<Client, ApiError> {
        self.update_entity(&format!("/clients/{}", id), patch, "Failed to update client")
            .await
    }

    pub async fn delete_client(&self, id: &str) -> Result<(), ApiError> {
        self.delete_entity(&format!("/clients/{}", id), "Failed to delete client")
            .await
    }

    // --- orders (identity is the order number) ---

    pub async fn get_orders(&self, filters: &ListFilters) -> Result<Paginated<Order>, ApiError> {
        self.list_entities("/orders", filters, "Failed to fetch orders")
            .await
    }

    pub async fn get_order(&self, order_number: &str) -> Result<Order, ApiError> {
        self.fetch_entity(&format!("/orders/{}", order_number), "Failed to fetch order")
            .await
    }

    pub async fn create_order(&self, order: &Order) -> Result<Order, ApiError> {
        self.create_entity("/orders", order, "Failed to create order")
            .await
    }

    pub async fn update_order(&self, order_number: &str, patch: Value) -> Result<Order, ApiError> {
        self.update_entity(
            &format!("/orders/{}", order_number),
            patch,
            "Failed to update order",
        )
        .await
    }

    pub async fn delete_order(&self, order_number: &str) -> Result<(), ApiError> {
        self.delete_entity(
            &format!("/orders/{}", order_number),
            "Failed to delete order",
        )
        .await
    }

    // --- leads ---

    pub async fn get_leads(&self, filters: &ListFilters) -> Result<Paginated<Lead>, ApiError> {
        self.list_entities("/leads", filters, "Failed to fetch leads")
            .await
    }

    pub async fn get_lead(&self, id: &str) -> Result<Lead, ApiError> {
        self.fetch_entity(&format!("/leads/{}", id), "Failed to fetch lead")
            .await
    }

    pub async fn create_lead(&self, lead: &Lead) -> Result<Lead, ApiError> {
        self.create_entity("/leads", lead, "Failed to create lead")
            .await
    }

    pub async fn update_lead(&self, id: &str, patch: Value) -> Result<Lead, ApiError> {
        self.update_entity(&format!("/leads/{}", id), patch, "Failed to update lead")
            .await
    }

    pub async fn delete_lead(&self, id: &str) -> Result<(), ApiError> {
        self.delete_entity(&format!("/leads/{}", id), "Failed to delete lead")
            .await
    }

    // --- employees ---

    pub async fn get_employees(
        &self,
        filters: &ListFilters,
    ) -> Result<Paginated<Employee>, ApiError> {
        self.list_entities("/employees", filters, "Failed to fetch employees")
            .await
    }

    pub async fn get_employee(&self, id: &str) -> Result<Employee, ApiError> {
        self.fetch_entity(&format!("/employees/{}", id), "Failed to fetch employee")
            .await
    }

    pub async fn create_employee(&self, employee: &Employee) -> Result<Employee, ApiError> {
        self.create_entity("/employees", employee, "Failed to create employee")
            .await
    }

    pub async fn update_employee(&self, id: &str, patch: Value) -> Result<Employee, ApiError> {
        self.update_entity(
            &format!("/employees/{}", id),
            patch,
            "Failed to update employee",
        )
        .await
    }

    pub async fn delete_employee(&self, id: &str) -> Result<(), ApiError> {
        self.delete_entity(&format!("/employees/{}", id), "Failed to delete employee")
            .await
    }

    // --- consultants ---

    pub async fn get_consultants(
        &self,
        filters: &ListFilters,
    ) -> Result<Paginated<Consultant>, ApiError> {
        self.list_entities("/consultants", filters, "Failed to fetch consultants")
            .await
    }

    pub async fn get_consultant(&self, id: &str) -> Result<Consultant, ApiError> {
        self.fetch_entity(&format!("/consultants/{}", id), "Failed to fetch consultant")
            .await
    }

    pub async fn create_consultant(&self, consultant: &Consultant) -> Result<Consultant, ApiError> {
        self.create_entity("/consultants", consultant, "Failed to create consultant")
            .await
    }

    pub async fn update_consultant(&self, id: &str, patch: Value) -> Result<Consultant, ApiError> {
        self.update_entity(
            &format!("/consultants/{}", id),
            patch,
            "Failed to update consultant",
        )
        .await
    }

    pub async fn delete_consultant(&self, id: &str) -> Result<(), ApiError> {
        self.delete_entity(
            &format!("/consultants/{}", id),
            "Failed to delete consultant",
        )
        .await
    }

    // --- documents ---

    pub async fn get_documents(
        &self,
        filters: &ListFilters,
    ) -> Result<Paginated<Document>, ApiError> {
        self.list_entities("/documents", filters, "Failed to fetch documents")
            .await
    }

    pub async fn get_document(&self, id: &str) -> Result<Document, ApiError> {
        self.fetch_entity(&format!("/documents/{}", id), "Failed to fetch document")
            .await
    }

    pub async fn create_document(&self, document: &Document) -> Result<Document, ApiError> {
        self.create_entity("/documents", document, "Failed to create document")
            .await
    }

    pub async fn update_document(&self, id: &str, patch: Value) -> Result<Document, ApiError> {
        self.update_entity(
            &format!("/documents/{}", id),
            patch,
            "Failed to update document",
        )
        .await
    }

    pub async fn delete_document(&self, id: &str) -> Result<(), ApiError> {
        self.delete_entity(&format!("/documents/{}", id), "Failed to delete document")
            .await
    }

    // --- transactions (finance ledger) ---

    pub async fn get_transactions(
        &self,
        filters: &ListFilters,
    ) -> Result<Paginated<Transaction>, ApiError> {
        self.list_entities("/transactions", filters, "Failed to fetch transactions")
            .await
    }

    pub async fn get_transaction(&self, id: &str) -> Result<Transaction, ApiError> {
        self.fetch_entity(
            &format!("/transactions/{}", id),
            "Failed to fetch transaction",
        )
        .await
    }

    pub async fn create_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<Transaction, ApiError> {
        self.create_entity("/transactions", transaction, "Failed to create transaction")
            .await
    }

    pub async fn update_transaction(&self, id: &str, patch: Value) -> Result<Transaction, ApiError> {
        self.update_entity(
            &format!("/transactions/{}", id),
            patch,
            "Failed to update transaction",
        )
        .await
    }

    pub async fn delete_transaction(&self, id: &str) -> Result<(), ApiError> {
        self.delete_entity(
            &format!("/transactions/{}", id),
            "Failed to delete transaction",
        )
        .await
    }

    // --- notifications ---

    pub async fn get_notifications(
        &self,
        filters: &ListFilters,
    ) -> Result<Paginated<Notification>, ApiError> {
        self.list_entities("/notifications", filters, "Failed to fetch notifications")
            .await
    }

    pub async fn get_notification(&self, id: &str) -> Result<Notification, ApiError> {
        self.fetch_entity(
            &format!("/notifications/{}", id),
            "Failed to fetch notification",
        )
        .await
    }

    pub async fn create_notification(
        &self,
        notification: &Notification,
    ) -> Result<Notification, ApiError> {
        self.create_entity(
            "/notifications",
            notification,
            "Failed to create notification",
        )
        .await
    }

    pub async fn update_notification(&self, id: &str, patch: Value) -> Result<Notification, ApiError> {
        self.update_entity(
            &format!("/notifications/{}", id),
            patch,
            "Failed to update notification",
        )
        .await
    }

    /// Mark a notification read; returns the server's updated record.
    pub async fn mark_notification_read(&self, id: &str) -> Result<Notification, ApiError> {
        self.update_entity(
            &format!("/notifications/{}", id),
            json!({ "read": true }),
            "Failed to update notification",
        )
        .await
    }

    pub async fn delete_notification(&self, id: &str) -> Result<(), ApiError> {
        self.delete_entity(
            &format!("/notifications/{}", id),
            "Failed to delete notification",
        )
        .await
    }

    // --- communications ---

    pub async fn get_channels(
        &self,
        filters: &ListFilters,
    ) -> Result<Paginated<CommunicationChannel>, ApiError> {
        self.list_entities(
            "/communications/channels",
            filters,
            "Failed to fetch channels",
        )
        .await
    }

    pub async fn get_channel(&self, id: &str) -> Result<CommunicationChannel, ApiError> {
        self.fetch_entity(
            &format!("/communications/channels/{}", id),
            "Failed to fetch channel",
        )
        .await
    }

    pub async fn create_channel(
        &self,
        channel: &CommunicationChannel,
    ) -> Result<CommunicationChannel, ApiError> {
        self.create_entity(
            "/communications/channels",
            channel,
            "Failed to create channel",
        )
        .await
    }

    pub async fn delete_channel(&self, id: &str) -> Result<(), ApiError> {
        self.delete_entity(
            &format!("/communications/channels/{}", id),
            "Failed to delete channel",
        )
        .await
    }

    pub async fn update_channel(
        &self,
        id: &str,
        patch: Value,
    ) -> Result<CommunicationChannel, ApiError> {
        self.update_entity(
            &format!("/communications/channels/{}", id),
            patch,
            "Failed to update channel",
        )
        .await
    }

    pub async fn get_templates(
        &self,
        filters: &ListFilters,
    ) -> Result<Paginated<Template>, ApiError> {
        self.list_entities(
            "/communications/templates",
            filters,
            "Failed to fetch templates",
        )
        .await
    }

    pub async fn get_template(&self, id: &str) -> Result<Template, ApiError> {
        self.fetch_entity(
            &format!("/communications/templates/{}", id),
            "Failed to fetch template",
        )
        .await
    }

    pub async fn create_template(&self, template: &Template) -> Result<Template, ApiError> {
        self.create_entity(
            "/communications/templates",
            template,
            "Failed to create template",
        )
        .await
    }

    pub async fn update_template(&self, id: &str, patch: Value) -> Result<Template, ApiError> {
        self.update_entity(
            &format!("/communications/templates/{}", id),
            patch,
            "Failed to update template",
        )
        .await
    }

    pub async fn delete_template(&self, id: &str) -> Result<(), ApiError> {
        self.delete_entity(
            &format!("/communications/templates/{}", id),
            "Failed to delete template",
        )
        .await
    }

    // --- security ---

    pub async fn get_audit_events(
        &self,
        filters: &ListFilters,
    ) -> Result<Paginated<AuditEvent>, ApiError> {
        self.list_entities("/security/events", filters, "Failed to fetch audit events")
            .await
    }

    pub async fn get_audit_event(&self, id: &str) -> Result<AuditEvent, ApiError> {
        self.fetch_entity(
            &format!("/security/events/{}", id),
            "Failed to fetch audit event",
        )
        .await
    }

    // --- summaries (read-only) ---

    pub async fn get_dashboard_summary(&self) -> Result<DashboardSummary, ApiError> {
        self.fetch_entity("/dashboard/summary", "Failed to fetch dashboard")
            .await
    }

    pub async fn get_analytics_summary(&self) -> Result<AnalyticsSummary, ApiError> {
        self.fetch_entity("/analytics/summary", "Failed to fetch analytics")
            .await
    }

    pub async fn get_finance_summary(&self) -> Result<FinanceSummary, ApiError> {
        self.fetch_entity("/finance/summary", "Failed to fetch finance summary")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::MockGateway;
    use crate::token_store::MemoryTokenStore;
    use crate::types::ClientStatus;

    fn mock_client() -> ApiClient {
        ApiClient::new(
            Arc::new(MockGateway::without_latency()),
            Arc::new(MemoryTokenStore::new()),
        )
    }

    #[tokio::test]
    async fn test_get_clients_typed_pagination() {
        let api = mock_client();
        let page = api.get_clients(&ListFilters::page(1, 2)).await.unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.total, 4);
        assert_eq!(page.total_pages, 2);
    }

    #[tokio::test]
    async fn test_status_filter_typed() {
        let api = mock_client();
        let filters = ListFilters {
            status: Some("inactive".into()),
            ..Default::default()
        };
        let page = api.get_clients(&filters).await.unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].status, ClientStatus::Inactive);
    }

    #[tokio::test]
    async fn test_update_returns_server_object() {
        let api = mock_client();
        let updated = api
            .update_client("cl-1001", json!({"status": "inactive"}))
            .await
            .unwrap();
        assert_eq!(updated.id, "cl-1001");
        assert_eq!(updated.status, ClientStatus::Inactive);
        // untouched fields come back from the server record
        assert_eq!(updated.client_name, "Sharma Textiles");
    }

    #[tokio::test]
    async fn test_login_persists_token() {
        let api = mock_client();
        assert!(api.current_session().is_none());
        let session = api.login("admin@opsdesk.example", "secret").await.unwrap();
        assert!(session.token.starts_with("mock-"));
        assert_eq!(api.current_session().unwrap().token, session.token);
        api.logout();
        assert!(api.current_session().is_none());
    }

    #[tokio::test]
    async fn test_login_failure_is_backend_error() {
        let api = mock_client();
        let err = api.login("", "").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[tokio::test]
    async fn test_convenience_methods_fail_against_live_transport() {
        // Typed methods are mock-only; the fixed error fires before any
        // request is attempted, so the unreachable base URL never matters.
        let api = ApiClient::new(
            Arc::new(crate::gateway::http::HttpGateway::new(
                "http://127.0.0.1:9".into(),
                None,
                Arc::new(MemoryTokenStore::new()),
            )),
            Arc::new(MemoryTokenStore::new()),
        );
        let err = api.get_clients(&ListFilters::default()).await.unwrap_err();
        assert!(matches!(err, ApiError::NotConfigured));
        assert_eq!(err.to_string(), "Backend API not configured");
        assert!(!err.is_retryable());
    }
}
