//! Fixture-backed mock transport.
//!
//! Every call is routed through a `(method, endpoint)` dispatcher over the
//! shared [`FixtureStore`]; unmatched routes fall through to a generic echo
//! response. Calls carry an artificial 300-1200ms delay so the demo feels
//! like a network, switchable off for tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::RngExt;
use serde_json::{json, Value};

use super::fixtures::{FixtureStore, ListQuery};
use super::{BackendGateway, TransportMode};
use crate::envelope::ApiEnvelope;

/// A fixture collection reachable over the mock REST surface.
struct Route {
    path: &'static str,
    collection: &'static str,
    id_field: &'static str,
    search_fields: &'static [&'static str],
}

const ROUTES: &[Route] = &[
    Route {
        path: "clients",
        collection: "clients",
        id_field: "id",
        search_fields: &["clientName", "clientEmail", "clientContact", "gst"],
    },
    Route {
        path: "orders",
        collection: "orders",
        id_field: "orderNumber",
        search_fields: &["orderNumber", "clientName"],
    },
    Route {
        path: "leads",
        collection: "leads",
        id_field: "id",
        search_fields: &["name", "email", "contact", "source"],
    },
    Route {
        path: "employees",
        collection: "employees",
        id_field: "id",
        search_fields: &["name", "email", "department", "role"],
    },
    Route {
        path: "consultants",
        collection: "consultants",
        id_field: "id",
        search_fields: &["name", "email", "specialization"],
    },
    Route {
        path: "documents",
        collection: "documents",
        id_field: "id",
        search_fields: &["name", "category", "docType"],
    },
    Route {
        path: "transactions",
        collection: "transactions",
        id_field: "id",
        search_fields: &["description", "category", "orderNumber"],
    },
    Route {
        path: "notifications",
        collection: "notifications",
        id_field: "id",
        search_fields: &["title", "body", "channel"],
    },
    Route {
        path: "communications/channels",
        collection: "channels",
        id_field: "id",
        search_fields: &["name", "channelType"],
    },
    Route {
        path: "communications/templates",
        collection: "templates",
        id_field: "id",
        search_fields: &["name", "subject", "channel"],
    },
    Route {
        path: "security/events",
        collection: "audit_events",
        id_field: "id",
        search_fields: &["actor", "action", "ipAddress"],
    },
];

/// Resolve a normalized path to a collection route and optional record id.
fn resolve(path: &str) -> Option<(&'static Route, Option<&str>)> {
    for route in ROUTES {
        if path == route.path {
            return Some((route, None));
        }
        if let Some(rest) = path.strip_prefix(route.path) {
            if let Some(id) = rest.strip_prefix('/') {
                if !id.is_empty() && !id.contains('/') {
                    return Some((route, Some(id)));
                }
            }
        }
    }
    None
}

/// The mock transport.
pub struct MockGateway {
    fixtures: Arc<FixtureStore>,
    latency: bool,
}

impl MockGateway {
    /// Seeded fixtures, demo latency on.
    pub fn new() -> Self {
        MockGateway {
            fixtures: Arc::new(FixtureStore::seeded()),
            latency: true,
        }
    }

    /// Seeded fixtures, no latency. For tests.
    pub fn without_latency() -> Self {
        MockGateway {
            fixtures: Arc::new(FixtureStore::seeded()),
            latency: false,
        }
    }

    /// Wrap an existing store (shared with the test or the demo binary).
    pub fn with_store(fixtures: Arc<FixtureStore>, latency: bool) -> Self {
        MockGateway { fixtures, latency }
    }

    pub fn fixtures(&self) -> Arc<FixtureStore> {
        Arc::clone(&self.fixtures)
    }

    /// Emulate network latency. Demo polish, not throttling.
    async fn delay(&self) {
        if !self.latency {
            return;
        }
        let ms = rand::rng().random_range(300..=1200);
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    fn echo(method: &str, endpoint: &str) -> ApiEnvelope {
        ApiEnvelope::ok(json!({
            "message": format!("Mock {} response for {}", method, endpoint),
            "data": {}
        }))
    }

    fn list_query(params: &[(&str, String)]) -> ListQuery {
        let mut query = ListQuery::default();
        for (key, value) in params {
            match *key {
                "page" => query.page = value.parse().unwrap_or(0),
                "limit" => query.limit = value.parse().unwrap_or(0),
                "search" => query.search = Some(value.clone()),
                "status" => query.status = Some(value.clone()),
                _ => {}
            }
        }
        query
    }

    fn login(&self, body: &Value) -> ApiEnvelope {
        let email = body.get("email").and_then(Value::as_str).unwrap_or("");
        let password = body.get("password").and_then(Value::as_str).unwrap_or("");
        if email.is_empty() || password.is_empty() {
            return ApiEnvelope::failure("AUTH_FAILED", "Invalid credentials");
        }
        let name = email
            .split('@')
            .next()
            .unwrap_or("user")
            .replace(['.', '_'], " ");
        ApiEnvelope::ok(json!({
            "token": format!("mock-{}", uuid::Uuid::new_v4()),
            "user": {
                "id": "usr-demo",
                "name": name,
                "email": email,
                "role": "admin"
            }
        }))
    }

    fn dashboard_summary(&self) -> Value {
        let clients = self.fixtures.all("clients");
        let orders = self.fixtures.all("orders");
        let leads = self.fixtures.all("leads");
        let notifications = self.fixtures.all("notifications");

        let active_clients = clients
            .iter()
            .filter(|c| c["status"].as_str() == Some("active"))
            .count() as u64;
        let pending_orders = orders
            .iter()
            .filter(|o| o["status"].as_str() == Some("pending"))
            .count() as u64;
        let open_leads = leads
            .iter()
            .filter(|l| {
                matches!(
                    l["status"].as_str(),
                    Some("new") | Some("call_followup") | Some("ready_for_quote")
                )
            })
            .count() as u64;
        let total_revenue: f64 = orders
            .iter()
            .filter_map(|o| o["paidAmount"].as_f64())
            .sum();
        let outstanding: f64 = orders
            .iter()
            .filter_map(|o| o["balanceAmount"].as_f64())
            .sum();
        let unread = notifications
            .iter()
            .filter(|n| n["read"].as_bool() == Some(false))
            .count() as u64;

        json!({
            "totalClients": clients.len() as u64,
            "activeClients": active_clients,
            "totalOrders": orders.len() as u64,
            "pendingOrders": pending_orders,
            "openLeads": open_leads,
            "totalRevenue": total_revenue,
            "outstandingBalance": outstanding,
            "unreadNotifications": unread,
        })
    }

    fn analytics_summary(&self) -> Value {
        let orders = self.fixtures.all("orders");
        let leads = self.fixtures.all("leads");

        // Group orders by YYYY-MM of orderDate, in chronological order.
        let mut months: Vec<String> = orders
            .iter()
            .filter_map(|o| o["orderDate"].as_str())
            .filter(|d| d.len() >= 7)
            .map(|d| d[..7].to_string())
            .collect();
        months.sort();
        months.dedup();

        let converted = leads
            .iter()
            .filter(|l| l["status"].as_str() == Some("convert"))
            .count() as u64;

        let monthly: Vec<Value> = months
            .iter()
            .map(|month| {
                let in_month: Vec<&Value> = orders
                    .iter()
                    .filter(|o| {
                        o["orderDate"]
                            .as_str()
                            .map(|d| d.starts_with(month.as_str()))
                            .unwrap_or(false)
                    })
                    .collect();
                let revenue: f64 = in_month
                    .iter()
                    .filter_map(|o| o["netAmount"].as_f64())
                    .sum();
                json!({
                    "month": month,
                    "revenue": revenue,
                    "orders": in_month.len() as u64,
                    "leadsConverted": converted / months.len().max(1) as u64,
                })
            })
            .collect();

        let total_net: f64 = orders.iter().filter_map(|o| o["netAmount"].as_f64()).sum();
        let conversion_rate = if leads.is_empty() {
            0.0
        } else {
            converted as f64 / leads.len() as f64
        };
        let average_order_value = if orders.is_empty() {
            0.0
        } else {
            total_net / orders.len() as f64
        };

        json!({
            "monthly": monthly,
            "conversionRate": conversion_rate,
            "averageOrderValue": average_order_value,
        })
    }

    fn finance_summary(&self) -> Value {
        let transactions = self.fixtures.all("transactions");
        let orders = self.fixtures.all("orders");

        let total_income: f64 = transactions
            .iter()
            .filter(|t| t["type"].as_str() == Some("income"))
            .filter_map(|t| t["amount"].as_f64())
            .sum();
        let total_expense: f64 = transactions
            .iter()
            .filter(|t| t["type"].as_str() == Some("expense"))
            .filter_map(|t| t["amount"].as_f64())
            .sum();
        let outstanding: f64 = orders
            .iter()
            .filter_map(|o| o["balanceAmount"].as_f64())
            .sum();

        json!({
            "totalIncome": total_income,
            "totalExpense": total_expense,
            "net": total_income - total_expense,
            "outstandingBalance": outstanding,
        })
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackendGateway for MockGateway {
    fn mode(&self) -> TransportMode {
        TransportMode::Mock
    }

    async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> ApiEnvelope {
        self.delay().await;
        let path = endpoint.trim_matches('/');

        match path {
            "dashboard/summary" => return ApiEnvelope::ok(self.dashboard_summary()),
            "analytics/summary" => return ApiEnvelope::ok(self.analytics_summary()),
            "finance/summary" => return ApiEnvelope::ok(self.finance_summary()),
            _ => {}
        }

        match resolve(path) {
            Some((route, None)) => {
                let query = Self::list_query(params);
                let (records, pagination) =
                    self.fixtures
                        .query(route.collection, &query, route.search_fields);
                ApiEnvelope::ok_with_pagination(Value::Array(records), pagination)
            }
            Some((route, Some(id))) => {
                match self.fixtures.get(route.collection, route.id_field, id) {
                    Some(record) => ApiEnvelope::ok(record),
                    None => ApiEnvelope::failure("NOT_FOUND", "Record not found"),
                }
            }
            None => Self::echo("GET", endpoint),
        }
    }

    async fn post(&self, endpoint: &str, body: Value) -> ApiEnvelope {
        self.delay().await;
        let path = endpoint.trim_matches('/');

        if path == "auth/login" {
            return self.login(&body);
        }

        match resolve(path) {
            Some((route, None)) => {
                let created = self.fixtures.insert(route.collection, route.id_field, body);
                ApiEnvelope::ok_with_message(created, "Created")
            }
            _ => Self::echo("POST", endpoint),
        }
    }

    async fn put(&self, endpoint: &str, body: Value) -> ApiEnvelope {
        self.delay().await;
        let path = endpoint.trim_matches('/');

        match resolve(path) {
            Some((route, Some(id))) => {
                match self.fixtures.merge(route.collection, route.id_field, id, &body) {
                    Some(updated) => ApiEnvelope::ok_with_message(updated, "Updated"),
                    None => ApiEnvelope::failure("NOT_FOUND", "Record not found"),
                }
            }
            _ => Self::echo("PUT", endpoint),
        }
    }

    async fn delete(&self, endpoint: &str) -> ApiEnvelope {
        self.delay().await;
        let path = endpoint.trim_matches('/');

        match resolve(path) {
            Some((route, Some(id))) => {
                if self.fixtures.remove(route.collection, route.id_field, id) {
                    ApiEnvelope::ok_with_message(json!({ "deleted": true }), "Deleted")
                } else {
                    ApiEnvelope::failure("NOT_FOUND", "Record not found")
                }
            }
            _ => Self::echo("DELETE", endpoint),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_path_falls_through_to_echo() {
        let gw = MockGateway::without_latency();
        let env = gw.get("/unknown/path", &[]).await;
        assert!(env.success);
        let data = env.data.unwrap();
        assert_eq!(data["message"], "Mock GET response for /unknown/path");
        assert_eq!(data["data"], json!({}));
    }

    #[tokio::test]
    async fn test_list_clients_paginates() {
        let gw = MockGateway::without_latency();
        let env = gw
            .get(
                "/clients",
                &[("page", "1".to_string()), ("limit", "2".to_string())],
            )
            .await;
        assert!(env.success);
        assert_eq!(env.data.unwrap().as_array().unwrap().len(), 2);
        let p = env.pagination.unwrap();
        assert_eq!(p.total, 4);
        assert_eq!(p.total_pages, 2);
    }

    #[tokio::test]
    async fn test_detail_and_not_found() {
        let gw = MockGateway::without_latency();
        let env = gw.get("/clients/cl-1001", &[]).await;
        assert!(env.success);
        assert_eq!(env.data.unwrap()["clientName"], "Sharma Textiles");

        let env = gw.get("/clients/cl-9999", &[]).await;
        assert!(!env.success);
        assert_eq!(env.message.as_deref(), Some("Record not found"));
    }

    #[tokio::test]
    async fn test_create_update_delete_cycle() {
        let gw = MockGateway::without_latency();

        let env = gw
            .post("/leads", json!({"name": "Fresh Lead", "status": "new"}))
            .await;
        assert!(env.success);
        let id = env.data.unwrap()["id"].as_str().unwrap().to_string();

        let env = gw
            .put(&format!("/leads/{}", id), json!({"status": "convert"}))
            .await;
        assert!(env.success);
        assert_eq!(env.data.unwrap()["status"], "convert");

        let env = gw.delete(&format!("/leads/{}", id)).await;
        assert!(env.success);

        let env = gw.get(&format!("/leads/{}", id), &[]).await;
        assert!(!env.success);
    }

    #[tokio::test]
    async fn test_login_requires_credentials() {
        let gw = MockGateway::without_latency();
        let env = gw.post("/auth/login", json!({"email": "", "password": ""})).await;
        assert!(!env.success);

        let env = gw
            .post(
                "/auth/login",
                json!({"email": "admin@opsdesk.example", "password": "secret"}),
            )
            .await;
        assert!(env.success);
        let data = env.data.unwrap();
        assert!(data["token"].as_str().unwrap().starts_with("mock-"));
        assert_eq!(data["user"]["email"], "admin@opsdesk.example");
    }

    #[tokio::test]
    async fn test_orders_route_uses_order_number_identity() {
        let gw = MockGateway::without_latency();
        let env = gw.get("/orders/ORD-2026-002", &[]).await;
        assert!(env.success);
        assert_eq!(env.data.unwrap()["clientName"], "Verma Exports");
    }

    #[tokio::test]
    async fn test_nested_communications_routes() {
        let gw = MockGateway::without_latency();
        let env = gw.get("/communications/channels", &[]).await;
        assert!(env.success);
        assert_eq!(env.pagination.unwrap().total, 3);

        let env = gw.get("/communications/templates/tpl-1", &[]).await;
        assert!(env.success);
        assert_eq!(env.data.unwrap()["name"], "Payment Reminder");
    }

    #[tokio::test]
    async fn test_dashboard_summary_reflects_fixtures() {
        let gw = MockGateway::without_latency();
        let env = gw.get("/dashboard/summary", &[]).await;
        assert!(env.success);
        let data = env.data.unwrap();
        assert_eq!(data["totalClients"], 4);
        assert_eq!(data["activeClients"], 3);
        assert_eq!(data["pendingOrders"], 1);
        assert_eq!(data["unreadNotifications"], 2);
    }
}
