//! Orders view: cached CRUD store plus revenue/status stats.
//!
//! Order identity is the order number throughout; there is no separate
//! surrogate id.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::client::{ApiClient, ListFilters};
use crate::envelope::Paginated;
use crate::error::ApiError;
use crate::store::cache::QueryCache;
use crate::store::notify::Notifier;
use crate::store::{Resource, ResourceBackend, ResourceStore};
use crate::types::{Order, OrderStatus, PaymentStatus};

impl Resource for Order {
    const ENTITY: &'static str = "orders";
    const NOUN: &'static str = "Order";

    fn id(&self) -> &str {
        &self.order_number
    }
}

pub struct OrdersBackend {
    api: Arc<ApiClient>,
}

#[async_trait]
impl ResourceBackend for OrdersBackend {
    type Entity = Order;
    type Filters = ListFilters;

    async fn list(&self, filters: &ListFilters) -> Result<Paginated<Order>, ApiError> {
        self.api.get_orders(filters).await
    }

    async fn fetch(&self, order_number: &str) -> Result<Order, ApiError> {
        self.api.get_order(order_number).await
    }

    async fn create(&self, input: Order) -> Result<Order, ApiError> {
        self.api.create_order(&input).await
    }

    async fn update(&self, order_number: &str, patch: Value) -> Result<Order, ApiError> {
        self.api.update_order(order_number, patch).await
    }

    async fn delete(&self, order_number: &str) -> Result<(), ApiError> {
        self.api.delete_order(order_number).await
    }
}

pub fn orders_store(
    api: Arc<ApiClient>,
    cache: Arc<QueryCache>,
    notifier: Arc<dyn Notifier>,
) -> ResourceStore<OrdersBackend> {
    ResourceStore::new(OrdersBackend { api }, cache, notifier)
}

/// Monetary and status rollup over fetched order data. Balance figures are
/// summed as returned by the server; nothing is recomputed from net/paid.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OrderStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub unpaid: usize,
    pub total_revenue: f64,
    pub total_paid: f64,
    pub outstanding_balance: f64,
}

pub fn order_stats(orders: &[Order]) -> OrderStats {
    let mut stats = OrderStats {
        total: orders.len(),
        ..Default::default()
    };
    for order in orders {
        match order.status {
            OrderStatus::Pending => stats.pending += 1,
            OrderStatus::InProgress => stats.in_progress += 1,
            OrderStatus::Completed => stats.completed += 1,
            OrderStatus::Cancelled => stats.cancelled += 1,
        }
        if order.payment_status == PaymentStatus::Unpaid {
            stats.unpaid += 1;
        }
        stats.total_revenue += order.net_amount;
        stats.total_paid += order.paid_amount;
        stats.outstanding_balance += order.balance_amount;
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::MockGateway;
    use crate::store::notify::BufferNotifier;
    use crate::token_store::MemoryTokenStore;

    fn setup() -> ResourceStore<OrdersBackend> {
        let api = Arc::new(ApiClient::new(
            Arc::new(MockGateway::without_latency()),
            Arc::new(MemoryTokenStore::new()),
        ));
        orders_store(
            api,
            Arc::new(QueryCache::new()),
            Arc::new(BufferNotifier::new()),
        )
    }

    #[tokio::test]
    async fn test_detail_by_order_number() {
        let store = setup();
        let order = store.detail("ORD-2026-003").await.unwrap();
        assert_eq!(order.client_id, "cl-1004");
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items.len(), 1);
    }

    #[tokio::test]
    async fn test_record_payment_via_update() {
        let store = setup();
        let updated = store
            .update(
                "ORD-2026-003",
                serde_json::json!({
                    "paidAmount": 23600.0,
                    "balanceAmount": 0.0,
                    "paymentStatus": "paid"
                }),
            )
            .await
            .unwrap();
        assert_eq!(updated.payment_status, PaymentStatus::Paid);
        assert_eq!(updated.balance_amount, 0.0);
    }

    #[tokio::test]
    async fn test_order_stats_over_fixture_list() {
        let store = setup();
        let page = store
            .list(&ListFilters::page(1, 50))
            .await
            .unwrap();
        let stats = order_stats(&page.data);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.cancelled, 1);
        assert!((stats.outstanding_balance - 135200.0).abs() < 1e-6);
    }
}
