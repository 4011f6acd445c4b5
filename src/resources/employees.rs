//! Employees view: cached CRUD store.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::client::{ApiClient, ListFilters};
use crate::envelope::Paginated;
use crate::error::ApiError;
use crate::store::cache::QueryCache;
use crate::store::notify::Notifier;
use crate::store::{Resource, ResourceBackend, ResourceStore};
use crate::types::Employee;

impl Resource for Employee {
    const ENTITY: &'static str = "employees";
    const NOUN: &'static str = "Employee";

    fn id(&self) -> &str {
        &self.id
    }
}

pub struct EmployeesBackend {
    api: Arc<ApiClient>,
}

#[async_trait]
impl ResourceBackend for EmployeesBackend {
    type Entity = Employee;
    type Filters = ListFilters;

    async fn list(&self, filters: &ListFilters) -> Result<Paginated<Employee>, ApiError> {
        self.api.get_employees(filters).await
    }

    async fn fetch(&self, id: &str) -> Result<Employee, ApiError> {
        self.api.get_employee(id).await
    }

    async fn create(&self, input: Employee) -> Result<Employee, ApiError> {
        self.api.create_employee(&input).await
    }

    async fn update(&self, id: &str, patch: Value) -> Result<Employee, ApiError> {
        self.api.update_employee(id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.api.delete_employee(id).await
    }
}

pub fn employees_store(
    api: Arc<ApiClient>,
    cache: Arc<QueryCache>,
    notifier: Arc<dyn Notifier>,
) -> ResourceStore<EmployeesBackend> {
    ResourceStore::new(EmployeesBackend { api }, cache, notifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::MockGateway;
    use crate::store::notify::BufferNotifier;
    use crate::token_store::MemoryTokenStore;
    use crate::types::StaffStatus;

    #[tokio::test]
    async fn test_nested_performance_survives_roundtrip() {
        let api = Arc::new(ApiClient::new(
            Arc::new(MockGateway::without_latency()),
            Arc::new(MemoryTokenStore::new()),
        ));
        let store = employees_store(
            api,
            Arc::new(QueryCache::new()),
            Arc::new(BufferNotifier::new()),
        );

        let employee = store.detail("emp-21").await.unwrap();
        assert_eq!(employee.status, StaffStatus::Active);
        assert_eq!(employee.performance.completed_tasks, 148);
        assert_eq!(employee.skills, vec!["GST", "Company Law"]);
    }
}
