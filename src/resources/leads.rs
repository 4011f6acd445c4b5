//! Sales-funnel view: cached CRUD store plus funnel stats.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::client::{ApiClient, ListFilters};
use crate::envelope::Paginated;
use crate::error::ApiError;
use crate::store::cache::QueryCache;
use crate::store::notify::Notifier;
use crate::store::{Resource, ResourceBackend, ResourceStore};
use crate::types::{Lead, LeadStatus};

impl Resource for Lead {
    const ENTITY: &'static str = "leads";
    const NOUN: &'static str = "Lead";

    fn id(&self) -> &str {
        &self.id
    }
}

pub struct LeadsBackend {
    api: Arc<ApiClient>,
}

#[async_trait]
impl ResourceBackend for LeadsBackend {
    type Entity = Lead;
    type Filters = ListFilters;

    async fn list(&self, filters: &ListFilters) -> Result<Paginated<Lead>, ApiError> {
        self.api.get_leads(filters).await
    }

    async fn fetch(&self, id: &str) -> Result<Lead, ApiError> {
        self.api.get_lead(id).await
    }

    async fn create(&self, input: Lead) -> Result<Lead, ApiError> {
        self.api.create_lead(&input).await
    }

    async fn update(&self, id: &str, patch: Value) -> Result<Lead, ApiError> {
        self.api.update_lead(id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.api.delete_lead(id).await
    }
}

pub fn leads_store(
    api: Arc<ApiClient>,
    cache: Arc<QueryCache>,
    notifier: Arc<dyn Notifier>,
) -> ResourceStore<LeadsBackend> {
    ResourceStore::new(LeadsBackend { api }, cache, notifier)
}

/// Funnel rollup over fetched lead data.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LeadStats {
    pub total: usize,
    pub new: usize,
    pub followup_due: usize,
    pub ready_for_quote: usize,
    pub converted: usize,
    pub average_score: f64,
    pub conversion_rate: f64,
}

pub fn lead_stats(leads: &[Lead]) -> LeadStats {
    let mut stats = LeadStats {
        total: leads.len(),
        ..Default::default()
    };
    if leads.is_empty() {
        return stats;
    }
    let mut score_sum = 0u64;
    for lead in leads {
        score_sum += u64::from(lead.lead_score);
        match lead.status {
            LeadStatus::New => stats.new += 1,
            LeadStatus::CallFollowup => stats.followup_due += 1,
            LeadStatus::ReadyForQuote => stats.ready_for_quote += 1,
            LeadStatus::Convert => stats.converted += 1,
            LeadStatus::Unreachable | LeadStatus::Unqualified => {}
        }
    }
    stats.average_score = score_sum as f64 / leads.len() as f64;
    stats.conversion_rate = stats.converted as f64 / leads.len() as f64;
    stats
}
