//! opsdesk: tenant-scoped data core for a business-management dashboard.
//!
//! Three cooperating layers:
//! - a [`gateway`] abstracting mock vs live transport behind one trait,
//! - a typed [`client::ApiClient`] plus cached per-entity [`resources`]
//!   stores with a uniform invalidation and notification contract,
//! - a persisted [`settings::SettingsManager`] behind a pluggable store.
//!
//! UI components consume the resource stores; they never touch the API
//! client or the gateway directly.

pub mod client;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod resources;
pub mod settings;
pub mod store;
pub mod token_store;
pub mod types;
pub mod validation;

pub use client::{ApiClient, ListFilters};
pub use envelope::{ApiEnvelope, Paginated, Pagination};
pub use error::{ApiError, SettingsError};
pub use gateway::{build_gateway, BackendGateway, GatewayConfig, TransportMode};
pub use settings::{SettingsManager, SystemSettings};
pub use store::cache::QueryCache;
pub use store::notify::{LogNotifier, Notifier};
pub use store::{Resource, ResourceBackend, ResourceStore};
