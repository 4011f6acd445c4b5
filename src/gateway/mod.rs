//! Backend transport abstraction.
//!
//! One trait, two implementations: [`mock::MockGateway`] synthesizes
//! responses from in-memory fixtures, [`http::HttpGateway`] performs real
//! HTTP calls. Which one a process uses is decided once at construction and
//! never changes for the client's lifetime.

pub mod fixtures;
pub mod http;
pub mod mock;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::envelope::ApiEnvelope;
use crate::token_store::TokenStore;

/// Transport mode, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Mock,
    Live,
}

/// Connection settings resolved once at startup.
#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    /// REST base URL; absent or empty means no backend is configured.
    pub base_url: Option<String>,
    /// Tenant slug sent as `X-Tenant-Id` on live requests.
    pub tenant: Option<String>,
}

impl GatewayConfig {
    /// Read `OPSDESK_API_URL` / `OPSDESK_TENANT` from the environment.
    pub fn from_env() -> Self {
        GatewayConfig {
            base_url: std::env::var("OPSDESK_API_URL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            tenant: std::env::var("OPSDESK_TENANT")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        }
    }

    /// Mock when no base URL is configured, and always in debug builds:
    /// the demo experience never depends on a reachable backend during
    /// development.
    pub fn mode(&self) -> TransportMode {
        let has_base = self
            .base_url
            .as_deref()
            .map(|u| !u.trim().is_empty())
            .unwrap_or(false);
        if !has_base || cfg!(debug_assertions) {
            TransportMode::Mock
        } else {
            TransportMode::Live
        }
    }
}

/// The four generic verbs every transport supports.
///
/// All methods resolve to an [`ApiEnvelope`]; transport failures are caught
/// and converted, never raised across this boundary.
#[async_trait]
pub trait BackendGateway: Send + Sync {
    fn mode(&self) -> TransportMode;

    async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> ApiEnvelope;

    async fn post(&self, endpoint: &str, body: Value) -> ApiEnvelope;

    async fn put(&self, endpoint: &str, body: Value) -> ApiEnvelope;

    async fn delete(&self, endpoint: &str) -> ApiEnvelope;
}

/// Build the gateway the configuration calls for.
pub fn build_gateway(
    config: &GatewayConfig,
    tokens: Arc<dyn TokenStore>,
) -> Arc<dyn BackendGateway> {
    match config.mode() {
        TransportMode::Mock => {
            log::info!("No backend configured; using mock transport");
            Arc::new(mock::MockGateway::new())
        }
        TransportMode::Live => {
            let base = config.base_url.clone().unwrap_or_default();
            log::info!("Using live transport against {}", base);
            Arc::new(http::HttpGateway::new(base, config.tenant.clone(), tokens))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_is_mock_without_base_url() {
        let config = GatewayConfig::default();
        assert_eq!(config.mode(), TransportMode::Mock);

        let config = GatewayConfig {
            base_url: Some("   ".into()),
            tenant: None,
        };
        assert_eq!(config.mode(), TransportMode::Mock);
    }

    #[test]
    fn test_mode_with_base_url_tracks_build_profile() {
        let config = GatewayConfig {
            base_url: Some("https://api.opsdesk.example".into()),
            tenant: None,
        };
        let expected = if cfg!(debug_assertions) {
            TransportMode::Mock
        } else {
            TransportMode::Live
        };
        assert_eq!(config.mode(), expected);
    }
}
