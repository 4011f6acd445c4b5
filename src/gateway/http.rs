//! Live HTTP transport.
//!
//! Issues JSON requests against `{base_url}{endpoint}` with a fixed header
//! set and bearer auth when a token is stored. Any transport failure or
//! non-2xx status is converted into a failure envelope carrying the server's
//! message; nothing is raised across the gateway boundary. No retries here;
//! retry policy belongs to callers.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use url::Url;

use super::{BackendGateway, TransportMode};
use crate::envelope::ApiEnvelope;
use crate::token_store::TokenStore;

pub struct HttpGateway {
    http: reqwest::Client,
    base_url: String,
    tenant: Option<String>,
    tokens: Arc<dyn TokenStore>,
}

impl HttpGateway {
    pub fn new(base_url: String, tenant: Option<String>, tokens: Arc<dyn TokenStore>) -> Self {
        HttpGateway {
            http: reqwest::Client::new(),
            base_url,
            tenant,
            tokens,
        }
    }

    /// Join base and endpoint, attaching query parameters.
    fn endpoint_url(
        base_url: &str,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Url, String> {
        let joined = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );
        let mut url = Url::parse(&joined).map_err(|e| format!("Invalid URL {}: {}", joined, e))?;
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// Fold a 2xx response body into the normalized envelope.
    ///
    /// A body carrying a `data` field is treated as an envelope (missing
    /// `success` defaults to true); any other shape is the payload itself.
    fn normalize_body(value: Value) -> ApiEnvelope {
        if value.get("data").is_some() {
            let pagination = value
                .get("pagination")
                .and_then(|p| serde_json::from_value(p.clone()).ok());
            ApiEnvelope {
                success: value
                    .get("success")
                    .and_then(Value::as_bool)
                    .unwrap_or(true),
                data: value.get("data").cloned(),
                message: value
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                error: value
                    .get("error")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                pagination,
            }
        } else {
            ApiEnvelope::ok(value)
        }
    }

    /// Pull the server's message out of an error body, falling back to the
    /// status line.
    fn error_message(body: Option<&Value>, status: reqwest::StatusCode) -> String {
        body.and_then(|b| {
            b.get("message")
                .or_else(|| b.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()))
    }

    async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&str, String)],
        body: Option<Value>,
    ) -> ApiEnvelope {
        let url = match Self::endpoint_url(&self.base_url, endpoint, params) {
            Ok(url) => url,
            Err(e) => return ApiEnvelope::failure("BAD_URL", &e),
        };

        let mut request = self
            .http
            .request(method.clone(), url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json");

        if let Some(session) = self.tokens.load() {
            request = request.bearer_auth(session.token);
        }
        if let Some(ref tenant) = self.tenant {
            request = request.header("X-Tenant-Id", tenant);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("{} {} failed: {}", method, endpoint, e);
                return ApiEnvelope::failure("NETWORK_ERROR", &format!("Request failed: {}", e));
            }
        };

        let status = response.status();
        let parsed: Option<Value> = response.json().await.ok();

        if !status.is_success() {
            let message = Self::error_message(parsed.as_ref(), status);
            log::debug!("{} {} -> {}: {}", method, endpoint, status, message);
            return ApiEnvelope::failure(&format!("HTTP {}", status.as_u16()), &message);
        }

        match parsed {
            Some(value) => Self::normalize_body(value),
            None => ApiEnvelope::failure("BAD_RESPONSE", "Response was not valid JSON"),
        }
    }
}

#[async_trait]
impl BackendGateway for HttpGateway {
    fn mode(&self) -> TransportMode {
        TransportMode::Live
    }

    async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> ApiEnvelope {
        self.execute(Method::GET, endpoint, params, None).await
    }

    async fn post(&self, endpoint: &str, body: Value) -> ApiEnvelope {
        self.execute(Method::POST, endpoint, &[], Some(body)).await
    }

    async fn put(&self, endpoint: &str, body: Value) -> ApiEnvelope {
        self.execute(Method::PUT, endpoint, &[], Some(body)).await
    }

    async fn delete(&self, endpoint: &str) -> ApiEnvelope {
        self.execute(Method::DELETE, endpoint, &[], None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_url_joins_and_adds_params() {
        let url = HttpGateway::endpoint_url(
            "https://api.opsdesk.example/v1/",
            "/clients",
            &[("page", "2".to_string()), ("search", "acme co".to_string())],
        )
        .unwrap();
        assert_eq!(url.path(), "/v1/clients");
        let query = url.query().unwrap();
        assert!(query.contains("page=2"));
        assert!(query.contains("search=acme+co"));
    }

    #[test]
    fn test_normalize_body_with_envelope_shape() {
        let env = HttpGateway::normalize_body(json!({
            "data": [{"id": "c-1"}],
            "message": "ok",
            "pagination": {"total": 1, "page": 1, "limit": 10, "totalPages": 1}
        }));
        assert!(env.success);
        assert_eq!(env.message.as_deref(), Some("ok"));
        assert_eq!(env.pagination.unwrap().total, 1);
    }

    #[test]
    fn test_normalize_body_without_data_is_payload() {
        let env = HttpGateway::normalize_body(json!({"id": "c-1", "clientName": "Acme"}));
        assert!(env.success);
        assert_eq!(env.data.unwrap()["clientName"], "Acme");
    }

    #[test]
    fn test_error_message_prefers_server_message() {
        let body = json!({"message": "Token expired"});
        let msg = HttpGateway::error_message(Some(&body), reqwest::StatusCode::UNAUTHORIZED);
        assert_eq!(msg, "Token expired");

        let msg = HttpGateway::error_message(None, reqwest::StatusCode::BAD_GATEWAY);
        assert_eq!(msg, "Request failed with status 502");
    }
}
