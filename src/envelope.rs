//! Normalized response envelope.
//!
//! Every gateway call resolves to an [`ApiEnvelope`] regardless of transport
//! outcome. Callers check `success`; transport failures are converted, never
//! thrown across the gateway boundary.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// Pagination block attached to list responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl Pagination {
    /// Compute the pagination block for a collection of `total` records.
    ///
    /// `total_pages` is `ceil(total / limit)`; a zero limit is clamped to 1
    /// so the block stays well-formed on garbage input.
    pub fn for_slice(total: u64, page: u64, limit: u64) -> Self {
        let limit = limit.max(1);
        Pagination {
            total,
            page: page.max(1),
            limit,
            total_pages: total.div_ceil(limit),
        }
    }
}

/// The `{success, data, message, error, pagination}` wrapper returned by
/// every gateway call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl ApiEnvelope {
    pub fn ok(data: Value) -> Self {
        ApiEnvelope {
            success: true,
            data: Some(data),
            message: None,
            error: None,
            pagination: None,
        }
    }

    pub fn ok_with_pagination(data: Value, pagination: Pagination) -> Self {
        ApiEnvelope {
            success: true,
            data: Some(data),
            message: None,
            error: None,
            pagination: Some(pagination),
        }
    }

    pub fn ok_with_message(data: Value, message: &str) -> Self {
        ApiEnvelope {
            success: true,
            data: Some(data),
            message: Some(message.to_string()),
            error: None,
            pagination: None,
        }
    }

    pub fn failure(error: &str, message: &str) -> Self {
        ApiEnvelope {
            success: false,
            data: None,
            message: Some(message.to_string()),
            error: Some(error.to_string()),
            pagination: None,
        }
    }

    /// Lift the envelope into the typed world: a success envelope yields its
    /// payload, a failure envelope yields [`ApiError::Backend`] carrying the
    /// server message (or `fallback` when the server said nothing).
    pub fn into_result(self, fallback: &str) -> Result<(Value, Option<Pagination>), ApiError> {
        if self.success {
            Ok((self.data.unwrap_or(Value::Null), self.pagination))
        } else {
            Err(ApiError::from_envelope(self.message, self.error, fallback))
        }
    }
}

/// A typed page of entities, the list-query result shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    pub fn from_parts(data: Vec<T>, pagination: Pagination) -> Self {
        Paginated {
            data,
            total: pagination.total,
            page: pagination.page,
            limit: pagination.limit,
            total_pages: pagination.total_pages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
