//! Error types for the API and settings layers.
//!
//! Errors are classified by recoverability:
//! - Retryable: backend failures the caller may reasonably retry
//! - NonRetryable: decode mismatches, missing ids
//! - Terminal: unconfigured backend, a deliberate "not implemented" signal

use thiserror::Error;

/// Errors surfaced by the typed API client and the resource stores.
///
/// Expected backend failures (auth errors, 4xx) never reach this type as
/// panics or raw transport errors; the gateway normalizes them into failure
/// envelopes first, and the typed layer lifts those into `Backend`.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The gateway returned a failure envelope; carries the server message.
    #[error("{message}")]
    Backend { message: String },

    /// The envelope payload did not match the expected shape.
    #[error("Unexpected response shape: {0}")]
    Decode(String),

    /// Typed convenience methods are mock-only. Fixed signal, never retried.
    #[error("Backend API not configured")]
    NotConfigured,

    /// A detail query was issued with an empty id.
    #[error("Missing entity id")]
    MissingId,
}

impl ApiError {
    /// Returns true if this error is worth retrying.
    ///
    /// Only backend failures qualify, and even those are not retried
    /// automatically anywhere in this crate; retry policy belongs to the
    /// caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Backend { .. })
    }

    /// Build a `Backend` error from an envelope's message/error fields,
    /// falling back to the given default when the server said nothing.
    pub fn from_envelope(message: Option<String>, error: Option<String>, fallback: &str) -> Self {
        let message = message
            .or(error)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());
        ApiError::Backend { message }
    }
}

/// Errors from the settings persistence layer.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    Read(String),

    #[error("Failed to write settings: {0}")]
    Write(String),

    #[error("Failed to parse settings: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_configured_is_not_retryable() {
        assert!(!ApiError::NotConfigured.is_retryable());
        assert!(!ApiError::MissingId.is_retryable());
        assert!(ApiError::Backend {
            message: "boom".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_from_envelope_prefers_message() {
        let err = ApiError::from_envelope(
            Some("Client not found".into()),
            Some("NOT_FOUND".into()),
            "Failed to fetch client",
        );
        assert_eq!(err.to_string(), "Client not found");
    }

    #[test]
    fn test_from_envelope_falls_back() {
        let err = ApiError::from_envelope(None, Some("  ".into()), "Failed to fetch client");
        assert_eq!(err.to_string(), "Failed to fetch client");
    }
}
