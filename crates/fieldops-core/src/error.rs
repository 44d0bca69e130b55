// ── Core error types ──
//
// User-facing errors from fieldops-core. These are NOT API-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<fieldops_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Backend disconnected")]
    BackendDisconnected,

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Entity not found: {entity_type} with id {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Operation rejected by backend: {message}")]
    Rejected { message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    /// A mutation for this record is already being processed. Duplicate
    /// submissions are rejected instead of queued.
    #[error("Operation already in flight for {entity_type} {identifier}")]
    OperationInFlight {
        entity_type: String,
        identifier: String,
    },

    #[error("Operation failed: {message}")]
    OperationFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// Backend error code (e.g. a Postgres SQLSTATE like "23505").
        code: Option<String>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<fieldops_api::Error> for CoreError {
    fn from(err: fieldops_api::Error) -> Self {
        match err {
            fieldops_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            fieldops_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            fieldops_api::Error::Api {
                status,
                code,
                message,
            } => {
                if status == 404 || status == 406 {
                    // PostgREST returns 406 for a `single()` select that
                    // matched zero rows.
                    CoreError::NotFound {
                        entity_type: "record".into(),
                        identifier: message,
                    }
                } else {
                    CoreError::Api {
                        message,
                        code,
                        status: Some(status),
                    }
                }
            }
            fieldops_api::Error::Decode { message } => {
                CoreError::Internal(format!("Decode error: {message}"))
            }
            fieldops_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            fieldops_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
        }
    }
}
