//! API error taxonomy.

use thiserror::Error;

/// Errors surfaced by the backend client.
#[derive(Debug, Error)]
pub enum Error {
    /// Network-level failure (DNS, connect, timeout, TLS handshake).
    #[error("transport error: {0}")]
    Transport(reqwest::Error),

    /// The session is missing, expired, or the credentials were rejected.
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// The backend rejected the request (constraint violation, RLS denial,
    /// unknown table/column). `code` is the backend's error code when the
    /// error body could be parsed.
    #[error("backend error (HTTP {status}): {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// A response body did not match the expected shape.
    #[error("failed to decode response: {message}")]
    Decode { message: String },

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("TLS configuration error: {0}")]
    Tls(String),
}
