//! Async client for the fieldops hosted relational backend.
//!
//! The backend is a hosted Postgres exposed over a PostgREST-style REST
//! surface (`/rest/v1/{table}`) with a token-issuing auth service
//! (`/auth/v1/token`). Row-level security is enforced server-side per
//! authenticated user; this crate only carries identity (the `apikey`
//! header plus a bearer access token) and performs typed per-table
//! select/insert/update/delete calls.
//!
//! - [`RestClient`]: table operations, error-envelope handling
//! - [`SelectQuery`]: filter/order/limit/embed builder for selects
//! - [`AuthSession`]: result of a password-grant login
//! - [`TransportConfig`]: shared TLS/timeout settings for `reqwest`

pub mod auth;
pub mod client;
pub mod error;
pub mod transport;

pub use auth::AuthSession;
pub use client::{RestClient, SelectQuery};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
