// Backend REST client
//
// Wraps `reqwest::Client` with PostgREST-style URL construction, the
// `apikey` / bearer header pair, and error-envelope unwrapping. Table
// operations are generic over the row type; callers pick columns and
// embedded relations through `SelectQuery`.

use std::fmt::Display;
use std::sync::{Arc, RwLock};

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Backend errors arrive as a JSON body alongside a 4xx/5xx status.
#[derive(serde::Deserialize)]
struct ErrorEnvelope {
    message: Option<String>,
    code: Option<String>,
    hint: Option<String>,
}

/// Query builder for table selects: column projection (including embedded
/// related tables, e.g. `*,sites(name,code)`), equality filters, ordering,
/// and a row limit.
#[derive(Debug, Clone, Default)]
pub struct SelectQuery {
    columns: Option<String>,
    filters: Vec<(String, String)>,
    order: Option<String>,
    limit: Option<u32>,
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Project specific columns. Embedded relations use the backend's
    /// `relation(cols)` syntax. Defaults to `*` when not set.
    pub fn columns(mut self, cols: impl Into<String>) -> Self {
        self.columns = Some(cols.into());
        self
    }

    /// Add an equality filter on a column.
    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.filters.push((column.to_owned(), format!("eq.{value}")));
        self
    }

    /// Order by a column, ascending.
    pub fn order_asc(mut self, column: &str) -> Self {
        self.order = Some(column.to_owned());
        self
    }

    /// Order by a column, descending.
    pub fn order_desc(mut self, column: &str) -> Self {
        self.order = Some(format!("{column}.desc"));
        self
    }

    /// Cap the number of returned rows.
    pub fn limit(mut self, n: u32) -> Self {
        self.limit = Some(n);
        self
    }

    fn apply(&self, url: &mut Url) {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("select", self.columns.as_deref().unwrap_or("*"));
        for (column, predicate) in &self.filters {
            pairs.append_pair(column, predicate);
        }
        if let Some(ref order) = self.order {
            pairs.append_pair("order", order);
        }
        if let Some(limit) = self.limit {
            pairs.append_pair("limit", &limit.to_string());
        }
    }
}

/// HTTP client for the hosted backend's REST and auth surfaces.
///
/// Every request carries the project `apikey` header; the Authorization
/// bearer is the user's access token once a session exists, otherwise the
/// anon key (row-level security then restricts reads accordingly).
#[derive(Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
    anon_key: SecretString,
    access_token: Arc<RwLock<Option<SecretString>>>,
}

impl RestClient {
    /// Create a new client from a `TransportConfig`. The `base_url` is the
    /// project root (e.g. `https://abc.supabase.co`).
    pub fn new(
        base_url: Url,
        anon_key: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            anon_key,
            access_token: Arc::new(RwLock::new(None)),
        })
    }

    /// Create a client with a pre-built `reqwest::Client` (tests).
    pub fn with_client(http: reqwest::Client, base_url: Url, anon_key: SecretString) -> Self {
        Self {
            http,
            base_url,
            anon_key,
            access_token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Store the session access token used on all subsequent requests.
    pub fn set_access_token(&self, token: SecretString) {
        *self.access_token.write().expect("token lock poisoned") = Some(token);
    }

    /// Drop the session access token (requests fall back to the anon key).
    pub fn clear_access_token(&self) {
        *self.access_token.write().expect("token lock poisoned") = None;
    }

    pub fn has_session(&self) -> bool {
        self.access_token
            .read()
            .expect("token lock poisoned")
            .is_some()
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a REST URL for a table: `{base}/rest/v1/{table}`.
    pub(crate) fn rest_url(&self, table: &str) -> Url {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/rest/v1/{table}")).expect("invalid REST URL")
    }

    /// Build an auth service URL: `{base}/auth/v1/{path}`.
    pub(crate) fn auth_url(&self, path: &str) -> Url {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/auth/v1/{path}")).expect("invalid auth URL")
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Apply the `apikey` and bearer headers to a request builder.
    pub(crate) fn apply_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.access_token.read().expect("token lock poisoned");
        let bearer = guard
            .as_ref()
            .map_or_else(|| self.anon_key.expose_secret(), ExposeSecret::expose_secret);
        builder
            .header("apikey", self.anon_key.expose_secret())
            .bearer_auth(bearer)
    }

    // ── Table operations ─────────────────────────────────────────────

    /// Select rows from a table.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &SelectQuery,
    ) -> Result<Vec<T>, Error> {
        let mut url = self.rest_url(table);
        query.apply(&mut url);
        debug!("GET {}", url);

        let resp = self
            .apply_auth(self.http.get(url))
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::parse_json(resp).await
    }

    /// Select a single row by id. The backend returns 406 when zero or more
    /// than one row matches, which surfaces as an `Error::Api`.
    pub async fn select_single<T: DeserializeOwned>(
        &self,
        table: &str,
        id: &Uuid,
        columns: &str,
    ) -> Result<T, Error> {
        let mut url = self.rest_url(table);
        url.query_pairs_mut()
            .append_pair("select", columns)
            .append_pair("id", &format!("eq.{id}"));
        debug!("GET {} (single)", url);

        let resp = self
            .apply_auth(self.http.get(url))
            .header("Accept", "application/vnd.pgrst.object+json")
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::parse_json(resp).await
    }

    /// Insert one row, returning the created representation.
    pub async fn insert<T: DeserializeOwned>(
        &self,
        table: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.rest_url(table);
        debug!("POST {}", url);

        let resp = self
            .apply_auth(self.http.post(url).json(body))
            .header("Prefer", "return=representation")
            .header("Accept", "application/vnd.pgrst.object+json")
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::parse_json(resp).await
    }

    /// Partially update a row by id, returning the updated representation.
    pub async fn update_by_id<T: DeserializeOwned>(
        &self,
        table: &str,
        id: &Uuid,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let mut url = self.rest_url(table);
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
        debug!("PATCH {}", url);

        let resp = self
            .apply_auth(self.http.patch(url).json(body))
            .header("Prefer", "return=representation")
            .header("Accept", "application/vnd.pgrst.object+json")
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::parse_json(resp).await
    }

    /// Delete a row by id.
    pub async fn delete_by_id(&self, table: &str, id: &Uuid) -> Result<(), Error> {
        let mut url = self.rest_url(table);
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
        debug!("DELETE {}", url);

        let resp = self
            .apply_auth(self.http.delete(url))
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::check_status(resp).await?;
        Ok(())
    }

    /// Count rows in a table without fetching them. Uses a HEAD request
    /// with `Prefer: count=exact`; the total comes back in `Content-Range`
    /// (`*/N`).
    pub async fn count(&self, table: &str) -> Result<u64, Error> {
        let mut url = self.rest_url(table);
        url.query_pairs_mut().append_pair("select", "id");
        debug!("HEAD {} (count)", url);

        let resp = self
            .apply_auth(self.http.head(url))
            .header("Prefer", "count=exact")
            .send()
            .await
            .map_err(Error::Transport)?;

        let resp = Self::check_status(resp).await?;
        parse_content_range_total(resp.headers())
    }

    // ── Response handling ────────────────────────────────────────────

    /// Surface non-success statuses as typed errors, passing the response
    /// through untouched otherwise.
    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "session expired or invalid credentials".into(),
            });
        }

        let body = resp.text().await.unwrap_or_default();
        let envelope: Option<ErrorEnvelope> = serde_json::from_str(&body).ok();
        let (message, code) = match envelope {
            Some(env) => {
                let mut message = env.message.unwrap_or_else(|| body.clone());
                if let Some(hint) = env.hint {
                    message = format!("{message} ({hint})");
                }
                (message, env.code)
            }
            None => (body, None),
        };
        Err(Error::Api {
            status: status.as_u16(),
            code,
            message,
        })
    }

    async fn parse_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let resp = Self::check_status(resp).await?;
        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| Error::Decode {
            message: format!("{e}: {body}"),
        })
    }
}

/// Extract the total from a `Content-Range: */N` (or `0-9/N`) header.
fn parse_content_range_total(headers: &HeaderMap) -> Result<u64, Error> {
    let raw = headers
        .get(reqwest::header::CONTENT_RANGE)
        .and_then(|v: &HeaderValue| v.to_str().ok())
        .ok_or_else(|| Error::Decode {
            message: "missing Content-Range header on count response".into(),
        })?;
    let total = raw.rsplit('/').next().ok_or_else(|| Error::Decode {
        message: format!("malformed Content-Range: {raw}"),
    })?;
    total.parse().map_err(|_| Error::Decode {
        message: format!("malformed Content-Range total: {raw}"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn select_query_defaults_to_star() {
        let mut url = Url::parse("https://example.test/rest/v1/sites").unwrap();
        SelectQuery::new().apply(&mut url);
        assert_eq!(url.query(), Some("select=*"));
    }

    #[test]
    fn select_query_builds_filters_order_and_limit() {
        let mut url = Url::parse("https://example.test/rest/v1/alerts").unwrap();
        SelectQuery::new()
            .columns("*,sites(name,code)")
            .eq("status", "active")
            .order_desc("created_at")
            .limit(5)
            .apply(&mut url);
        let query = url.query().unwrap();
        assert!(query.contains("sites%28name%2Ccode%29"));
        assert!(query.contains("status=eq.active"));
        assert!(query.contains("order=created_at.desc"));
        assert!(query.contains("limit=5"));
    }

    #[test]
    fn content_range_total_parses_star_form() {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_RANGE,
            HeaderValue::from_static("*/42"),
        );
        assert_eq!(parse_content_range_total(&headers).unwrap(), 42);
    }

    #[test]
    fn content_range_total_parses_span_form() {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_RANGE,
            HeaderValue::from_static("0-24/3573"),
        );
        assert_eq!(parse_content_range_total(&headers).unwrap(), 3573);
    }
}
