// Auth service: password-grant login against /auth/v1/token.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::client::RestClient;
use crate::error::Error;

/// An authenticated session returned by a password-grant login.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub access_token: SecretString,
    pub user_id: Uuid,
    pub email: String,
    /// Seconds until the access token expires.
    pub expires_in: u64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
    user: TokenUser,
}

#[derive(Deserialize)]
struct TokenUser {
    id: Uuid,
    email: String,
}

#[derive(Deserialize)]
struct AuthErrorBody {
    #[serde(alias = "error_description", alias = "msg")]
    message: Option<String>,
}

impl RestClient {
    /// Exchange email/password credentials for an access token and store the
    /// token on the client for subsequent requests.
    pub async fn login_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthSession, Error> {
        let mut url = self.auth_url("token");
        url.query_pairs_mut().append_pair("grant_type", "password");
        debug!("POST {} (login {})", url, email);

        let resp = self
            .apply_auth(self.http().post(url).json(&serde_json::json!({
                "email": email,
                "password": password.expose_secret(),
            })))
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AuthErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| format!("login rejected (HTTP {})", status.as_u16()));
            return Err(Error::Authentication { message });
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| Error::Decode { message: e.to_string() })?;

        let access_token = SecretString::from(token.access_token);
        self.set_access_token(access_token.clone());

        Ok(AuthSession {
            access_token,
            user_id: token.user.id,
            email: token.user.email,
            expires_in: token.expires_in,
        })
    }

    /// Revoke the current session server-side and clear the stored token.
    /// A missing session is not an error.
    pub async fn logout(&self) -> Result<(), Error> {
        if !self.has_session() {
            return Ok(());
        }
        let url = self.auth_url("logout");
        debug!("POST {} (logout)", url);

        let resp = self
            .apply_auth(self.http().post(url))
            .send()
            .await
            .map_err(Error::Transport)?;
        // Best effort: the token is cleared locally even if revocation fails.
        self.clear_access_token();

        let status = resp.status();
        if status.is_success() || status == reqwest::StatusCode::UNAUTHORIZED {
            Ok(())
        } else {
            Err(Error::Api {
                status: status.as_u16(),
                code: None,
                message: "logout failed".into(),
            })
        }
    }
}
