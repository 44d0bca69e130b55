// ── Runtime connection configuration ──
//
// These types describe *how* to reach the hosted backend. They carry
// credential data and connection tuning, but never touch disk. The CLI
// constructs a `BackendConfig` and hands it in.

use secrecy::SecretString;
use url::Url;

/// How to authenticate with the backend.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// Email/password login via the token service. Most operations need
    /// this: row-level security denies writes to anonymous sessions.
    Password {
        email: String,
        password: SecretString,
    },
    /// Anonymous: apikey only. Read access is limited to whatever the
    /// backend policies expose publicly.
    Anonymous,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict). Default for hosted backends.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-hosted backends with self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for connecting to a single backend project.
///
/// Built by the CLI, passed to `Controller` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Project URL (e.g., `https://abc.supabase.co`).
    pub url: Url,
    /// Project anon key, sent as the `apikey` header on every request.
    pub anon_key: SecretString,
    /// Authentication method and credentials.
    pub auth: AuthCredentials,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: std::time::Duration,
    /// How often to perform a full refresh (seconds). 0 = never.
    pub refresh_interval_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: Url::parse("https://localhost:54321").expect("static URL"),
            anon_key: SecretString::from(String::new()),
            auth: AuthCredentials::Anonymous,
            tls: TlsVerification::default(),
            timeout: std::time::Duration::from_secs(30),
            refresh_interval_secs: 0,
        }
    }
}
