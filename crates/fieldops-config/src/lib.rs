//! Shared configuration for the fieldops CLI and resource server.
//!
//! TOML profiles, credential resolution (keyring + env + plaintext),
//! and translation to `fieldops_core::BackendConfig`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use fieldops_core::{AuthCredentials, BackendConfig, TlsVerification};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named backend profile.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// Backend project URL (e.g., "https://abc.supabase.co").
    pub backend: String,

    /// Project anon key (safe to store in plaintext -- it is the public
    /// client key, not a credential).
    pub anon_key: Option<String>,

    /// Environment variable name containing the anon key.
    pub anon_key_env: Option<String>,

    /// Email for password auth. Absent = anonymous session.
    pub email: Option<String>,

    /// Password (plaintext -- prefer keyring or FIELDOPS_PASSWORD).
    pub password: Option<String>,

    /// Path to custom CA certificate (self-hosted backends).
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "fieldops", "fieldops").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("fieldops");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("FIELDOPS_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve the project anon key: env var indirection, then plaintext.
pub fn resolve_anon_key(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    if let Some(ref env_name) = profile.anon_key_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    if let Some(ref key) = profile.anon_key {
        return Ok(SecretString::from(key.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve the account password: FIELDOPS_PASSWORD env, then keyring,
/// then plaintext in the config file.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    if let Ok(pw) = std::env::var("FIELDOPS_PASSWORD") {
        return Ok(SecretString::from(pw));
    }

    if let Ok(entry) = keyring::Entry::new("fieldops", &format!("{profile_name}/password")) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve `AuthCredentials` from a profile. An email means password
/// auth; no email means an anonymous session.
pub fn resolve_auth(profile: &Profile, profile_name: &str) -> Result<AuthCredentials, ConfigError> {
    match profile.email {
        Some(ref email) => {
            let password = resolve_password(profile, profile_name)?;
            Ok(AuthCredentials::Password {
                email: email.clone(),
                password,
            })
        }
        None => Ok(AuthCredentials::Anonymous),
    }
}

/// Build a `BackendConfig` from a profile, with no CLI flag overrides.
pub fn profile_to_backend_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<BackendConfig, ConfigError> {
    let url: url::Url = profile
        .backend
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "backend".into(),
            reason: format!("invalid URL: {}", profile.backend),
        })?;

    let anon_key = resolve_anon_key(profile, profile_name)?;
    let auth = resolve_auth(profile, profile_name)?;

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(30));

    Ok(BackendConfig {
        url,
        anon_key,
        auth,
        tls,
        timeout,
        refresh_interval_secs: 0,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn profile(email: Option<&str>) -> Profile {
        Profile {
            backend: "https://abc.supabase.co".into(),
            anon_key: Some("anon-key".into()),
            anon_key_env: None,
            email: email.map(String::from),
            password: Some("hunter2".into()),
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }

    #[test]
    fn profile_without_email_resolves_anonymous() {
        let auth = resolve_auth(&profile(None), "default").unwrap();
        assert!(matches!(auth, AuthCredentials::Anonymous));
    }

    #[test]
    fn profile_with_email_resolves_password_auth() {
        let auth = resolve_auth(&profile(Some("tech@example.com")), "default").unwrap();
        match auth {
            AuthCredentials::Password { email, .. } => assert_eq!(email, "tech@example.com"),
            AuthCredentials::Anonymous => panic!("expected password auth"),
        }
    }

    #[test]
    fn missing_anon_key_is_an_error() {
        let mut p = profile(None);
        p.anon_key = None;
        let err = resolve_anon_key(&p, "default").unwrap_err();
        assert!(matches!(err, ConfigError::NoCredentials { .. }));
    }

    #[test]
    fn invalid_backend_url_is_a_validation_error() {
        let mut p = profile(None);
        p.backend = "not a url".into();
        let err = profile_to_backend_config(&p, "default").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }
}
