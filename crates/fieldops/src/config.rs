//! CLI configuration: thin wrapper around `fieldops_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--backend, --anon-key, --email).

use std::time::Duration;

use secrecy::SecretString;

use fieldops_core::{AuthCredentials, BackendConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use fieldops_config::{
    Config, Profile, config_path, load_config_or_default, resolve_anon_key, resolve_auth,
    resolve_password, save_config,
};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `BackendConfig` from the config file, profile, and CLI overrides.
pub fn build_backend_config(global: &GlobalOpts) -> Result<BackendConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    // If a profile exists, use it with CLI flag overrides
    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, global);
    }

    // No profile found -- try to build from CLI flags / env vars alone
    let url_str = global.backend.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;
    let url = parse_backend_url(url_str)?;

    let anon_key = global
        .anon_key
        .as_deref()
        .map(SecretString::from)
        .ok_or_else(|| CliError::NoCredentials {
            profile: profile_name.clone(),
        })?;

    let auth = match global.email {
        Some(ref email) => {
            let password = std::env::var("FIELDOPS_PASSWORD")
                .map(SecretString::from)
                .map_err(|_| CliError::NoCredentials {
                    profile: profile_name,
                })?;
            AuthCredentials::Password {
                email: email.clone(),
                password,
            }
        }
        None => AuthCredentials::Anonymous,
    };

    let tls = if global.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(BackendConfig {
        url,
        anon_key,
        auth,
        tls,
        timeout: Duration::from_secs(global.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        refresh_interval_secs: 0,
    })
}

/// Translate a `Profile` + global flags into a `BackendConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<BackendConfig, CliError> {
    // 1. Backend URL (flag > env > profile)
    let url_str = global.backend.as_deref().unwrap_or(&profile.backend);
    let url = parse_backend_url(url_str)?;

    // 2. Anon key (CLI flag takes priority)
    let anon_key = match global.anon_key {
        Some(ref key) => SecretString::from(key.clone()),
        None => resolve_anon_key(profile, profile_name)?,
    };

    // 3. Auth credentials. An email on the command line forces password
    //    auth even for a profile configured as anonymous.
    let auth = match global.email {
        Some(ref email) => {
            let password = resolve_password(profile, profile_name)?;
            AuthCredentials::Password {
                email: email.clone(),
                password,
            }
        }
        None => resolve_auth(profile, profile_name)?,
    };

    // 4. TLS verification
    let tls = if global.insecure || profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    // 5. Timeout (flag > profile > default)
    let timeout_secs = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    Ok(BackendConfig {
        url,
        anon_key,
        auth,
        tls,
        timeout: Duration::from_secs(timeout_secs),
        refresh_interval_secs: 0,
    })
}

fn parse_backend_url(url_str: &str) -> Result<url::Url, CliError> {
    url_str.parse().map_err(|_| CliError::Validation {
        field: "backend".into(),
        reason: format!("invalid URL: {url_str}"),
    })
}
