//! Config command handlers: guided setup, inspection, and profile switching.

use dialoguer::{Confirm, Input};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

const KEYRING_SERVICE: &str = "fieldops";

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),
        ConfigCommand::Show => show(global),
        ConfigCommand::Set {
            key,
            value,
            profile,
        } => set_field(&key, &value, profile, global),
        ConfigCommand::Profiles => profiles(global),
        ConfigCommand::Use { name } => use_profile(&name, global),
        ConfigCommand::SetPassword { profile } => set_password(profile, global),
    }
}

// ── Init ────────────────────────────────────────────────────────────

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();

    let name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(io_err)?;

    let backend: String = Input::new()
        .with_prompt("Backend project URL (e.g. https://abc.supabase.co)")
        .interact_text()
        .map_err(io_err)?;
    // Validate before persisting
    let _: url::Url = backend.parse().map_err(|_| CliError::Validation {
        field: "backend".into(),
        reason: format!("invalid URL: {backend}"),
    })?;

    let anon_key: String = Input::new()
        .with_prompt("Project anon key")
        .interact_text()
        .map_err(io_err)?;

    let email: String = Input::new()
        .with_prompt("Sign-in email (blank for anonymous, read-only access)")
        .allow_empty(true)
        .interact_text()
        .map_err(io_err)?;
    let email = (!email.is_empty()).then_some(email);

    if email.is_some() {
        let store = Confirm::new()
            .with_prompt("Store the password in the system keyring now?")
            .default(true)
            .interact()
            .map_err(io_err)?;
        if store {
            store_keyring_password(&name)?;
        }
    }

    cfg.profiles.insert(
        name.clone(),
        Profile {
            backend,
            anon_key: Some(anon_key),
            anon_key_env: None,
            email,
            password: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
        },
    );
    cfg.default_profile = Some(name);
    config::save_config(&cfg)?;

    if !global.quiet {
        eprintln!("Configuration written to {}", config::config_path().display());
    }
    Ok(())
}

// ── Show ────────────────────────────────────────────────────────────

fn show(global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();
    mask_passwords(&mut cfg);

    let rendered = toml::to_string_pretty(&cfg).map_err(|e| CliError::Config {
        message: e.to_string(),
    })?;
    output::emit(rendered.trim_end(), global.quiet);
    Ok(())
}

/// Plaintext passwords never leave the config file through `show`.
fn mask_passwords(cfg: &mut Config) {
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some("***".into());
        }
    }
}

// ── Set ─────────────────────────────────────────────────────────────

/// Set a single profile field non-interactively.
fn set_field(
    key: &str,
    value: &str,
    profile: Option<String>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();
    let name = profile
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into());

    let Some(entry) = cfg.profiles.get_mut(&name) else {
        return Err(profile_not_found(&cfg, &name));
    };
    apply_field(entry, key, value)?;
    config::save_config(&cfg)?;

    if !global.quiet {
        eprintln!("Set {key} for profile '{name}'");
    }
    Ok(())
}

fn apply_field(entry: &mut Profile, key: &str, value: &str) -> Result<(), CliError> {
    match key {
        "backend" => {
            let _: url::Url = value.parse().map_err(|_| CliError::Validation {
                field: "backend".into(),
                reason: format!("invalid URL: {value}"),
            })?;
            entry.backend = value.to_owned();
        }
        "anon-key" => entry.anon_key = Some(value.to_owned()),
        "anon-key-env" => entry.anon_key_env = Some(value.to_owned()),
        "email" => entry.email = Some(value.to_owned()),
        "ca-cert" => entry.ca_cert = Some(value.into()),
        "insecure" => {
            entry.insecure = Some(value.parse().map_err(|_| CliError::Validation {
                field: "insecure".into(),
                reason: format!("expected true or false, got: {value}"),
            })?);
        }
        "timeout" => {
            entry.timeout = Some(value.parse().map_err(|_| CliError::Validation {
                field: "timeout".into(),
                reason: format!("expected seconds as an integer, got: {value}"),
            })?);
        }
        "password" => {
            return Err(CliError::Validation {
                field: "key".into(),
                reason: "passwords go in the keyring; use 'fieldops config set-password'".into(),
            });
        }
        other => {
            return Err(CliError::Validation {
                field: "key".into(),
                reason: format!(
                    "unknown field '{other}'; expected one of backend, anon-key, \
                     anon-key-env, email, ca-cert, insecure, timeout"
                ),
            });
        }
    }
    Ok(())
}

fn profile_not_found(cfg: &Config, name: &str) -> CliError {
    let mut available: Vec<&String> = cfg.profiles.keys().collect();
    available.sort();
    CliError::ProfileNotFound {
        name: name.to_owned(),
        available: available
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

// ── Profiles ────────────────────────────────────────────────────────

fn profiles(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let default = cfg.default_profile.as_deref().unwrap_or("default");

    let mut names: Vec<&String> = cfg.profiles.keys().collect();
    names.sort();

    let lines: Vec<String> = names
        .iter()
        .map(|name| {
            let marker = if name.as_str() == default { "*" } else { " " };
            format!("{marker} {name}")
        })
        .collect();
    output::emit(&lines.join("\n"), global.quiet);
    Ok(())
}

fn use_profile(name: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();
    if !cfg.profiles.contains_key(name) {
        return Err(profile_not_found(&cfg, name));
    }
    cfg.default_profile = Some(name.to_owned());
    config::save_config(&cfg)?;
    if !global.quiet {
        eprintln!("Default profile set to '{name}'");
    }
    Ok(())
}

// ── Passwords ───────────────────────────────────────────────────────

fn set_password(profile: Option<String>, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let name = profile
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into());

    store_keyring_password(&name)?;
    if !global.quiet {
        eprintln!("Password stored in keyring for profile '{name}'");
    }
    Ok(())
}

fn store_keyring_password(profile_name: &str) -> Result<(), CliError> {
    let password = rpassword::prompt_password("Password: ")?;
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))?;
    entry.set_password(&password)?;
    Ok(())
}

fn io_err(e: dialoguer::Error) -> CliError {
    CliError::Io(std::io::Error::other(e))
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile {
            backend: "https://abc.supabase.co".into(),
            anon_key: None,
            anon_key_env: None,
            email: None,
            password: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }

    #[test]
    fn set_backend_validates_url() {
        let mut entry = profile();
        apply_field(&mut entry, "backend", "https://xyz.supabase.co").expect("valid URL");
        assert_eq!(entry.backend, "https://xyz.supabase.co");

        let err = apply_field(&mut entry, "backend", "not a url");
        assert!(matches!(err, Err(CliError::Validation { .. })));
        assert_eq!(entry.backend, "https://xyz.supabase.co");
    }

    #[test]
    fn set_parses_typed_fields() {
        let mut entry = profile();
        apply_field(&mut entry, "insecure", "true").expect("bool");
        apply_field(&mut entry, "timeout", "120").expect("u64");

        assert_eq!(entry.insecure, Some(true));
        assert_eq!(entry.timeout, Some(120));

        assert!(apply_field(&mut entry, "insecure", "maybe").is_err());
        assert!(apply_field(&mut entry, "timeout", "soon").is_err());
    }

    #[test]
    fn set_rejects_unknown_and_password_keys() {
        let mut entry = profile();
        assert!(matches!(
            apply_field(&mut entry, "favorite-color", "blue"),
            Err(CliError::Validation { .. })
        ));
        assert!(matches!(
            apply_field(&mut entry, "password", "hunter2"),
            Err(CliError::Validation { .. })
        ));
        assert!(entry.password.is_none());
    }
}
