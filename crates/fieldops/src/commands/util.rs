//! Shared helpers for command handlers.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use fieldops_core::Controller;

use crate::error::CliError;

/// Parse a status/kind/priority flag into its domain enum.
pub fn parse_enum<T>(field: &str, raw: &str) -> Result<T, CliError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse().map_err(|e: T::Err| CliError::Validation {
        field: field.into(),
        reason: format!("'{raw}': {e}"),
    })
}

pub fn parse_uuid(field: &str, raw: &str) -> Result<Uuid, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("'{raw}' is not a UUID"),
    })
}

/// Parse an RFC 3339 timestamp flag.
pub fn parse_datetime(field: &str, raw: &str) -> Result<DateTime<Utc>, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("'{raw}' is not an RFC 3339 timestamp"),
    })
}

/// Parse a YYYY-MM-DD date flag.
pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("'{raw}' is not a YYYY-MM-DD date"),
    })
}

/// Resolve a site identifier (UUID or site code) via snapshot lookup.
pub fn resolve_site_id(controller: &Controller, identifier: &str) -> Result<Uuid, CliError> {
    if let Ok(id) = identifier.parse::<Uuid>() {
        return Ok(id);
    }
    let snap = controller.store().sites_snapshot();
    for site in snap.iter() {
        if site.code == identifier {
            return Ok(site.id);
        }
    }
    Err(CliError::NotFound {
        resource_type: "site".into(),
        identifier: identifier.into(),
        list_command: "sites list".into(),
    })
}

/// Resolve an equipment identifier (UUID or serial number) via snapshot lookup.
pub fn resolve_equipment_id(controller: &Controller, identifier: &str) -> Result<Uuid, CliError> {
    if let Ok(id) = identifier.parse::<Uuid>() {
        return Ok(id);
    }
    let snap = controller.store().equipment_snapshot();
    for unit in snap.iter() {
        if unit.serial_number == identifier {
            return Ok(unit.id);
        }
    }
    Err(CliError::NotFound {
        resource_type: "equipment".into(),
        identifier: identifier.into(),
        list_command: "equipment list".into(),
    })
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Reject an update where no field was set; the backend would receive an
/// empty PATCH body otherwise.
pub fn ensure_non_empty_update<T: serde::Serialize>(update: &T) -> Result<(), CliError> {
    let body = serde_json::to_value(update)?;
    if body.as_object().is_none_or(serde_json::Map::is_empty) {
        return Err(CliError::Validation {
            field: "update".into(),
            reason: "no fields to update; pass at least one flag".into(),
        });
    }
    Ok(())
}

/// Render an optional display value for table cells.
pub fn fmt_opt<T: Display>(value: Option<&T>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}
