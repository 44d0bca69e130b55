// ── Site domain type ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Operational status of a site.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SiteStatus {
    Active,
    Inactive,
    Maintenance,
    Fault,
}

/// Radio generation deployed at the site.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
pub enum SiteKind {
    #[serde(rename = "2G")]
    #[strum(serialize = "2G")]
    G2,
    #[serde(rename = "3G")]
    #[strum(serialize = "3G")]
    G3,
    #[serde(rename = "4G")]
    #[strum(serialize = "4G")]
    G4,
    #[serde(rename = "5G")]
    #[strum(serialize = "5G")]
    G5,
}

/// A network site (base station).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: Uuid,
    pub name: String,
    /// Short site code (e.g., "ALG-001").
    pub code: String,
    #[serde(rename = "type")]
    pub kind: SiteKind,
    pub status: SiteStatus,
    pub address: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Site {
    /// "City, Region" when both are known.
    pub fn location(&self) -> Option<String> {
        match (&self.city, &self.region) {
            (Some(city), Some(region)) => Some(format!("{city}, {region}")),
            _ => None,
        }
    }
}
