// ── Equipment domain type ──

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::refs::SiteRef;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EquipmentStatus {
    Operational,
    Faulty,
    Maintenance,
    Offline,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EquipmentKind {
    Antenna,
    Transmitter,
    Receiver,
    Amplifier,
    PowerSupply,
    Cooling,
    Other,
}

/// A piece of hardware installed at a site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equipment {
    pub id: Uuid,
    pub name: String,
    pub serial_number: String,
    #[serde(rename = "type")]
    pub kind: EquipmentKind,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub status: EquipmentStatus,
    pub site_id: Uuid,
    pub installation_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,

    /// Populated when the select embeds `sites(name,code)`.
    #[serde(rename = "sites", skip_serializing_if = "Option::is_none", default)]
    pub site: Option<SiteRef>,
}
