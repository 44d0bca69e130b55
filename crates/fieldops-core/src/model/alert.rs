// ── Alert domain type ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::refs::{EquipmentRef, SiteRef};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlertKind {
    EquipmentFault,
    MaintenanceDue,
    SecurityBreach,
    PowerFailure,
    NetworkIssue,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// Alert lifecycle: active -> acknowledged -> resolved.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlertStatus {
    Active,
    Acknowledged,
    Resolved,
}

/// A system alert, optionally tied to a site and/or equipment unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub severity: Severity,
    pub status: AlertStatus,
    pub site_id: Option<Uuid>,
    pub equipment_id: Option<Uuid>,
    /// Profile id of whoever acknowledged the alert.
    pub acknowledged_by: Option<Uuid>,
    /// Profile id of whoever resolved the alert.
    pub resolved_by: Option<Uuid>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,

    #[serde(rename = "sites", skip_serializing_if = "Option::is_none", default)]
    pub site: Option<SiteRef>,
    #[serde(rename = "equipment", skip_serializing_if = "Option::is_none", default)]
    pub equipment: Option<EquipmentRef>,
}
