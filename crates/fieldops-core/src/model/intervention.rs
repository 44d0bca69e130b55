// ── Intervention (maintenance task) domain type ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::refs::{EquipmentRef, ProfileRef, SiteRef};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InterventionKind {
    Preventive,
    Corrective,
    Installation,
    Replacement,
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
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InterventionStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

/// A scheduled or completed maintenance task against a site (and
/// optionally a specific piece of equipment).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intervention {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: InterventionKind,
    pub priority: Priority,
    pub status: InterventionStatus,
    pub site_id: Uuid,
    /// Target equipment, if the task is scoped to one unit.
    pub equipment_id: Option<Uuid>,
    /// Assigned technician's profile id, if any.
    pub assigned_to: Option<Uuid>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
    /// ISO 8601 duration as stored by the backend (e.g. "PT4H").
    pub estimated_duration: Option<String>,
    pub created_at: DateTime<Utc>,

    #[serde(rename = "sites", skip_serializing_if = "Option::is_none", default)]
    pub site: Option<SiteRef>,
    #[serde(rename = "equipment", skip_serializing_if = "Option::is_none", default)]
    pub equipment: Option<EquipmentRef>,
    #[serde(rename = "profiles", skip_serializing_if = "Option::is_none", default)]
    pub assignee: Option<ProfileRef>,
}

impl Intervention {
    /// Parse the estimated duration back to whole hours ("PT4H" -> 4).
    pub fn estimated_hours(&self) -> Option<u32> {
        let raw = self.estimated_duration.as_deref()?;
        raw.strip_prefix("PT")?.strip_suffix('H')?.parse().ok()
    }
}

/// Format whole hours as the ISO 8601 duration the backend stores.
pub fn duration_from_hours(hours: u32) -> String {
    format!("PT{hours}H")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn estimated_hours_round_trips() {
        assert_eq!(duration_from_hours(4), "PT4H");

        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "title": "Replace faulty antenna",
            "description": null,
            "type": "corrective",
            "priority": "high",
            "status": "scheduled",
            "site_id": Uuid::new_v4(),
            "equipment_id": null,
            "assigned_to": null,
            "scheduled_date": null,
            "completed_date": null,
            "estimated_duration": "PT4H",
            "created_at": "2025-06-01T08:00:00Z"
        });
        let intervention: Intervention = serde_json::from_value(json).unwrap();
        assert_eq!(intervention.estimated_hours(), Some(4));
    }

    #[test]
    fn priority_orders_low_to_critical() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::High < Priority::Critical);
    }
}
