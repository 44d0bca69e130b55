// ── Report aggregation ──
//
// Status breakdowns, the six-month maintenance trend, and the summary
// statistics block. All functions are pure: they take entity slices and
// a clock value, never the network.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Months, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::model::{
    Alert, AlertStatus, Equipment, EquipmentStatus, Intervention, InterventionStatus, Severity,
    Site, SiteStatus,
};

// Chart palette, shared across breakdowns.
pub const COLOR_GREEN: &str = "#22c55e";
pub const COLOR_YELLOW: &str = "#eab308";
pub const COLOR_GRAY: &str = "#6b7280";
pub const COLOR_RED: &str = "#ef4444";
pub const COLOR_BLUE: &str = "#3b82f6";
pub const COLOR_AMBER: &str = "#f59e0b";

/// One labelled bucket of a status breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSlice {
    pub name: &'static str,
    pub value: usize,
    pub color: &'static str,
}

/// One month of the maintenance trend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyMaintenance {
    /// Short month plus two-digit year, e.g. "Jun 25".
    pub month: String,
    pub scheduled: usize,
    pub completed: usize,
    pub total: usize,
}

/// Headline counters for the overview cards and the full report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub total_sites: usize,
    pub active_sites: usize,
    pub total_equipment: usize,
    pub operational_equipment: usize,
    pub total_interventions: usize,
    pub completed_interventions: usize,
    pub total_alerts: usize,
    pub active_alerts: usize,
}

/// Share of `part` in `total` as a percentage. A zero total counts as one,
/// so an empty collection reports 0% rather than dividing by zero.
pub fn percentage(part: usize, total: usize) -> f64 {
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    {
        (part as f64 / total.max(1) as f64) * 100.0
    }
}

pub fn summary_stats(
    sites: &[Arc<Site>],
    equipment: &[Arc<Equipment>],
    interventions: &[Arc<Intervention>],
    alerts: &[Arc<Alert>],
) -> SummaryStats {
    SummaryStats {
        total_sites: sites.len(),
        active_sites: sites
            .iter()
            .filter(|s| s.status == SiteStatus::Active)
            .count(),
        total_equipment: equipment.len(),
        operational_equipment: equipment
            .iter()
            .filter(|e| e.status == EquipmentStatus::Operational)
            .count(),
        total_interventions: interventions.len(),
        completed_interventions: interventions
            .iter()
            .filter(|i| i.status == InterventionStatus::Completed)
            .count(),
        total_alerts: alerts.len(),
        active_alerts: alerts
            .iter()
            .filter(|a| a.status == AlertStatus::Active)
            .count(),
    }
}

/// Site counts by status, in fixed display order.
pub fn site_status_breakdown(sites: &[Arc<Site>]) -> Vec<ChartSlice> {
    let count = |status| sites.iter().filter(|s| s.status == status).count();
    vec![
        ChartSlice {
            name: "Active",
            value: count(SiteStatus::Active),
            color: COLOR_GREEN,
        },
        ChartSlice {
            name: "Maintenance",
            value: count(SiteStatus::Maintenance),
            color: COLOR_YELLOW,
        },
        ChartSlice {
            name: "Inactive",
            value: count(SiteStatus::Inactive),
            color: COLOR_GRAY,
        },
        ChartSlice {
            name: "Fault",
            value: count(SiteStatus::Fault),
            color: COLOR_RED,
        },
    ]
}

/// Equipment counts by status, in fixed display order.
pub fn equipment_status_breakdown(equipment: &[Arc<Equipment>]) -> Vec<ChartSlice> {
    let count = |status| equipment.iter().filter(|e| e.status == status).count();
    vec![
        ChartSlice {
            name: "Operational",
            value: count(EquipmentStatus::Operational),
            color: COLOR_GREEN,
        },
        ChartSlice {
            name: "Maintenance",
            value: count(EquipmentStatus::Maintenance),
            color: COLOR_YELLOW,
        },
        ChartSlice {
            name: "Faulty",
            value: count(EquipmentStatus::Faulty),
            color: COLOR_RED,
        },
        ChartSlice {
            name: "Offline",
            value: count(EquipmentStatus::Offline),
            color: COLOR_GRAY,
        },
    ]
}

/// Alert counts by severity, in fixed display order.
pub fn alert_severity_breakdown(alerts: &[Arc<Alert>]) -> Vec<ChartSlice> {
    let count = |severity| alerts.iter().filter(|a| a.severity == severity).count();
    vec![
        ChartSlice {
            name: "Info",
            value: count(Severity::Info),
            color: COLOR_BLUE,
        },
        ChartSlice {
            name: "Warning",
            value: count(Severity::Warning),
            color: COLOR_AMBER,
        },
        ChartSlice {
            name: "Critical",
            value: count(Severity::Critical),
            color: COLOR_RED,
        },
    ]
}

/// Maintenance trend for the six calendar months ending at `now`'s month,
/// oldest first. Interventions are bucketed by `created_at`; a month's
/// window runs from the first day at midnight up to, but not including,
/// the next month's first instant, so every timestamp on the last day
/// (sub-second precision included) lands in that month.
pub fn monthly_maintenance_trend(
    interventions: &[Arc<Intervention>],
    now: DateTime<Utc>,
) -> Vec<MonthlyMaintenance> {
    let current = first_of_month(now.date_naive());

    (0..6)
        .map(|i| {
            let start_date = current
                .checked_sub_months(Months::new(5 - i))
                .unwrap_or(current);
            let start = start_of_day(start_date);
            let next_month = start_date
                .checked_add_months(Months::new(1))
                .unwrap_or(start_date);
            let end = start_of_day(next_month);

            let in_month: Vec<&Arc<Intervention>> = interventions
                .iter()
                .filter(|int| int.created_at >= start && int.created_at < end)
                .collect();

            MonthlyMaintenance {
                month: start_date.format("%b %y").to_string(),
                scheduled: in_month
                    .iter()
                    .filter(|i| i.status == InterventionStatus::Scheduled)
                    .count(),
                completed: in_month
                    .iter()
                    .filter(|i| i.status == InterventionStatus::Completed)
                    .count(),
                total: in_month.len(),
            }
        })
        .collect()
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{InterventionKind, Priority, SiteKind};
    use uuid::Uuid;

    fn site(status: SiteStatus) -> Arc<Site> {
        Arc::new(Site {
            id: Uuid::new_v4(),
            name: "BTS-Alger-Centre".into(),
            code: "ALG-001".into(),
            kind: SiteKind::G4,
            status,
            address: None,
            city: None,
            region: None,
            created_at: Utc::now(),
        })
    }

    fn intervention(status: InterventionStatus, created_at: DateTime<Utc>) -> Arc<Intervention> {
        Arc::new(Intervention {
            id: Uuid::new_v4(),
            title: "Antenna check".into(),
            description: None,
            kind: InterventionKind::Preventive,
            priority: Priority::Medium,
            status,
            site_id: Uuid::new_v4(),
            equipment_id: None,
            assigned_to: None,
            scheduled_date: None,
            completed_date: None,
            estimated_duration: None,
            created_at,
            site: None,
            equipment: None,
            assignee: None,
        })
    }

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn percentage_of_empty_collection_is_zero() {
        assert!((percentage(0, 0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn percentage_computes_share() {
        assert!((percentage(3, 4) - 75.0).abs() < f64::EPSILON);
        assert!((percentage(4, 4) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn site_breakdown_counts_and_colors() {
        let sites = vec![
            site(SiteStatus::Active),
            site(SiteStatus::Active),
            site(SiteStatus::Fault),
        ];
        let slices = site_status_breakdown(&sites);

        assert_eq!(slices.len(), 4);
        assert_eq!(slices[0].name, "Active");
        assert_eq!(slices[0].value, 2);
        assert_eq!(slices[0].color, COLOR_GREEN);
        assert_eq!(slices[1].value, 0); // maintenance
        assert_eq!(slices[3].name, "Fault");
        assert_eq!(slices[3].value, 1);
        assert_eq!(slices[3].color, COLOR_RED);
    }

    #[test]
    fn trend_produces_six_buckets_oldest_first() {
        let now = ts("2025-06-15T12:00:00Z");
        let trend = monthly_maintenance_trend(&[], now);

        assert_eq!(trend.len(), 6);
        assert_eq!(trend[0].month, "Jan 25");
        assert_eq!(trend[5].month, "Jun 25");
        assert!(trend.iter().all(|m| m.total == 0));
    }

    #[test]
    fn trend_buckets_by_created_at() {
        let now = ts("2025-06-15T12:00:00Z");
        let interventions = vec![
            intervention(InterventionStatus::Scheduled, ts("2025-06-01T00:00:00Z")),
            intervention(InterventionStatus::Completed, ts("2025-06-10T09:30:00Z")),
            intervention(InterventionStatus::Cancelled, ts("2025-06-11T10:00:00Z")),
            intervention(InterventionStatus::Completed, ts("2025-04-20T08:00:00Z")),
            // Outside the window entirely.
            intervention(InterventionStatus::Scheduled, ts("2024-11-30T23:59:59Z")),
        ];
        let trend = monthly_maintenance_trend(&interventions, now);

        let june = &trend[5];
        assert_eq!(june.scheduled, 1);
        assert_eq!(june.completed, 1);
        assert_eq!(june.total, 3); // cancelled counts toward total only

        let april = &trend[3];
        assert_eq!(april.completed, 1);
        assert_eq!(april.total, 1);

        let total_bucketed: usize = trend.iter().map(|m| m.total).sum();
        assert_eq!(total_bucketed, 4);
    }

    #[test]
    fn trend_window_includes_entire_last_day() {
        let now = ts("2025-06-15T12:00:00Z");
        let interventions = vec![
            // Late on the last day of May: inside the May bucket.
            intervention(InterventionStatus::Completed, ts("2025-05-31T23:59:59Z")),
            // Sub-second timestamp in the final second of May, as Postgres
            // emits: still inside the May bucket.
            intervention(
                InterventionStatus::Completed,
                ts("2025-05-31T23:59:59.500Z"),
            ),
            // First instant of June: inside the June bucket.
            intervention(InterventionStatus::Completed, ts("2025-06-01T00:00:00Z")),
        ];
        let trend = monthly_maintenance_trend(&interventions, now);

        assert_eq!(trend[4].month, "May 25");
        assert_eq!(trend[4].total, 2);
        assert_eq!(trend[5].total, 1);

        // Every in-window record lands in exactly one bucket.
        let total_bucketed: usize = trend.iter().map(|m| m.total).sum();
        assert_eq!(total_bucketed, interventions.len());
    }

    #[test]
    fn summary_stats_serialize_camel_case() {
        let stats = summary_stats(&[site(SiteStatus::Active)], &[], &[], &[]);
        let json = serde_json::to_value(stats).unwrap();

        assert_eq!(json["totalSites"], 1);
        assert_eq!(json["activeSites"], 1);
        assert_eq!(json["operationalEquipment"], 0);
        assert_eq!(json["completedInterventions"], 0);
        assert_eq!(json["activeAlerts"], 0);
    }
}
