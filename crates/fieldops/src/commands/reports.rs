//! Report command handlers.
//!
//! Pure renderings over the store snapshot; all aggregation lives in
//! `fieldops_core::report`.

use chrono::Utc;
use owo_colors::OwoColorize;
use tabled::Tabled;

use fieldops_core::Controller;
use fieldops_core::report::{
    self, ChartSlice, MonthlyMaintenance, SummaryStats, alert_severity_breakdown,
    equipment_status_breakdown, monthly_maintenance_trend, site_status_breakdown, summary_stats,
};

use crate::cli::{GlobalOpts, ReportsArgs, ReportsCommand};
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct SliceRow {
    #[tabled(rename = "Bucket")]
    name: String,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "Share")]
    share: String,
}

#[derive(Tabled)]
struct TrendRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Scheduled")]
    scheduled: usize,
    #[tabled(rename = "Completed")]
    completed: usize,
    #[tabled(rename = "Total")]
    total: usize,
}

impl From<&MonthlyMaintenance> for TrendRow {
    fn from(m: &MonthlyMaintenance) -> Self {
        Self {
            month: m.month.clone(),
            scheduled: m.scheduled,
            completed: m.completed,
            total: m.total,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(
    controller: &Controller,
    args: ReportsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let store = controller.store();

    let out = match args.command {
        ReportsCommand::Summary => {
            let stats = summary_stats(
                &store.sites_snapshot(),
                &store.equipment_snapshot(),
                &store.interventions_snapshot(),
                &store.alerts_snapshot(),
            );
            let color = global.color.enabled();
            global.output.render_single(
                &stats,
                |s| summary_detail(s, color),
                |s| s.total_sites.to_string(),
            )
        }

        ReportsCommand::SiteStatus => {
            render_breakdown(&site_status_breakdown(&store.sites_snapshot()), global)
        }

        ReportsCommand::EquipmentStatus => render_breakdown(
            &equipment_status_breakdown(&store.equipment_snapshot()),
            global,
        ),

        ReportsCommand::AlertSeverity => {
            render_breakdown(&alert_severity_breakdown(&store.alerts_snapshot()), global)
        }

        ReportsCommand::Maintenance => {
            let trend = monthly_maintenance_trend(&store.interventions_snapshot(), Utc::now());
            global.output.render_list(&trend, |m| TrendRow::from(m), |m| {
                format!("{} {}", m.month, m.total)
            })
        }
    };

    output::emit(&out, global.quiet);
    Ok(())
}

fn render_breakdown(slices: &[ChartSlice], global: &GlobalOpts) -> String {
    let total: usize = slices.iter().map(|s| s.value).sum();
    global.output.render_list(
        slices,
        |s| SliceRow {
            name: s.name.to_owned(),
            count: s.value,
            share: format!("{:.1}%", report::percentage(s.value, total)),
        },
        |s| format!("{} {}", s.name, s.value),
    )
}

fn summary_detail(stats: &SummaryStats, color: bool) -> String {
    let paint = |n: usize, good: bool| {
        if !color {
            return n.to_string();
        }
        if good {
            n.green().to_string()
        } else {
            n.red().to_string()
        }
    };

    format!(
        "Sites:         {} total, {} active\n\
         Equipment:     {} total, {} operational\n\
         Interventions: {} total, {} completed\n\
         Alerts:        {} total, {} active",
        stats.total_sites,
        paint(stats.active_sites, true),
        stats.total_equipment,
        paint(stats.operational_equipment, true),
        stats.total_interventions,
        paint(stats.completed_interventions, true),
        stats.total_alerts,
        paint(stats.active_alerts, false),
    )
}
