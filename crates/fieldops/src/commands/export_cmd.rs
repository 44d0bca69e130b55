//! Export command handlers: per-table CSV and the combined JSON report.

use std::path::PathBuf;

use chrono::Utc;

use fieldops_core::Controller;
use fieldops_core::export::{full_report, to_csv};
use fieldops_core::report::summary_stats;

use crate::cli::{ExportArgs, ExportCommand, ExportTable, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub fn handle(
    controller: &Controller,
    args: ExportArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let store = controller.store();

    match args.command {
        ExportCommand::Csv { table, file } => {
            let csv = match table {
                ExportTable::Sites => to_csv(&store.sites_snapshot())?,
                ExportTable::Equipment => to_csv(&store.equipment_snapshot())?,
                ExportTable::Interventions => to_csv(&store.interventions_snapshot())?,
                ExportTable::Alerts => to_csv(&store.alerts_snapshot())?,
            };
            write_out(&csv, file, global.quiet)
        }

        ExportCommand::Report { file } => {
            let sites = store.sites_snapshot();
            let equipment = store.equipment_snapshot();
            let interventions = store.interventions_snapshot();
            let alerts = store.alerts_snapshot();

            let summary = summary_stats(&sites, &equipment, &interventions, &alerts);
            let report = full_report(
                summary,
                &sites,
                &equipment,
                &interventions,
                &alerts,
                Utc::now(),
            )?;
            let text = serde_json::to_string_pretty(&report)?;
            write_out(&text, file, global.quiet)
        }
    }
}

/// Write export output to a file, or to stdout when no file was given.
fn write_out(contents: &str, file: Option<PathBuf>, quiet: bool) -> Result<(), CliError> {
    match file {
        Some(path) => {
            std::fs::write(&path, contents)?;
            if !quiet {
                eprintln!("Exported {} bytes to {}", contents.len(), path.display());
            }
            Ok(())
        }
        None => {
            output::emit(contents, quiet);
            Ok(())
        }
    }
}
