//! Equipment command handlers.

use std::sync::Arc;

use tabled::Tabled;

use fieldops_core::{
    Command as CoreCommand, CommandResult, Controller, CreateEquipmentRequest, Equipment,
    EquipmentStatus, UpdateEquipmentRequest,
};

use crate::cli::{EquipmentArgs, EquipmentCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct EquipmentRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Serial")]
    serial: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Site")]
    site: String,
}

impl From<&Arc<Equipment>> for EquipmentRow {
    fn from(e: &Arc<Equipment>) -> Self {
        Self {
            name: e.name.clone(),
            serial: e.serial_number.clone(),
            kind: e.kind.to_string(),
            status: e.status.to_string(),
            site: e
                .site
                .as_ref()
                .map_or_else(|| e.site_id.to_string(), |s| s.name.clone()),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: EquipmentArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        EquipmentCommand::List { status, site } => {
            let status = status
                .map(|s| util::parse_enum::<EquipmentStatus>("status", &s))
                .transpose()?;
            let site_id = site
                .map(|s| util::resolve_site_id(controller, &s))
                .transpose()?;
            let all = controller.store().equipment_snapshot();
            let snap: Vec<_> = all
                .iter()
                .filter(|e| status.is_none_or(|wanted| e.status == wanted))
                .filter(|e| site_id.is_none_or(|wanted| e.site_id == wanted))
                .cloned()
                .collect();
            let out = global
                .output
                .render_list(&snap, |e| EquipmentRow::from(e), |e| e.id.to_string());
            output::emit(&out, global.quiet);
            Ok(())
        }

        EquipmentCommand::Get { unit } => {
            let id = util::resolve_equipment_id(controller, &unit)?;
            let record = controller
                .store()
                .equipment_unit(&id)
                .ok_or_else(|| CliError::NotFound {
                    resource_type: "equipment".into(),
                    identifier: unit,
                    list_command: "equipment list".into(),
                })?;
            let out = global
                .output
                .render_single(&record, |e| equipment_detail(e), |e| e.id.to_string());
            output::emit(&out, global.quiet);
            Ok(())
        }

        EquipmentCommand::Create {
            name,
            serial,
            kind,
            status,
            site,
            brand,
            model,
            installed,
        } => {
            let request = CreateEquipmentRequest {
                name,
                serial_number: serial,
                kind: util::parse_enum("kind", &kind)?,
                status: util::parse_enum("status", &status)?,
                site_id: util::resolve_site_id(controller, &site)?,
                brand,
                model,
                installation_date: installed
                    .map(|d| util::parse_date("installed", &d))
                    .transpose()?,
            };
            let result = controller
                .execute(CoreCommand::CreateEquipment(request))
                .await?;
            if let CommandResult::Equipment(unit) = result {
                if !global.quiet {
                    eprintln!("Equipment registered: {} ({})", unit.serial_number, unit.id);
                }
            }
            Ok(())
        }

        EquipmentCommand::Update {
            unit,
            name,
            serial,
            kind,
            status,
            site,
            brand,
            model,
            installed,
        } => {
            let id = util::resolve_equipment_id(controller, &unit)?;
            let update = UpdateEquipmentRequest {
                name,
                serial_number: serial,
                kind: kind.map(|k| util::parse_enum("kind", &k)).transpose()?,
                status: status.map(|s| util::parse_enum("status", &s)).transpose()?,
                site_id: site
                    .map(|s| util::resolve_site_id(controller, &s))
                    .transpose()?,
                brand,
                model,
                installation_date: installed
                    .map(|d| util::parse_date("installed", &d))
                    .transpose()?,
            };
            util::ensure_non_empty_update(&update)?;
            controller
                .execute(CoreCommand::UpdateEquipment { id, update })
                .await?;
            if !global.quiet {
                eprintln!("Equipment updated");
            }
            Ok(())
        }

        EquipmentCommand::Delete { unit } => {
            let id = util::resolve_equipment_id(controller, &unit)?;
            if !util::confirm(
                &format!("Delete equipment '{unit}'? Interventions and alerts reference it."),
                global.yes,
            )? {
                return Ok(());
            }
            controller
                .execute(CoreCommand::DeleteEquipment { id })
                .await?;
            if !global.quiet {
                eprintln!("Equipment deleted");
            }
            Ok(())
        }
    }
}

fn equipment_detail(e: &Equipment) -> String {
    format!(
        "Name:      {}\n\
         Serial:    {}\n\
         Type:      {}\n\
         Status:    {}\n\
         Brand:     {}\n\
         Model:     {}\n\
         Site:      {}\n\
         Installed: {}",
        e.name,
        e.serial_number,
        e.kind,
        e.status,
        util::fmt_opt(e.brand.as_ref()),
        util::fmt_opt(e.model.as_ref()),
        e.site
            .as_ref()
            .map_or_else(|| e.site_id.to_string(), |s| s.name.clone()),
        util::fmt_opt(e.installation_date.as_ref()),
    )
}
