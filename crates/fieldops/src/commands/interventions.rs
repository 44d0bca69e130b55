//! Intervention command handlers.

use std::sync::Arc;

use tabled::Tabled;

use fieldops_core::{
    Command as CoreCommand, CommandResult, Controller, CreateInterventionRequest, Intervention,
    InterventionStatus, UpdateInterventionRequest, model::duration_from_hours,
};

use crate::cli::{GlobalOpts, InterventionsArgs, InterventionsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct InterventionRow {
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Site")]
    site: String,
    #[tabled(rename = "Assignee")]
    assignee: String,
    #[tabled(rename = "Scheduled")]
    scheduled: String,
}

impl From<&Arc<Intervention>> for InterventionRow {
    fn from(i: &Arc<Intervention>) -> Self {
        Self {
            title: i.title.clone(),
            kind: i.kind.to_string(),
            priority: i.priority.to_string(),
            status: i.status.to_string(),
            site: i
                .site
                .as_ref()
                .map_or_else(|| i.site_id.to_string(), |s| s.name.clone()),
            assignee: i
                .assignee
                .as_ref()
                .map(|a| a.full_name.clone())
                .unwrap_or_default(),
            scheduled: i
                .scheduled_date
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: InterventionsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        InterventionsCommand::List { status } => {
            let status = status
                .map(|s| util::parse_enum::<InterventionStatus>("status", &s))
                .transpose()?;
            let all = controller.store().interventions_snapshot();
            let snap: Vec<_> = all
                .iter()
                .filter(|i| status.is_none_or(|wanted| i.status == wanted))
                .cloned()
                .collect();
            let out = global
                .output
                .render_list(&snap, |i| InterventionRow::from(i), |i| i.id.to_string());
            output::emit(&out, global.quiet);
            Ok(())
        }

        InterventionsCommand::Get { id } => {
            let id = util::parse_uuid("id", &id)?;
            let record =
                controller
                    .store()
                    .intervention(&id)
                    .ok_or_else(|| CliError::NotFound {
                        resource_type: "intervention".into(),
                        identifier: id.to_string(),
                        list_command: "interventions list".into(),
                    })?;
            let out = global
                .output
                .render_single(&record, |i| intervention_detail(i), |i| i.id.to_string());
            output::emit(&out, global.quiet);
            Ok(())
        }

        InterventionsCommand::Create {
            title,
            kind,
            priority,
            status,
            site,
            equipment,
            assign,
            scheduled,
            hours,
            description,
        } => {
            let request = CreateInterventionRequest {
                title,
                kind: util::parse_enum("kind", &kind)?,
                priority: util::parse_enum("priority", &priority)?,
                status: util::parse_enum("status", &status)?,
                site_id: util::resolve_site_id(controller, &site)?,
                description,
                equipment_id: equipment
                    .map(|e| util::resolve_equipment_id(controller, &e))
                    .transpose()?,
                assigned_to: assign.map(|a| util::parse_uuid("assign", &a)).transpose()?,
                scheduled_date: scheduled
                    .map(|d| util::parse_datetime("scheduled", &d))
                    .transpose()?,
                estimated_duration: hours.map(duration_from_hours),
            };
            let result = controller
                .execute(CoreCommand::CreateIntervention(request))
                .await?;
            if let CommandResult::Intervention(task) = result {
                if !global.quiet {
                    eprintln!("Intervention scheduled: {} ({})", task.title, task.id);
                }
            }
            Ok(())
        }

        InterventionsCommand::Update {
            id,
            title,
            kind,
            priority,
            status,
            site,
            equipment,
            assign,
            scheduled,
            completed,
            hours,
            description,
        } => {
            let id = util::parse_uuid("id", &id)?;
            let update = UpdateInterventionRequest {
                title,
                description,
                kind: kind.map(|k| util::parse_enum("kind", &k)).transpose()?,
                priority: priority
                    .map(|p| util::parse_enum("priority", &p))
                    .transpose()?,
                status: status.map(|s| util::parse_enum("status", &s)).transpose()?,
                site_id: site
                    .map(|s| util::resolve_site_id(controller, &s))
                    .transpose()?,
                equipment_id: equipment
                    .map(|e| util::resolve_equipment_id(controller, &e))
                    .transpose()?,
                assigned_to: assign.map(|a| util::parse_uuid("assign", &a)).transpose()?,
                scheduled_date: scheduled
                    .map(|d| util::parse_datetime("scheduled", &d))
                    .transpose()?,
                completed_date: completed
                    .map(|d| util::parse_datetime("completed", &d))
                    .transpose()?,
                estimated_duration: hours.map(duration_from_hours),
            };
            util::ensure_non_empty_update(&update)?;
            controller
                .execute(CoreCommand::UpdateIntervention { id, update })
                .await?;
            if !global.quiet {
                eprintln!("Intervention updated");
            }
            Ok(())
        }

        InterventionsCommand::Delete { id } => {
            let id = util::parse_uuid("id", &id)?;
            if !util::confirm(&format!("Delete intervention {id}?"), global.yes)? {
                return Ok(());
            }
            controller
                .execute(CoreCommand::DeleteIntervention { id })
                .await?;
            if !global.quiet {
                eprintln!("Intervention deleted");
            }
            Ok(())
        }
    }
}

fn intervention_detail(i: &Intervention) -> String {
    format!(
        "Title:       {}\n\
         Type:        {}\n\
         Priority:    {}\n\
         Status:      {}\n\
         Site:        {}\n\
         Equipment:   {}\n\
         Assignee:    {}\n\
         Scheduled:   {}\n\
         Completed:   {}\n\
         Est. hours:  {}\n\
         Description: {}",
        i.title,
        i.kind,
        i.priority,
        i.status,
        i.site
            .as_ref()
            .map_or_else(|| i.site_id.to_string(), |s| s.name.clone()),
        i.equipment
            .as_ref()
            .map(|e| e.name.clone())
            .or_else(|| i.equipment_id.map(|id| id.to_string()))
            .unwrap_or_default(),
        i.assignee
            .as_ref()
            .map(|a| a.full_name.clone())
            .or_else(|| i.assigned_to.map(|id| id.to_string()))
            .unwrap_or_default(),
        util::fmt_opt(i.scheduled_date.as_ref()),
        util::fmt_opt(i.completed_date.as_ref()),
        util::fmt_opt(i.estimated_hours().as_ref()),
        util::fmt_opt(i.description.as_ref()),
    )
}
