//! Alert command handlers.

use std::sync::Arc;

use tabled::Tabled;

use fieldops_core::{
    Alert, AlertStatus, Command as CoreCommand, CommandResult, Controller, CreateAlertRequest,
    Severity,
};

use crate::cli::{AlertsArgs, AlertsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Site")]
    site: String,
    #[tabled(rename = "Raised")]
    raised: String,
}

impl From<&Arc<Alert>> for AlertRow {
    fn from(a: &Arc<Alert>) -> Self {
        Self {
            title: a.title.clone(),
            kind: a.kind.to_string(),
            severity: a.severity.to_string(),
            status: a.status.to_string(),
            site: a.site.as_ref().map(|s| s.name.clone()).unwrap_or_default(),
            raised: a.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: AlertsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AlertsCommand::List { status, severity } => {
            let status = status
                .map(|s| util::parse_enum::<AlertStatus>("status", &s))
                .transpose()?;
            let severity = severity
                .map(|s| util::parse_enum::<Severity>("severity", &s))
                .transpose()?;
            let all = controller.store().alerts_snapshot();
            let snap: Vec<_> = all
                .iter()
                .filter(|a| status.is_none_or(|wanted| a.status == wanted))
                .filter(|a| severity.is_none_or(|wanted| a.severity == wanted))
                .cloned()
                .collect();
            let out = global
                .output
                .render_list(&snap, |a| AlertRow::from(a), |a| a.id.to_string());
            output::emit(&out, global.quiet);
            Ok(())
        }

        AlertsCommand::Get { id } => {
            let id = util::parse_uuid("id", &id)?;
            let record = controller
                .store()
                .alert(&id)
                .ok_or_else(|| CliError::NotFound {
                    resource_type: "alert".into(),
                    identifier: id.to_string(),
                    list_command: "alerts list".into(),
                })?;
            let out = global
                .output
                .render_single(&record, |a| alert_detail(a), |a| a.id.to_string());
            output::emit(&out, global.quiet);
            Ok(())
        }

        AlertsCommand::Create {
            title,
            message,
            kind,
            severity,
            site,
            equipment,
        } => {
            let request = CreateAlertRequest {
                title,
                message,
                kind: util::parse_enum("kind", &kind)?,
                severity: util::parse_enum("severity", &severity)?,
                site_id: site
                    .map(|s| util::resolve_site_id(controller, &s))
                    .transpose()?,
                equipment_id: equipment
                    .map(|e| util::resolve_equipment_id(controller, &e))
                    .transpose()?,
            };
            let result = controller.execute(CoreCommand::CreateAlert(request)).await?;
            if let CommandResult::Alert(alert) = result {
                if !global.quiet {
                    eprintln!("Alert raised: {} ({})", alert.title, alert.id);
                }
            }
            Ok(())
        }

        AlertsCommand::Ack { id } => {
            let id = util::parse_uuid("id", &id)?;
            controller
                .execute(CoreCommand::AcknowledgeAlert { id })
                .await?;
            if !global.quiet {
                eprintln!("Alert acknowledged");
            }
            Ok(())
        }

        AlertsCommand::Resolve { id } => {
            let id = util::parse_uuid("id", &id)?;
            controller.execute(CoreCommand::ResolveAlert { id }).await?;
            if !global.quiet {
                eprintln!("Alert resolved");
            }
            Ok(())
        }

        AlertsCommand::Delete { id } => {
            let id = util::parse_uuid("id", &id)?;
            if !util::confirm(&format!("Delete alert {id}?"), global.yes)? {
                return Ok(());
            }
            controller.execute(CoreCommand::DeleteAlert { id }).await?;
            if !global.quiet {
                eprintln!("Alert deleted");
            }
            Ok(())
        }
    }
}

fn alert_detail(a: &Alert) -> String {
    format!(
        "Title:     {}\n\
         Message:   {}\n\
         Type:      {}\n\
         Severity:  {}\n\
         Status:    {}\n\
         Site:      {}\n\
         Equipment: {}\n\
         Raised:    {}\n\
         Resolved:  {}",
        a.title,
        a.message,
        a.kind,
        a.severity,
        a.status,
        a.site
            .as_ref()
            .map(|s| s.name.clone())
            .or_else(|| a.site_id.map(|id| id.to_string()))
            .unwrap_or_default(),
        a.equipment
            .as_ref()
            .map(|e| e.name.clone())
            .or_else(|| a.equipment_id.map(|id| id.to_string()))
            .unwrap_or_default(),
        a.created_at.format("%Y-%m-%d %H:%M"),
        util::fmt_opt(a.resolved_at.as_ref()),
    )
}
