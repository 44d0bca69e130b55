//! Site command handlers.

use std::sync::Arc;

use tabled::Tabled;

use fieldops_core::{
    Command as CoreCommand, CommandResult, Controller, CreateSiteRequest, Site, SiteStatus,
    UpdateSiteRequest,
};

use crate::cli::{GlobalOpts, SitesArgs, SitesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Location")]
    location: String,
}

impl From<&Arc<Site>> for SiteRow {
    fn from(s: &Arc<Site>) -> Self {
        Self {
            code: s.code.clone(),
            name: s.name.clone(),
            kind: s.kind.to_string(),
            status: s.status.to_string(),
            location: s.location().unwrap_or_default(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: SitesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SitesCommand::List { status } => {
            let status = status
                .map(|s| util::parse_enum::<SiteStatus>("status", &s))
                .transpose()?;
            let all = controller.store().sites_snapshot();
            let snap: Vec<_> = all
                .iter()
                .filter(|s| status.is_none_or(|wanted| s.status == wanted))
                .cloned()
                .collect();
            let out = global
                .output
                .render_list(&snap, |s| SiteRow::from(s), |s| s.id.to_string());
            output::emit(&out, global.quiet);
            Ok(())
        }

        SitesCommand::Get { site } => {
            let id = util::resolve_site_id(controller, &site)?;
            let row = controller.site_with_equipment(&id).await?;
            let out = global.output.render_single(&row, site_detail, |v| {
                v["id"].as_str().unwrap_or_default().to_owned()
            });
            output::emit(&out, global.quiet);
            Ok(())
        }

        SitesCommand::Create {
            name,
            code,
            generation,
            status,
            address,
            city,
            region,
        } => {
            let request = CreateSiteRequest {
                name,
                code,
                kind: util::parse_enum("generation", &generation)?,
                status: util::parse_enum("status", &status)?,
                address,
                city,
                region,
            };
            let result = controller.execute(CoreCommand::CreateSite(request)).await?;
            if let CommandResult::Site(site) = result {
                if !global.quiet {
                    eprintln!("Site created: {} ({})", site.code, site.id);
                }
            }
            Ok(())
        }

        SitesCommand::Update {
            site,
            name,
            code,
            generation,
            status,
            address,
            city,
            region,
        } => {
            let id = util::resolve_site_id(controller, &site)?;
            let update = UpdateSiteRequest {
                name,
                code,
                kind: generation
                    .map(|g| util::parse_enum("generation", &g))
                    .transpose()?,
                status: status.map(|s| util::parse_enum("status", &s)).transpose()?,
                address,
                city,
                region,
            };
            util::ensure_non_empty_update(&update)?;
            controller
                .execute(CoreCommand::UpdateSite { id, update })
                .await?;
            if !global.quiet {
                eprintln!("Site updated");
            }
            Ok(())
        }

        SitesCommand::Delete { site } => {
            let id = util::resolve_site_id(controller, &site)?;
            if !util::confirm(
                &format!("Delete site '{site}'? Equipment and interventions reference it."),
                global.yes,
            )? {
                return Ok(());
            }
            controller.execute(CoreCommand::DeleteSite { id }).await?;
            if !global.quiet {
                eprintln!("Site deleted");
            }
            Ok(())
        }
    }
}

fn site_detail(v: &serde_json::Value) -> String {
    let field = |key: &str| v[key].as_str().unwrap_or("-").to_owned();
    let equipment_count = v["equipment"].as_array().map_or(0, Vec::len);
    format!(
        "Name:      {}\n\
         Code:      {}\n\
         Type:      {}\n\
         Status:    {}\n\
         Address:   {}\n\
         City:      {}\n\
         Region:    {}\n\
         Equipment: {equipment_count} unit(s)",
        field("name"),
        field("code"),
        field("type"),
        field("status"),
        field("address"),
        field("city"),
        field("region"),
    )
}
