//! Show the signed-in user's profile.

use fieldops_core::{Controller, Profile};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let profile = controller.current_profile().await?;
    let out = global
        .output
        .render_single(&profile, profile_detail, |p| p.id.to_string());
    output::emit(&out, global.quiet);
    Ok(())
}

fn profile_detail(p: &Profile) -> String {
    format!(
        "Name:  {}\n\
         Email: {}\n\
         Role:  {}\n\
         ID:    {}",
        util::fmt_opt(p.full_name.as_ref()),
        util::fmt_opt(p.email.as_ref()),
        p.role,
        p.id,
    )
}
