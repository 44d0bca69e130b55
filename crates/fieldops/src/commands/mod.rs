//! Command dispatch: bridges CLI args -> core Commands -> output formatting.

pub mod alerts;
pub mod config_cmd;
pub mod equipment;
pub mod export_cmd;
pub mod interventions;
pub mod reports;
pub mod serve;
pub mod sites;
pub mod util;
pub mod whoami;

use fieldops_core::Controller;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Sites(args) => sites::handle(controller, args, global).await,
        Command::Equipment(args) => equipment::handle(controller, args, global).await,
        Command::Interventions(args) => interventions::handle(controller, args, global).await,
        Command::Alerts(args) => alerts::handle(controller, args, global).await,
        Command::Reports(args) => reports::handle(controller, args, global),
        Command::Export(args) => export_cmd::handle(controller, args, global),
        Command::Whoami => whoami::handle(controller, global).await,
        // Serve, Config, and Completions are handled before dispatch
        Command::Serve(_) | Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
