mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fieldops_core::Controller;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a backend connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "fieldops", &mut std::io::stdout());
            Ok(())
        }

        // The server keeps its snapshot warm with periodic refreshes, so it
        // manages the controller lifecycle itself.
        Command::Serve(args) => {
            let mut backend = config::build_backend_config(&cli.global)?;
            backend.refresh_interval_secs = args.refresh;

            let controller = Controller::new(backend);
            controller.connect().await?;
            let result = commands::serve::handle(&controller, args, &cli.global).await;
            controller.disconnect().await;
            result
        }

        // Everything else is a single request-response cycle.
        cmd => {
            let backend = config::build_backend_config(&cli.global)?;
            let global = cli.global;
            Controller::oneshot(backend, move |controller| async move {
                tracing::debug!(command = ?cmd, "dispatching command");
                commands::dispatch(cmd, &controller, &global).await
            })
            .await
        }
    }
}
