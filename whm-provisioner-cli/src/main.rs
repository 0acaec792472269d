//! Operator entry point for the WHM provisioning adapter
//!
//! Runs one diagnostic command against a WHM server and exits. Connection
//! settings come from `--hostname`/`--user`/`--token` or the `WHM_HOSTNAME`,
//! `WHM_API_USER` and `WHM_API_TOKEN` environment variables.
//!
//! Results go to stdout, logs to stderr (`RUST_LOG` controls verbosity).

mod cli;
mod commands;

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use whm_provisioner_core::{InMemoryExternalAccountRepository, ProvisioningService, ServiceContext};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut out = io::stdout().lock();

    if let Command::Describe = cli.command {
        return commands::describe(&mut out);
    }

    let credentials = cli.server.credentials()?;
    let hostname = credentials.hostname().to_string();
    tracing::debug!("Using {credentials:?}");

    // No host platform storage here: every username counts as unrecorded.
    let ctx = ServiceContext::from_credentials(
        credentials,
        Arc::new(InMemoryExternalAccountRepository::new()),
    )?;
    let service = ProvisioningService::new(Arc::new(ctx));

    match cli.command {
        Command::TestConnection => commands::test_connection(&service, &hostname, &mut out).await,
        Command::ListPackages { json } => commands::list_packages(&service, json, &mut out).await,
        Command::RemoveOrphan { username } => {
            commands::remove_orphan(&service, &username, &mut out).await
        }
        Command::Describe => commands::describe(&mut out),
    }
}
