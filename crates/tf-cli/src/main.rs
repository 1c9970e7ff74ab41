// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{anyhow, Result};
use std::sync::Arc;

use tf_cli::{commands, Cli, Commands, Parser};
use tf_core::{JsonFileStorage, TaskController};
use tf_rest_client::RestClient;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let gateway =
        RestClient::from_url(&cli.api_url).map_err(|e| anyhow!("invalid --api-url: {e}"))?;
    let storage = JsonFileStorage::in_default_location()?;
    let controller = TaskController::new(Arc::new(gateway), Box::new(storage));

    // Everything except the auth entry points starts from the persisted
    // session; restoring it also re-arms the initial task fetch.
    if !matches!(cli.command, Commands::Register(_) | Commands::Login(_)) {
        if let Err(error) = controller.restore().await {
            tracing::warn!(%error, "could not restore persisted session");
        }
    }

    commands::run(&controller, cli.command).await
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
