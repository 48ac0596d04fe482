//! Lock relay service binary.
//!
//! Runs the relay (`lockrelay`) or applies the state store migrations (`lockrelay migrate`).

use std::env;

use anyhow::{Context, anyhow};
use lockrelay_config::load_config;
use lockrelay_service::config::{MigrateConfig, ServiceConfig};
use lockrelay_service::core::{migrate_store, start_relay};
use lockrelay_telemetry::tracing::init_tracing;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    let _log_flusher = init_tracing(env!("CARGO_BIN_NAME"))?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main())
}

/// Dispatches on the command-line arguments: no argument runs the relay, `migrate` runs
/// migrations.
async fn async_main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    match args.as_slice() {
        [] => {
            let config = load_config::<ServiceConfig>()
                .context("loading service configuration for relay startup")?;
            info!(
                address = %config.application.address(),
                policy = ?config.relay.delivery_failure_policy,
                "starting lock relay"
            );

            if let Err(err) = start_relay(config).await {
                error!(category = err.category(), "{err}");
                return Err(err.into());
            }

            info!("lock relay stopped");
        }
        [command] if command == "migrate" => {
            let config = load_config::<MigrateConfig>()
                .context("loading store configuration for migrations")?;
            migrate_store(&config.store).await?;
        }
        _ => {
            let command = args.join(" ");
            error!(%command, "invalid command");
            return Err(anyhow!("invalid command: {command}"));
        }
    }

    Ok(())
}
