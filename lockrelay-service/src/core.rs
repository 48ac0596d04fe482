use std::time::Duration;

use lockrelay::commands::CommandHandler;
use lockrelay::concurrency::handoff::create_handoff;
use lockrelay::dispatcher::NotificationDispatcher;
use lockrelay::error::{Component, ErrorKind};
use lockrelay::ingestion::{EventIngestor, classifier_from_config};
use lockrelay::relay_error;
use lockrelay::store::StatusStore;
use lockrelay::store::memory::MemoryStore;
use lockrelay::store::postgres::PostgresStore;
use lockrelay::supervisor::Supervisor;
use lockrelay_config::shared::StoreConfig;
use lockrelay_telemetry::metrics::init_metrics_handle;
use tokio::signal::unix::{SignalKind, signal};
use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::startup::Application;
use crate::telegram::{TelegramClient, TelegramUpdates};

/// Starts the relay with the configured store and runs it until a host loop fails or a shutdown
/// signal arrives.
pub async fn start_relay(config: ServiceConfig) -> ServiceResult<()> {
    match &config.store {
        StoreConfig::Memory { seed_servers } => {
            info!(servers = seed_servers.len(), "using in-memory state store");
            let store = MemoryStore::with_servers(seed_servers.iter().cloned());
            run_relay(&config, store).await
        }
        StoreConfig::Postgres { connection } => {
            info!(
                host = %connection.host,
                port = connection.port,
                dbname = %connection.name,
                "using postgres state store"
            );
            let store = PostgresStore::new(connection);
            run_relay(&config, store).await
        }
    }
}

/// Applies the store migrations. Only the Postgres store has any.
pub async fn migrate_store(store: &StoreConfig) -> ServiceResult<()> {
    match store {
        StoreConfig::Memory { .. } => {
            info!("in-memory state store needs no migrations");
        }
        StoreConfig::Postgres { connection } => {
            PostgresStore::new(connection).migrate().await?;
            info!("state store migrated successfully");
        }
    }

    Ok(())
}

async fn run_relay<S>(config: &ServiceConfig, store: S) -> ServiceResult<()>
where
    S: StatusStore + Clone + Send + Sync + 'static,
{
    let prometheus_handle = init_metrics_handle()?;

    let telegram = TelegramClient::new(&config.telegram)?;
    let updates = TelegramUpdates::new(
        telegram.clone(),
        Duration::from_secs(config.telegram.poll_timeout_secs),
    );

    let (notifications_tx, notifications_rx) = create_handoff();
    let ingestor = EventIngestor::new(
        store.clone(),
        classifier_from_config(&config.relay.classifier),
        notifications_tx,
    );
    let dispatcher = NotificationDispatcher::new(
        store.clone(),
        telegram.clone(),
        notifications_rx,
        config.relay.delivery_failure_policy,
    );
    let command_handler = CommandHandler::new(store, telegram);

    let application = Application::build(&config.application, ingestor, prometheus_handle)?;
    let server = application.into_server();
    let server_handle = server.handle();

    let mut supervisor = Supervisor::new();
    supervisor.spawn(Component::EventIngestion, async move {
        server.await.map_err(|err| {
            relay_error!(ErrorKind::ServerFailed, "HTTP server failed", err, source: err)
        })
    });
    supervisor.spawn(Component::Dispatcher, dispatcher.run());
    supervisor.spawn(Component::CommandHandler, command_handler.run(updates));

    let result = tokio::select! {
        fatal = supervisor.wait() => Err(ServiceError::from(fatal)),
        signal = shutdown_signal() => signal.map_err(ServiceError::from),
    };

    info!("stopping http server");
    server_handle.stop(result.is_ok()).await;
    supervisor.shutdown();

    result
}

/// Resolves once SIGINT or SIGTERM is received.
async fn shutdown_signal() -> std::io::Result<()> {
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("sigint (ctrl+c) received, shutting down relay");
        }
        _ = sigterm.recv() => {
            warn!("sigterm received, shutting down relay");
        }
    }

    Ok(())
}
