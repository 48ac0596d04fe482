#![allow(dead_code)]

use std::io;
use std::net::TcpListener;
use std::sync::Arc;

use lockrelay::concurrency::handoff::create_handoff;
use lockrelay::dispatcher::NotificationDispatcher;
use lockrelay::error::RelayResult;
use lockrelay::ingestion::{EventIngestor, ExactMessageClassifier};
use lockrelay::store::StatusStore;
use lockrelay::test_utils::RecordingMessenger;
use lockrelay_config::Environment;
use lockrelay_config::shared::DeliveryFailurePolicy;
use lockrelay_service::config::DEFAULT_MAX_PAYLOAD_BYTES;
use lockrelay_service::startup::run;
use lockrelay_telemetry::metrics::init_metrics_handle;
use tokio::task::JoinHandle;

pub struct TestApp<S> {
    pub address: String,
    pub api_client: reqwest::Client,
    pub store: S,
    pub messenger: RecordingMessenger,
    server_handle: JoinHandle<io::Result<()>>,
    dispatcher_handle: JoinHandle<RelayResult<()>>,
}

impl<S> TestApp<S> {
    pub async fn post_hook(&self, body: impl Into<reqwest::Body>) -> reqwest::Response {
        self.api_client
            .post(format!("{}/hook", &self.address))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}{path}", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

impl<S> Drop for TestApp<S> {
    fn drop(&mut self) {
        self.server_handle.abort();
        self.dispatcher_handle.abort();
    }
}

/// Spawns the HTTP surface over `store`, with notifications delivered to a recording messenger.
pub async fn spawn_test_app<S>(store: S) -> TestApp<S>
where
    S: StatusStore + Clone + Send + Sync + 'static,
{
    Environment::Dev.set();

    let base_address = "127.0.0.1";
    let listener =
        TcpListener::bind(format!("{base_address}:0")).expect("failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let messenger = RecordingMessenger::new();
    let (notifications_tx, notifications_rx) = create_handoff();
    let ingestor = EventIngestor::new(
        store.clone(),
        Arc::new(ExactMessageClassifier::default()),
        notifications_tx,
    );
    let dispatcher = NotificationDispatcher::new(
        store.clone(),
        messenger.clone(),
        notifications_rx,
        DeliveryFailurePolicy::Fatal,
    );

    let prometheus_handle = init_metrics_handle().expect("failed to install metrics recorder");
    let server = run(
        listener,
        ingestor,
        prometheus_handle,
        DEFAULT_MAX_PAYLOAD_BYTES,
    )
    .expect("failed to bind address");

    let server_handle = tokio::spawn(server);
    let dispatcher_handle = tokio::spawn(dispatcher.run());

    TestApp {
        address: format!("http://{base_address}:{port}"),
        api_client: reqwest::Client::new(),
        store,
        messenger,
        server_handle,
        dispatcher_handle,
    }
}
