use std::net::TcpListener;

use actix_web::{App, HttpServer, dev::Server, web};
use lockrelay::ingestion::EventIngestor;
use lockrelay::store::StatusStore;
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;
use tracing_actix_web::TracingLogger;

use crate::config::ApplicationSettings;
use crate::error::ServiceResult;
use crate::routes::{health_check::health_check, hook::ingest_event, metrics::metrics};

/// HTTP side of the relay: receives push events and serves probes.
pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    /// Binds the configured address and builds the server without starting to poll it.
    pub fn build<S>(
        settings: &ApplicationSettings,
        ingestor: EventIngestor<S>,
        prometheus_handle: PrometheusHandle,
    ) -> ServiceResult<Self>
    where
        S: StatusStore + Clone + Send + Sync + 'static,
    {
        let listener = TcpListener::bind(settings.address())?;
        let port = listener.local_addr()?.port();

        let server = run(
            listener,
            ingestor,
            prometheus_handle,
            settings.max_payload_bytes,
        )?;
        info!(host = %settings.host, port, "http server bound");

        Ok(Self { port, server })
    }

    /// Returns the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn into_server(self) -> Server {
        self.server
    }
}

/// Creates the HTTP server on `listener`.
///
/// Request bodies up to `max_payload_bytes` are accepted. Signal handling is left to the caller,
/// which stops the server through its handle.
pub fn run<S>(
    listener: TcpListener,
    ingestor: EventIngestor<S>,
    prometheus_handle: PrometheusHandle,
    max_payload_bytes: usize,
) -> Result<Server, std::io::Error>
where
    S: StatusStore + Clone + Send + Sync + 'static,
{
    let ingestor = web::Data::new(ingestor);
    let prometheus_handle = web::ThinData(prometheus_handle);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .service(health_check)
            .service(metrics)
            .route("/hook", web::post().to(ingest_event::<S>))
            .app_data(web::PayloadConfig::new(max_payload_bytes))
            .app_data(ingestor.clone())
            .app_data(prometheus_handle.clone())
    })
    .disable_signals()
    .listen(listener)?
    .run();

    Ok(server)
}
