use actix_web::{HttpResponse, Responder, get, http::header::ContentType, web::ThinData};
use metrics_exporter_prometheus::PrometheusHandle;

/// Prometheus text exposition of every metric recorded by the process.
#[get("/metrics")]
pub async fn metrics(handle: ThinData<PrometheusHandle>) -> impl Responder {
    HttpResponse::Ok()
        .insert_header(ContentType::plaintext())
        .body(handle.render())
}
