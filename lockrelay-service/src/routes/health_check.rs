use actix_web::{HttpResponse, Responder, get};

/// Liveness probe.
#[get("/ping")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("pong")
}
