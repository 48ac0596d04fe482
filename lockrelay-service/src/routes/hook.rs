use actix_web::{
    HttpResponse, ResponseError,
    http::{StatusCode, header::ContentType},
    web::{Bytes, Data},
};
use lockrelay::error::{ErrorKind, RelayError};
use lockrelay::ingestion::EventIngestor;
use lockrelay::store::StatusStore;
use thiserror::Error;
use tracing::error;

use crate::routes::ErrorMessage;

#[derive(Debug, Error)]
pub enum HookError {
    #[error("The push event is malformed: {0}")]
    MalformedEvent(RelayError),

    #[error(transparent)]
    Relay(RelayError),
}

impl From<RelayError> for HookError {
    fn from(err: RelayError) -> Self {
        match err.kind() {
            ErrorKind::MalformedEvent => HookError::MalformedEvent(err),
            _ => HookError::Relay(err),
        }
    }
}

impl HookError {
    pub fn to_message(&self) -> String {
        match self {
            HookError::MalformedEvent(err) => format!(
                "The push event is malformed: {}",
                err.detail().unwrap_or(err.description())
            ),
            // Store and handoff failures stay in the logs.
            HookError::Relay(_) => "internal server error".to_string(),
        }
    }
}

impl ResponseError for HookError {
    fn status_code(&self) -> StatusCode {
        match self {
            HookError::MalformedEvent(_) => StatusCode::BAD_REQUEST,
            HookError::Relay(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error_message = ErrorMessage {
            error: self.to_message(),
        };
        let body =
            serde_json::to_string(&error_message).expect("failed to serialize error message");
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(body)
    }
}

/// Receives a push event and applies it to the relay.
///
/// Responds once the resulting notification has been taken by the dispatcher.
pub async fn ingest_event<S>(
    ingestor: Data<EventIngestor<S>>,
    body: Bytes,
) -> Result<HttpResponse, HookError>
where
    S: StatusStore + 'static,
{
    if let Err(err) = ingestor.ingest(&body).await {
        if err.kind() != ErrorKind::MalformedEvent {
            error!(error = %err, "failed to ingest push event");
        }
        return Err(err.into());
    }

    Ok(HttpResponse::Ok().finish())
}
