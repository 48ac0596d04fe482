use std::io;

use lockrelay::error::{FatalError, RelayError};
use lockrelay_config::LoadConfigError;
use metrics_exporter_prometheus::BuildError;
use thiserror::Error;

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors raised while bootstrapping or running the service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("configuration error: {0}")]
    Config(#[from] LoadConfigError),

    #[error("metrics error: {0}")]
    Metrics(#[from] BuildError),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error(transparent)]
    Fatal(#[from] FatalError),
}

impl ServiceError {
    /// Returns a short category label for this error.
    pub fn category(&self) -> &'static str {
        match self {
            ServiceError::Config(_) => "configuration error",
            ServiceError::Metrics(_) => "metrics error",
            ServiceError::Io(_) => "i/o error",
            ServiceError::Relay(_) => "relay error",
            ServiceError::Fatal(_) => "fatal relay error",
        }
    }
}
