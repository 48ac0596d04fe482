//! Error types and result definitions for relay operations.
//!
//! [`RelayError`] is the single error type flowing through the relay core. It carries an
//! [`ErrorKind`] for classification, a static description, optional dynamic detail, an optional
//! source error and the callsite it was created at. [`FatalError`] wraps a [`RelayError`] with the
//! component that gave up, and is what the supervisor hands back when the process must stop.

use std::borrow::Cow;
use std::error;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use thiserror::Error;

/// Convenient result type for relay operations using [`RelayError`] as the error type.
pub type RelayResult<T> = Result<T, RelayError>;

/// Specific categories of errors that can occur in the relay.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    // Inbound payloads
    MalformedEvent,

    // State store
    StoreConnectionFailed,
    StoreQueryFailed,

    // Messaging client
    DeliveryFailed,
    CommandSourceFailed,

    // Coordination
    DispatcherUnavailable,
    HostLoopExited,
    HostLoopPanic,
    ServerFailed,

    // Configuration, IO & serialization
    ConfigError,
    IoError,
    DeserializationError,

    Unknown,
}

impl ErrorKind {
    /// Returns a stable snake_case label, used for metrics.
    pub fn as_static_str(&self) -> &'static str {
        match self {
            ErrorKind::MalformedEvent => "malformed_event",
            ErrorKind::StoreConnectionFailed => "store_connection_failed",
            ErrorKind::StoreQueryFailed => "store_query_failed",
            ErrorKind::DeliveryFailed => "delivery_failed",
            ErrorKind::CommandSourceFailed => "command_source_failed",
            ErrorKind::DispatcherUnavailable => "dispatcher_unavailable",
            ErrorKind::HostLoopExited => "host_loop_exited",
            ErrorKind::HostLoopPanic => "host_loop_panic",
            ErrorKind::ServerFailed => "server_failed",
            ErrorKind::ConfigError => "config_error",
            ErrorKind::IoError => "io_error",
            ErrorKind::DeserializationError => "deserialization_error",
            ErrorKind::Unknown => "unknown",
        }
    }
}

/// Main error type for relay operations.
#[derive(Debug, Clone)]
pub struct RelayError {
    kind: ErrorKind,
    description: Cow<'static, str>,
    detail: Option<Cow<'static, str>>,
    source: Option<Arc<dyn error::Error + Send + Sync>>,
    location: &'static Location<'static>,
}

impl RelayError {
    /// Returns the [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the static description of this error.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the dynamic detail, if any was attached.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Returns the callsite at which this error was created.
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// Attaches the originating error and returns the modified instance.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: error::Error + Send + Sync + 'static,
    {
        self.source = Some(Arc::new(source));
        self
    }

    #[track_caller]
    fn from_components(
        kind: ErrorKind,
        description: Cow<'static, str>,
        detail: Option<Cow<'static, str>>,
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    ) -> Self {
        RelayError {
            kind,
            description,
            detail,
            source,
            location: Location::caller(),
        }
    }
}

impl PartialEq for RelayError {
    fn eq(&self, other: &RelayError) -> bool {
        self.kind == other.kind
    }
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:?}] {} @ {}:{}:{}",
            self.kind,
            self.description,
            self.location.file(),
            self.location.line(),
            self.location.column()
        )?;

        if let Some(detail) = self.detail.as_deref() {
            if detail.trim().is_empty() {
                write!(f, "\n  Detail: <empty>")?;
            } else {
                write!(f, "\n  Detail:")?;
                for line in detail.lines() {
                    write!(f, "\n    {line}")?;
                }
            }
        }

        Ok(())
    }
}

impl error::Error for RelayError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn error::Error + 'static))
    }
}

impl From<(ErrorKind, &'static str)> for RelayError {
    #[track_caller]
    fn from((kind, desc): (ErrorKind, &'static str)) -> RelayError {
        RelayError::from_components(kind, Cow::Borrowed(desc), None, None)
    }
}

impl<D> From<(ErrorKind, &'static str, D)> for RelayError
where
    D: Into<Cow<'static, str>>,
{
    #[track_caller]
    fn from((kind, desc, detail): (ErrorKind, &'static str, D)) -> RelayError {
        RelayError::from_components(kind, Cow::Borrowed(desc), Some(detail.into()), None)
    }
}

impl From<std::io::Error> for RelayError {
    #[track_caller]
    fn from(err: std::io::Error) -> RelayError {
        let detail = err.to_string();
        RelayError::from_components(
            ErrorKind::IoError,
            Cow::Borrowed("I/O operation failed"),
            Some(Cow::Owned(detail)),
            Some(Arc::new(err)),
        )
    }
}

impl From<serde_json::Error> for RelayError {
    #[track_caller]
    fn from(err: serde_json::Error) -> RelayError {
        let detail = err.to_string();
        RelayError::from_components(
            ErrorKind::DeserializationError,
            Cow::Borrowed("JSON deserialization failed"),
            Some(Cow::Owned(detail)),
            Some(Arc::new(err)),
        )
    }
}

/// Splits [`sqlx::Error`] into connection-level and query-level failures.
impl From<sqlx::Error> for RelayError {
    #[track_caller]
    fn from(err: sqlx::Error) -> RelayError {
        let (kind, description) = match &err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => (
                ErrorKind::StoreConnectionFailed,
                "State store connection failed",
            ),
            _ => (ErrorKind::StoreQueryFailed, "State store query failed"),
        };

        let detail = err.to_string();
        RelayError::from_components(
            kind,
            Cow::Borrowed(description),
            Some(Cow::Owned(detail)),
            Some(Arc::new(err)),
        )
    }
}

/// The relay component a fatal error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    /// The inbound event host loop (the HTTP server in the service).
    EventIngestion,
    /// The inbound command host loop.
    CommandHandler,
    /// The notification consumer loop.
    Dispatcher,
}

impl Component {
    pub fn as_static_str(&self) -> &'static str {
        match self {
            Component::EventIngestion => "event_ingestion",
            Component::CommandHandler => "command_handler",
            Component::Dispatcher => "dispatcher",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_static_str())
    }
}

/// An error that ends the process, tagged with the component that raised it.
#[derive(Debug, Clone, Error)]
#[error("{component} stopped: {error}")]
pub struct FatalError {
    pub component: Component,
    #[source]
    pub error: RelayError,
}

impl FatalError {
    pub fn new(component: Component, error: RelayError) -> Self {
        Self { component, error }
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}
