//! Lock-state notification relay.
//!
//! Tracks which named servers are currently locked, ingests lock transitions from push events,
//! answers status and subscription commands, and relays every transition to the subscriber of the
//! affected server. The moving parts are:
//!
//! - [`store`]: the keyed status store shared by every component.
//! - [`ingestion`]: turns a push event into a store write followed by a [`types::Notification`].
//! - [`commands`]: handles `status`, `subscribe` and `help` commands from the messaging client.
//! - [`dispatcher`]: drains notifications and delivers them to subscribers.
//! - [`supervisor`]: runs the host loops and stops everything on the first failure.
//!
//! Transports are not part of this crate; they plug in through the [`messaging`] traits and by
//! calling [`ingestion::EventIngestor::ingest`].

pub mod commands;
pub mod concurrency;
pub mod dispatcher;
pub mod error;
pub mod ingestion;
mod macros;
pub mod messaging;
pub mod metrics;
pub mod store;
pub mod supervisor;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod types;
