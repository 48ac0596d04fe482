use std::future::Future;

use crate::error::RelayResult;
use crate::types::{Destination, LockTransition, ServerStatus};

/// Trait for reading and updating server status rows.
///
/// Implementations are cloned into every component that needs the store and must be safe to
/// call concurrently from the ingestion path, the command handler and the dispatcher.
pub trait StatusStore {
    /// Returns the status row for `name`, or `None` if no such server exists.
    fn read(&self, name: &str) -> impl Future<Output = RelayResult<Option<ServerStatus>>> + Send;

    /// Applies a lock transition to the row for `name`.
    ///
    /// An acquisition records `actor` as lock holder. A release clears the holder regardless of
    /// who held the lock. Does nothing if the row does not exist.
    fn set_lock(
        &self,
        name: &str,
        actor: &str,
        transition: LockTransition,
    ) -> impl Future<Output = RelayResult<()>> + Send;

    /// Replaces the subscriber of the row for `name`. Does nothing if the row does not exist.
    fn set_subscriber(
        &self,
        name: &str,
        destination: &Destination,
    ) -> impl Future<Output = RelayResult<()>> + Send;

    /// Returns every row whose subscriber is `destination`, ordered by name.
    fn list_subscribed(
        &self,
        destination: &Destination,
    ) -> impl Future<Output = RelayResult<Vec<ServerStatus>>> + Send;
}
