use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::RelayResult;
use crate::store::StatusStore;
use crate::types::{Destination, LockTransition, ServerStatus};

/// In-memory status store.
///
/// Keeps all rows behind a single async mutex. State is lost on restart, which makes it suitable
/// for tests and local development. Rows must be created with [`MemoryStore::insert_server`] (or
/// [`MemoryStore::with_servers`]) since the relay itself never creates them.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<BTreeMap<String, ServerStatus>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with unlocked, unsubscribed rows for `names`.
    pub fn with_servers<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows = names
            .into_iter()
            .map(|name| {
                let status = ServerStatus::new(name);
                (status.name.clone(), status)
            })
            .collect();

        Self {
            inner: Arc::new(Mutex::new(rows)),
        }
    }

    /// Creates an unlocked row for `name` unless one already exists.
    pub async fn insert_server(&self, name: impl Into<String>) {
        let name = name.into();
        let mut inner = self.inner.lock().await;

        inner
            .entry(name.clone())
            .or_insert_with(|| ServerStatus::new(name));
    }

    /// Returns a snapshot of every row, ordered by name.
    pub async fn statuses(&self) -> Vec<ServerStatus> {
        let inner = self.inner.lock().await;

        inner.values().cloned().collect()
    }
}

impl StatusStore for MemoryStore {
    async fn read(&self, name: &str) -> RelayResult<Option<ServerStatus>> {
        let inner = self.inner.lock().await;

        Ok(inner.get(name).cloned())
    }

    async fn set_lock(
        &self,
        name: &str,
        actor: &str,
        transition: LockTransition,
    ) -> RelayResult<()> {
        let mut inner = self.inner.lock().await;

        if let Some(status) = inner.get_mut(name) {
            status.apply(actor, transition);
        }

        Ok(())
    }

    async fn set_subscriber(&self, name: &str, destination: &Destination) -> RelayResult<()> {
        let mut inner = self.inner.lock().await;

        if let Some(status) = inner.get_mut(name) {
            status.subscriber = Some(destination.clone());
        }

        Ok(())
    }

    async fn list_subscribed(&self, destination: &Destination) -> RelayResult<Vec<ServerStatus>> {
        let inner = self.inner.lock().await;

        Ok(inner
            .values()
            .filter(|status| status.subscriber.as_ref() == Some(destination))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn read_reflects_the_latest_lock_write() {
        let store = MemoryStore::with_servers(["db1"]);

        store
            .set_lock("db1", "alice", LockTransition::Acquire)
            .await
            .unwrap();
        let status = store.read("db1").await.unwrap().unwrap();
        assert!(status.is_open);
        assert_eq!(status.lock_holder.as_deref(), Some("alice"));

        store
            .set_lock("db1", "bob", LockTransition::Release)
            .await
            .unwrap();
        let status = store.read("db1").await.unwrap().unwrap();
        assert!(!status.is_open);
        assert_eq!(status.lock_holder, None);
    }

    #[tokio::test]
    async fn updates_against_missing_rows_are_no_ops() {
        let store = MemoryStore::new();

        store
            .set_lock("ghost", "alice", LockTransition::Acquire)
            .await
            .unwrap();
        store
            .set_subscriber("ghost", &Destination::new("42"))
            .await
            .unwrap();

        assert_eq!(store.read("ghost").await.unwrap(), None);
        assert!(store.statuses().await.is_empty());
    }

    #[tokio::test]
    async fn subscribe_overwrites_previous_subscriber() {
        let store = MemoryStore::with_servers(["db1", "db2"]);
        let first = Destination::new("1");
        let second = Destination::new("2");

        store.set_subscriber("db1", &first).await.unwrap();
        store.set_subscriber("db2", &first).await.unwrap();
        store.set_subscriber("db1", &second).await.unwrap();

        let status = store.read("db1").await.unwrap().unwrap();
        assert_eq!(status.subscriber, Some(second.clone()));

        let names: Vec<_> = store
            .list_subscribed(&first)
            .await
            .unwrap()
            .into_iter()
            .map(|status| status.name)
            .collect();
        assert_eq!(names, vec!["db2"]);
    }

    #[tokio::test]
    async fn insert_server_keeps_existing_rows() {
        let store = MemoryStore::with_servers(["db1"]);
        store
            .set_lock("db1", "alice", LockTransition::Acquire)
            .await
            .unwrap();

        store.insert_server("db1").await;

        let status = store.read("db1").await.unwrap().unwrap();
        assert!(status.is_open);
    }
}
