use crate::bail;
use crate::error::{ErrorKind, RelayResult};
use crate::store::StatusStore;
use crate::store::memory::MemoryStore;
use crate::types::{Destination, LockTransition, ServerStatus};

/// Store whose every operation fails with [`ErrorKind::StoreQueryFailed`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingStore;

impl StatusStore for FailingStore {
    async fn read(&self, _name: &str) -> RelayResult<Option<ServerStatus>> {
        bail!(ErrorKind::StoreQueryFailed, "State store query failed", "read");
    }

    async fn set_lock(
        &self,
        _name: &str,
        _actor: &str,
        _transition: LockTransition,
    ) -> RelayResult<()> {
        bail!(
            ErrorKind::StoreQueryFailed,
            "State store query failed",
            "set_lock"
        );
    }

    async fn set_subscriber(&self, _name: &str, _destination: &Destination) -> RelayResult<()> {
        bail!(
            ErrorKind::StoreQueryFailed,
            "State store query failed",
            "set_subscriber"
        );
    }

    async fn list_subscribed(&self, _destination: &Destination) -> RelayResult<Vec<ServerStatus>> {
        bail!(
            ErrorKind::StoreQueryFailed,
            "State store query failed",
            "list_subscribed"
        );
    }
}

/// Memory store holding unlocked rows for `names`.
pub fn seeded_memory_store(names: &[&str]) -> MemoryStore {
    MemoryStore::with_servers(names.iter().copied())
}
