use std::time::Duration;

use lockrelay_config::shared::{IntoConnectOptions, PgConnectionConfig};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::{debug, info};

use crate::error::RelayResult;
use crate::store::StatusStore;
use crate::types::{Destination, LockTransition, ServerStatus};

/// Maximum number of connections in the pool.
///
/// Ingestion, the command handler and the dispatcher can each hold one connection at a time.
const MAX_POOL_CONNECTIONS: u32 = 3;

/// Duration after which idle connections are closed.
const IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Creates a lazily connected pool.
///
/// No connection is opened until the first query, so building the store never fails and a
/// database outage surfaces as a store error on the operation that needed it.
fn create_database_pool(config: &PgConnectionConfig) -> PgPool {
    PgPoolOptions::new()
        .min_connections(0)
        .max_connections(MAX_POOL_CONNECTIONS)
        .idle_timeout(Some(IDLE_TIMEOUT))
        .connect_lazy_with(config.with_db())
}

/// Postgres-backed status store.
///
/// Each operation is a single-row statement against `lockrelay.server_status`; Postgres row
/// locking gives the per-key atomicity the relay relies on, so no application-level lock is
/// taken.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(config: &PgConnectionConfig) -> Self {
        Self {
            pool: create_database_pool(config),
        }
    }

    /// Applies the store migrations bundled with this crate.
    pub async fn migrate(&self) -> RelayResult<()> {
        info!("applying state store migrations");

        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(sqlx::Error::from)?;

        Ok(())
    }
}

fn status_from_row(row: &PgRow) -> Result<ServerStatus, sqlx::Error> {
    let subscriber: Option<String> = row.try_get("subscriber_channel")?;

    Ok(ServerStatus {
        name: row.try_get("name")?,
        is_open: row.try_get("is_open")?,
        lock_holder: row.try_get("lock_holder")?,
        subscriber: subscriber.map(Destination::new),
    })
}

impl StatusStore for PostgresStore {
    async fn read(&self, name: &str) -> RelayResult<Option<ServerStatus>> {
        let row = sqlx::query(
            r#"
            select name, is_open, lock_holder, subscriber_channel
            from lockrelay.server_status
            where name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        let status = row.as_ref().map(status_from_row).transpose()?;

        Ok(status)
    }

    async fn set_lock(
        &self,
        name: &str,
        actor: &str,
        transition: LockTransition,
    ) -> RelayResult<()> {
        let result = match transition {
            LockTransition::Acquire => {
                sqlx::query(
                    r#"
                    update lockrelay.server_status
                    set is_open = true, lock_holder = $2
                    where name = $1
                    "#,
                )
                .bind(name)
                .bind(actor)
                .execute(&self.pool)
                .await?
            }
            LockTransition::Release => {
                sqlx::query(
                    r#"
                    update lockrelay.server_status
                    set is_open = false, lock_holder = null
                    where name = $1
                    "#,
                )
                .bind(name)
                .execute(&self.pool)
                .await?
            }
        };

        if result.rows_affected() == 0 {
            debug!(server = name, "no status row to update, lock change ignored");
        }

        Ok(())
    }

    async fn set_subscriber(&self, name: &str, destination: &Destination) -> RelayResult<()> {
        let result = sqlx::query(
            r#"
            update lockrelay.server_status
            set subscriber_channel = $2
            where name = $1
            "#,
        )
        .bind(name)
        .bind(destination.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            debug!(server = name, "no status row to update, subscription ignored");
        }

        Ok(())
    }

    async fn list_subscribed(&self, destination: &Destination) -> RelayResult<Vec<ServerStatus>> {
        let rows = sqlx::query(
            r#"
            select name, is_open, lock_holder, subscriber_channel
            from lockrelay.server_status
            where subscriber_channel = $1
            order by name
            "#,
        )
        .bind(destination.as_str())
        .fetch_all(&self.pool)
        .await?;

        let statuses = rows
            .iter()
            .map(status_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(statuses)
    }
}
