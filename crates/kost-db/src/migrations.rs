//! # Schema Migrations
//!
//! The SQL files under `migrations/sqlite/` are compiled into the binary and
//! applied when a [`Database`](crate::Database) opens. `_sqlx_migrations`
//! records which versions a file already has.
//!
//! | Version | File                              | Adds                                      |
//! |---------|-----------------------------------|-------------------------------------------|
//! | 1       | `001_initial_schema.sql`          | properties, rooms, bookings, orders, reviews |
//! | 2       | `002_link_bookings_to_orders.sql` | `bookings.order_id`                       |
//!
//! A released file is never edited; schema changes go in the next number.

use sqlx::migrate::Migrator;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Where the schema of one database file stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaStatus {
    /// Versions applied successfully, ascending.
    pub applied: Vec<i64>,
    /// Embedded versions not applied yet, ascending.
    pub pending: Vec<i64>,
}

impl SchemaStatus {
    /// Highest applied version; `None` for a fresh file.
    pub fn version(&self) -> Option<i64> {
        self.applied.last().copied()
    }

    pub fn is_current(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Compares the embedded migrations with what the file has applied.
pub async fn schema_status(pool: &SqlitePool) -> DbResult<SchemaStatus> {
    let tracked: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?;

    let applied: Vec<i64> = if tracked == 0 {
        Vec::new()
    } else {
        sqlx::query_scalar("SELECT version FROM _sqlx_migrations WHERE success = 1 ORDER BY version")
            .fetch_all(pool)
            .await?
    };

    let pending = MIGRATOR
        .iter()
        .map(|migration| migration.version)
        .filter(|version| !applied.contains(version))
        .collect();

    Ok(SchemaStatus { applied, pending })
}

/// Applies pending migrations and returns the resulting status.
///
/// Opening an up-to-date file runs no SQL beyond the status queries.
pub async fn migrate(pool: &SqlitePool) -> DbResult<SchemaStatus> {
    let before = schema_status(pool).await?;
    if before.is_current() {
        debug!(version = ?before.version(), "Schema up to date");
        return Ok(before);
    }

    info!(from = ?before.version(), pending = ?before.pending, "Applying schema migrations");
    MIGRATOR.run(pool).await?;

    let after = schema_status(pool).await?;
    info!(version = ?after.version(), "Schema migrated");
    Ok(after)
}
