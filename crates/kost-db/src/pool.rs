//! # Database Handle
//!
//! Opens the SQLite file behind the site, brings its schema up to date and
//! hands out the stores.
//!
//! ## Concurrency
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  check_availability ──► rooms() + bookings()   reads, any connection    │
//! │  confirm_order ───────► BEGIN ... COMMIT       one writer at a time     │
//! │                                                                         │
//! │  WAL journal: readers never wait for the writer.                       │
//! │  busy timeout: a second writer waits up to `timeout` for the lock      │
//! │  instead of failing at once with SQLITE_BUSY.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::booking::BookingStore;
use crate::repository::order::OrderStore;
use crate::repository::property::PropertyStore;
use crate::repository::review::ReviewStore;
use crate::repository::room::RoomStore;

/// Where the database lives and how many connections may use it.
///
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/kost/kost.db")
///     .max_connections(8)
///     .timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file; created on first open.
    pub database_path: PathBuf,

    /// Pool size. Default 5.
    pub max_connections: u32,

    /// How long to wait for a pooled connection, and for SQLite's write
    /// lock. Default 30 seconds.
    pub timeout: Duration,

    in_memory: bool,
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            timeout: Duration::from_secs(30),
            in_memory: false,
        }
    }

    /// A private in-memory database, used by tests.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            // every connection to :memory: would see its own empty database
            max_connections: 1,
            timeout: Duration::from_secs(5),
            in_memory: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = if self.in_memory {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&self.database_path)
                .create_if_missing(true)
        };

        Ok(options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(self.timeout))
    }
}

/// Shared handle to the kost database. Clones share one pool.
///
/// Besides the store accessors below, `Database` implements
/// [`kost_core::RoomRepository`] (see `availability.rs`) and
/// `owner_summary` (see `summary.rs`).
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the database and applies pending migrations.
    ///
    /// ## Returns
    /// * `Err(DbError::ConnectionFailed)` - File could not be opened
    /// * `Err(DbError::MigrationFailed)` - Schema could not be brought up to date
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            max_connections = config.max_connections,
            "Opening database"
        );

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.timeout)
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        let schema = migrations::migrate(&pool).await?;
        info!(schema_version = ?schema.version(), "Database ready");

        Ok(Database { pool })
    }

    /// The underlying pool, for transactions spanning several stores.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn properties(&self) -> PropertyStore {
        PropertyStore::new(self.pool.clone())
    }

    /// Rooms and their listing state.
    ///
    /// ```rust,ignore
    /// let rooms = db.rooms().list_available("Type 1").await?;
    /// ```
    pub fn rooms(&self) -> RoomStore {
        RoomStore::new(self.pool.clone())
    }

    /// Reservations (table `bookings`).
    pub fn bookings(&self) -> BookingStore {
        BookingStore::new(self.pool.clone())
    }

    pub fn orders(&self) -> OrderStore {
        OrderStore::new(self.pool.clone())
    }

    pub fn reviews(&self) -> ReviewStore {
        ReviewStore::new(self.pool.clone())
    }

    /// Closes every connection. Later queries fail, which the availability
    /// checker reports as a degraded answer.
    pub async fn close(&self) {
        info!("Closing database");
        self.pool.close().await;
    }
}
