//! # Connection Pool
//!
//! [`DbConfig`] describes the SQLite file and pool limits; [`Database`] owns
//! the resulting `SqlitePool` and hands out repositories and the order
//! service.
//!
//! ```text
//!   DbConfig ──► Database::new ──► SqlitePool (WAL, FKs on, busy_timeout)
//!                     │
//!                     ├── products()       ProductRepository
//!                     ├── orders()         OrderRepository
//!                     └── order_service()  OrderService
//! ```
//!
//! Placement transactions serialize on SQLite's single write lock. A writer
//! that cannot get the lock within `busy_timeout` fails with a retryable
//! error; readers are never blocked in WAL mode.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::order::OrderRepository;
use crate::repository::product::ProductRepository;
use crate::service::OrderService;

// =============================================================================
// Configuration
// =============================================================================

/// Pool and SQLite settings. Build with [`DbConfig::new`],
/// [`DbConfig::in_memory`] or `DbConfig::from_env` (see `config.rs`).
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_path: PathBuf,

    /// Default: 5
    pub max_connections: u32,

    /// Default: 1
    pub min_connections: u32,

    /// How long `acquire` waits for a free connection.
    pub connect_timeout: Duration,

    pub idle_timeout: Duration,

    /// How long a connection waits for SQLite's write lock.
    /// Default: 5 seconds
    pub busy_timeout: Duration,

    pub run_migrations: bool,
}

impl DbConfig {
    /// File-backed store at `path`, created on first connect.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Private in-memory store for tests.
    ///
    /// Limited to one connection: each `:memory:` connection is its own
    /// database.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Shared handle to the store. Clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (creating if needed) the database, builds the pool and applies
    /// pending migrations when `config.run_migrations` is set.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening database"
        );

        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(config.busy_timeout)
            .create_if_missing(true);

        debug!(busy_timeout_ms = config.busy_timeout.as_millis() as u64, "Connect options ready");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(max_connections = config.max_connections, "Database pool created");

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Raw pool, for transactions and ad-hoc queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    /// A new order service with its own order-number sequence. Clone the
    /// service, not the database, to share the sequence between tasks.
    pub fn order_service(&self) -> OrderService {
        OrderService::new(self.clone())
    }

    pub async fn close(&self) {
        info!("Closing database pool");
        self.pool.close().await;
    }

    /// `true` when a trivial query succeeds.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
