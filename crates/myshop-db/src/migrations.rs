//! # Schema Migrations
//!
//! The MyShop schema ships inside the binary. `Database::new` applies it on
//! startup unless `DbConfig::run_migrations(false)` is set.
//!
//! | File                      | Creates                                   |
//! |---------------------------|-------------------------------------------|
//! | `001_initial_schema.sql`  | `products`, `orders`, `order_items`       |
//!
//! New schema changes go in a new `NNN_description.sql` file under
//! `migrations/sqlite/`. Applied files are checksummed by sqlx, so editing
//! one after release breaks startup on existing databases.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// Embedded from `migrations/sqlite/` at compile time.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies every migration not yet recorded in `_sqlx_migrations`.
///
/// Each file runs in its own transaction; running this twice is a no-op.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!(embedded = MIGRATOR.migrations.len(), "Applying schema migrations");

    MIGRATOR.run(pool).await?;

    info!("Schema up to date");
    Ok(())
}

/// `(embedded, applied)` migration counts.
///
/// A database that never ran migrations reports zero applied.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let embedded = MIGRATOR.migrations.len();

    let has_table: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?;

    if has_table == 0 {
        return Ok((embedded, 0));
    }

    let applied: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await?;

    Ok((embedded, applied as usize))
}
