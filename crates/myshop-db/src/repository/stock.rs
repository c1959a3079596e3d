//! # Stock Ledger
//!
//! The only code path that lowers `products.stock`.
//!
//! ## Conditional Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Read-compare-write vs conditional UPDATE               │
//! │                                                                         │
//! │  ❌ WRONG: two statements, a race in between                           │
//! │     SELECT stock FROM products WHERE id = P        -- both see 1       │
//! │     UPDATE products SET stock = 0 WHERE id = P     -- both "win"       │
//! │                                                                         │
//! │  ✅ CORRECT: the check and the write are one statement                 │
//! │     UPDATE products SET stock = stock - ?2                             │
//! │     WHERE id = ?1 AND deleted_at IS NULL AND stock >= ?2               │
//! │                                                                         │
//! │     1 row  → reserved, RETURNING gives the new level                   │
//! │     0 rows → read stock in the same tx to tell "too few" from "gone"   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function takes the caller's connection so it runs inside the
//! placement transaction (`&mut *tx`). Nothing here commits.

use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::DbResult;

/// Outcome of a conditional decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reservation {
    /// Stock was decremented; `remaining` is the level after the decrement.
    Reserved { remaining: i64 },
    /// Product exists but holds fewer than the requested units.
    Insufficient { available: i64 },
    /// No such product, or it was soft-deleted.
    Missing,
}

/// Decrements `product_id`'s stock by `quantity` if at least that much is
/// available. No effect otherwise.
///
/// `quantity` must be positive; placement validates it before opening the
/// transaction.
pub async fn reserve(
    conn: &mut SqliteConnection,
    product_id: &str,
    quantity: i64,
) -> DbResult<Reservation> {
    let now = Utc::now();

    let remaining: Option<i64> = sqlx::query_scalar(
        r#"
        UPDATE products
        SET
            stock = stock - ?2,
            updated_at = ?3
        WHERE id = ?1 AND deleted_at IS NULL AND stock >= ?2
        RETURNING stock
        "#,
    )
    .bind(product_id)
    .bind(quantity)
    .bind(now)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(remaining) = remaining {
        debug!(product_id = %product_id, quantity, remaining, "Stock reserved");
        return Ok(Reservation::Reserved { remaining });
    }

    // Same transaction, so this is the value the UPDATE just compared against.
    let outcome = match available(conn, product_id).await? {
        Some(available) => Reservation::Insufficient { available },
        None => Reservation::Missing,
    };

    debug!(product_id = %product_id, quantity, ?outcome, "Stock reservation refused");
    Ok(outcome)
}

/// Current stock of a product that is not soft-deleted.
pub async fn available(conn: &mut SqliteConnection, product_id: &str) -> DbResult<Option<i64>> {
    let stock: Option<i64> = sqlx::query_scalar(
        "SELECT stock FROM products WHERE id = ?1 AND deleted_at IS NULL",
    )
    .bind(product_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(stock)
}

// =============================================================================
// Unit Tests
// =============================================================================
