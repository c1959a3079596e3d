//! # Order Repository
//!
//! Writes orders inside the placement transaction and reads them back.
//!
//! ## Tables
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  orders                              order_items                        │
//! │  ─────────────────────               ─────────────────────────────      │
//! │  id (PK)              ◄──────────────order_id  ┐ PK                     │
//! │  user_id   ┐ idx_orders_user_created line_no   ┘                        │
//! │  created_at┘                         product_id → products.id           │
//! │  order_no (UNIQUE)                   quantity (> 0)                     │
//! │  status, total_cents                 unit_price_cents (snapshot)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Orders are immutable once written, so there is no update path here.

use std::collections::HashMap;

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use myshop_core::{Order, OrderLine, Page, PageRequest};

const ORDER_COLUMNS: &str = "id, user_id, order_no, status, total_cents, created_at, updated_at";
const LINE_COLUMNS: &str = "order_id, line_no, product_id, quantity, unit_price_cents";

/// Inserts an order and all of its lines on the caller's connection.
///
/// Meant to run inside the placement transaction; a failure part-way leaves
/// rows behind until the caller rolls back.
pub async fn insert(conn: &mut SqliteConnection, order: &Order) -> DbResult<()> {
    debug!(
        id = %order.id,
        order_no = %order.order_no,
        lines = order.lines.len(),
        "Inserting order"
    );

    sqlx::query(
        r#"
        INSERT INTO orders (
            id, user_id, order_no, status,
            total_cents, created_at, updated_at
        ) VALUES (
            ?1, ?2, ?3, ?4,
            ?5, ?6, ?7
        )
        "#,
    )
    .bind(&order.id)
    .bind(&order.user_id)
    .bind(&order.order_no)
    .bind(order.status)
    .bind(order.total_cents)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(&mut *conn)
    .await?;

    for line in &order.lines {
        sqlx::query(
            r#"
            INSERT INTO order_items (
                order_id, line_no, product_id, quantity, unit_price_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&line.order_id)
        .bind(line.line_no)
        .bind(&line.product_id)
        .bind(line.quantity)
        .bind(line.unit_price_cents)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Read side for orders.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Gets an order with its lines in `line_no` order.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut order) = order else {
            return Ok(None);
        };

        order.lines = self.get_lines(&order.id).await?;
        Ok(Some(order))
    }

    /// Gets the lines of one order.
    pub async fn get_lines(&self, order_id: &str) -> DbResult<Vec<OrderLine>> {
        let lines = sqlx::query_as::<_, OrderLine>(&format!(
            "SELECT {LINE_COLUMNS} FROM order_items WHERE order_id = ?1 ORDER BY line_no"
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// One page of a user's orders, newest first, lines populated.
    ///
    /// Ties on `created_at` are broken by `id` so pages never overlap. The
    /// page, its lines and `total` are read in one transaction, so `total`
    /// matches the snapshot the items came from.
    pub async fn list_by_user(&self, user_id: &str, page: PageRequest) -> DbResult<Page<Order>> {
        debug!(user_id = %user_id, page = page.page, page_size = page.page_size, "Listing orders");

        let mut tx = self.pool.begin().await?;

        let mut orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders
             WHERE user_id = ?1
             ORDER BY created_at DESC, id DESC
             LIMIT ?2 OFFSET ?3"
        ))
        .bind(user_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&mut *tx)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = ?1")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        if !orders.is_empty() {
            let mut lines = lines_for(&mut tx, &orders).await?;
            for order in &mut orders {
                order.lines = lines.remove(&order.id).unwrap_or_default();
            }
        }

        tx.commit().await?;

        Ok(Page::new(orders, total, page))
    }
}

/// Lines for a batch of orders in one query, grouped by order id.
async fn lines_for(
    conn: &mut SqliteConnection,
    orders: &[Order],
) -> DbResult<HashMap<String, Vec<OrderLine>>> {
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT {LINE_COLUMNS} FROM order_items WHERE order_id IN ("
    ));
    let mut ids = builder.separated(", ");
    for order in orders {
        ids.push_bind(order.id.clone());
    }
    ids.push_unseparated(") ORDER BY order_id, line_no");

    let rows: Vec<OrderLine> = builder
        .build_query_as::<OrderLine>()
        .fetch_all(&mut *conn)
        .await?;

    let mut grouped: HashMap<String, Vec<OrderLine>> = HashMap::new();
    for line in rows {
        grouped.entry(line.order_id.clone()).or_default().push(line);
    }
    Ok(grouped)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{order_row_counts, seed_product, test_db};
    use crate::DbError;
    use chrono::{Duration, Utc};
    use myshop_core::{Money, OrderStatus};

    fn order_for(user_id: &str, id: &str, product_id: &str, minutes_ago: i64) -> Order {
        let created_at = Utc::now() - Duration::minutes(minutes_ago);
        Order {
            id: id.to_string(),
            user_id: user_id.to_string(),
            order_no: format!("NO-{id}"),
            status: OrderStatus::Pending,
            total_cents: 2000,
            created_at,
            updated_at: created_at,
            lines: vec![
                OrderLine {
                    order_id: id.to_string(),
                    line_no: 0,
                    product_id: product_id.to_string(),
                    quantity: 1,
                    unit_price_cents: 1500,
                },
                OrderLine {
                    order_id: id.to_string(),
                    line_no: 1,
                    product_id: product_id.to_string(),
                    quantity: 1,
                    unit_price_cents: 500,
                },
            ],
        }
    }

    async fn insert_committed(db: &crate::Database, order: &Order) {
        let mut tx = db.pool().begin().await.unwrap();
        insert(&mut tx, order).await.unwrap();
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_insert_and_get_by_id() {
        let db = test_db().await;
        let product = seed_product(&db, "Lamp", 1500, 10).await;

        let order = order_for("u-1", "o-1", &product.id, 0);
        insert_committed(&db, &order).await;

        let loaded = db.orders().get_by_id("o-1").await.unwrap().unwrap();
        assert_eq!(loaded.user_id, "u-1");
        assert_eq!(loaded.status, OrderStatus::Pending);
        assert_eq!(loaded.lines, order.lines);
        assert_eq!(loaded.total(), Money::from_cents(2000));
        assert_eq!(
            loaded.created_at.timestamp_micros(),
            order.created_at.timestamp_micros()
        );

        assert!(db.orders().get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_order_no_is_unique_violation() {
        let db = test_db().await;
        let product = seed_product(&db, "Lamp", 1500, 10).await;

        insert_committed(&db, &order_for("u-1", "o-1", &product.id, 0)).await;

        let mut clash = order_for("u-1", "o-2", &product.id, 0);
        clash.order_no = "NO-o-1".to_string();

        let mut tx = db.pool().begin().await.unwrap();
        let err = insert(&mut tx, &clash).await.unwrap_err();
        tx.rollback().await.unwrap();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
        assert_eq!(order_row_counts(&db).await, (1, 2));
    }

    #[tokio::test]
    async fn test_line_for_unknown_product_is_foreign_key_violation() {
        let db = test_db().await;

        let mut tx = db.pool().begin().await.unwrap();
        let err = insert(&mut tx, &order_for("u-1", "o-1", "ghost", 0))
            .await
            .unwrap_err();
        tx.rollback().await.unwrap();

        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert_eq!(order_row_counts(&db).await, (0, 0));
    }

    #[tokio::test]
    async fn test_list_by_user_newest_first_with_lines() {
        let db = test_db().await;
        let product = seed_product(&db, "Lamp", 1500, 10).await;

        insert_committed(&db, &order_for("u-1", "old", &product.id, 30)).await;
        insert_committed(&db, &order_for("u-1", "new", &product.id, 1)).await;
        insert_committed(&db, &order_for("u-1", "mid", &product.id, 10)).await;
        insert_committed(&db, &order_for("u-2", "other", &product.id, 0)).await;

        let page = db
            .orders()
            .list_by_user("u-1", PageRequest::new(1, 2))
            .await
            .unwrap();

        assert_eq!(page.total, 3);
        let ids: Vec<&str> = page.items.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid"]);
        assert!(page.items.iter().all(|o| o.lines.len() == 2));
        assert_eq!(page.items[0].lines[0].unit_price_cents, 1500);

        let rest = db
            .orders()
            .list_by_user("u-1", PageRequest::new(2, 2))
            .await
            .unwrap();
        assert_eq!(rest.items.len(), 1);
        assert_eq!(rest.items[0].id, "old");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_list_total_agrees_with_items_during_writes() {
        let dir = tempfile::tempdir().unwrap();
        let db = crate::Database::new(crate::DbConfig::new(dir.path().join("list.db")).max_connections(4))
            .await
            .unwrap();
        let product = seed_product(&db, "Lamp", 1500, 10).await;

        let writer = {
            let db = db.clone();
            let product_id = product.id.clone();
            tokio::spawn(async move {
                for i in 0..40 {
                    insert_committed(&db, &order_for("u-1", &format!("o-{i}"), &product_id, 0)).await;
                }
            })
        };

        for _ in 0..40 {
            let page = db
                .orders()
                .list_by_user("u-1", PageRequest::new(1, 100))
                .await
                .unwrap();
            assert_eq!(page.items.len() as i64, page.total);
            assert!(page.items.iter().all(|o| o.lines.len() == 2));
        }

        writer.await.unwrap();
        let page = db
            .orders()
            .list_by_user("u-1", PageRequest::new(1, 100))
            .await
            .unwrap();
        assert_eq!(page.total, 40);
        db.close().await;
    }

    #[tokio::test]
    async fn test_list_for_user_without_orders() {
        let db = test_db().await;

        let page = db
            .orders()
            .list_by_user("nobody", PageRequest::default())
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
    }
}
