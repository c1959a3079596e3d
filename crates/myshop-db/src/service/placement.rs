//! Order placement: price, assemble, then persist and reserve stock in one
//! transaction.

use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::error::{OrderError, OrderResult};
use super::OrderService;
use crate::repository::order;
use crate::repository::stock::{self, Reservation};
use myshop_core::validation::{validate_identifier, validate_line_requests};
use myshop_core::{assemble_order, format_order_number, LineRequest, NewOrder, Order};

impl OrderService {
    /// Places an order for `user_id`.
    ///
    /// Either the whole order is stored with every line's stock reserved, or
    /// nothing is: no order row, no line rows, no stock change.
    ///
    /// ## Errors
    /// - `Validation`, `EmptyOrder`, `InvalidQuantity` before touching the store
    /// - `ProductNotFound` for unknown or soft-deleted products
    /// - `InsufficientStock` naming the first line that could not be reserved
    /// - `Persistence` for storage failures; retry the whole call
    ///
    /// ## Example
    /// ```rust,ignore
    /// let order = service
    ///     .place_order("user-42", vec![LineRequest::new(lamp_id, 3)])
    ///     .await?;
    /// assert_eq!(order.status, OrderStatus::Pending);
    /// ```
    pub async fn place_order(&self, user_id: &str, lines: Vec<LineRequest>) -> OrderResult<Order> {
        validate_identifier("user_id", user_id)?;
        validate_line_requests(&lines)?;

        debug!(user_id = %user_id, lines = lines.len(), "Placing order");

        let priced = self.pricing.price_lines(lines).await?;

        let now = Utc::now();
        let order_no = format_order_number(now, user_id, self.next_sequence(), entropy());
        let order = assemble_order(NewOrder {
            id: Uuid::new_v4().to_string(),
            order_no,
            user_id: user_id.to_string(),
            created_at: now,
            lines: priced,
        })?;

        let mut tx = self.db.pool().begin().await?;

        if let Err(err) = persist_and_reserve(&mut tx, &order).await {
            warn!(
                user_id = %user_id,
                order_no = %order.order_no,
                error = %err,
                "Order placement rolled back"
            );
            if let Err(rollback_err) = tx.rollback().await {
                // Dropping the transaction rolls back as well.
                warn!(error = %rollback_err, "Explicit rollback failed");
            }
            return Err(err);
        }

        tx.commit().await?;

        info!(
            order_id = %order.id,
            order_no = %order.order_no,
            user_id = %user_id,
            total = %order.total(),
            "Order placed"
        );

        Ok(order)
    }
}

/// Writes the order, then reserves stock line by line. Stops at the first
/// failure; the caller rolls back.
async fn persist_and_reserve(conn: &mut SqliteConnection, order: &Order) -> OrderResult<()> {
    order::insert(conn, order).await?;

    for line in &order.lines {
        match stock::reserve(conn, &line.product_id, line.quantity).await? {
            Reservation::Reserved { .. } => {}
            Reservation::Insufficient { available } => {
                return Err(OrderError::InsufficientStock {
                    product_id: line.product_id.clone(),
                    available,
                    requested: line.quantity,
                });
            }
            // Soft-deleted between pricing and reservation.
            Reservation::Missing => {
                return Err(OrderError::ProductNotFound(line.product_id.clone()));
            }
        }
    }

    Ok(())
}

/// 16 random bits for the order number.
fn entropy() -> u16 {
    let bytes = Uuid::new_v4().into_bytes();
    u16::from_be_bytes([bytes[0], bytes[1]])
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::test_support::{order_row_counts, seed_product, stock_of, test_db};
    use myshop_core::{Money, OrderStatus, ValidationError, ORDER_NUMBER_LEN};

    #[tokio::test]
    async fn test_last_units_scenario() {
        let db = test_db().await;
        let service = db.order_service();
        let p = seed_product(&db, "P", 1000, 5).await;

        let a = service
            .place_order("user-a", vec![LineRequest::new(p.id.clone(), 3)])
            .await
            .unwrap();
        assert_eq!(a.status, OrderStatus::Pending);
        assert_eq!(a.total(), Money::from_cents(3000));
        assert_eq!(a.total().to_string(), "30.00");
        assert_eq!(stock_of(&db, &p.id).await, 2);

        let err = service
            .place_order("user-b", vec![LineRequest::new(p.id.clone(), 3)])
            .await
            .unwrap_err();
        match err {
            OrderError::InsufficientStock {
                product_id,
                available,
                requested,
            } => {
                assert_eq!(product_id, p.id);
                assert_eq!(available, 2);
                assert_eq!(requested, 3);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
        assert_eq!(stock_of(&db, &p.id).await, 2);
        assert_eq!(order_row_counts(&db).await, (1, 1));
    }

    #[tokio::test]
    async fn test_total_is_sum_of_lines() {
        let db = test_db().await;
        let service = db.order_service();
        let a = seed_product(&db, "A", 1099, 10).await;
        let b = seed_product(&db, "B", 250, 10).await;

        let order = service
            .place_order(
                "user-1",
                vec![
                    LineRequest::new(a.id.clone(), 2),
                    LineRequest::new(b.id.clone(), 4),
                ],
            )
            .await
            .unwrap();

        assert_eq!(order.total_cents, 2 * 1099 + 4 * 250);
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.lines[0].product_id, a.id);
        assert_eq!(order.lines[1].unit_price_cents, 250);
        assert_eq!(order.order_no.len(), ORDER_NUMBER_LEN);
        assert_eq!(stock_of(&db, &a.id).await, 8);
        assert_eq!(stock_of(&db, &b.id).await, 6);
    }

    #[tokio::test]
    async fn test_failure_on_later_line_rolls_back_everything() {
        let db = test_db().await;
        let service = db.order_service();
        let plenty = seed_product(&db, "Plenty", 100, 50).await;
        let scarce = seed_product(&db, "Scarce", 100, 1).await;

        let err = service
            .place_order(
                "user-1",
                vec![
                    LineRequest::new(plenty.id.clone(), 5),
                    LineRequest::new(scarce.id.clone(), 2),
                ],
            )
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::InsufficientStock { available: 1, requested: 2, .. }));
        assert_eq!(stock_of(&db, &plenty.id).await, 50);
        assert_eq!(stock_of(&db, &scarce.id).await, 1);
        assert_eq!(order_row_counts(&db).await, (0, 0));
    }

    #[tokio::test]
    async fn test_storage_failure_mid_transaction_is_retryable_and_rolls_back() {
        let db = test_db().await;
        let service = db.order_service();
        let first = seed_product(&db, "First", 100, 10).await;
        let second = seed_product(&db, "Second", 100, 10).await;

        // The second line's decrement fails after the order rows and the
        // first reservation are already written.
        sqlx::query(&format!(
            "CREATE TRIGGER fail_second_stock BEFORE UPDATE OF stock ON products \
             WHEN OLD.id = '{}' BEGIN SELECT RAISE(ABORT, 'disk on fire'); END",
            second.id
        ))
        .execute(db.pool())
        .await
        .unwrap();

        let err = service
            .place_order(
                "user-1",
                vec![
                    LineRequest::new(first.id.clone(), 4),
                    LineRequest::new(second.id.clone(), 1),
                ],
            )
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::Persistence(_)), "got {err:?}");
        assert!(err.is_retryable());
        assert_eq!(order_row_counts(&db).await, (0, 0));
        assert_eq!(stock_of(&db, &first.id).await, 10);
        assert_eq!(stock_of(&db, &second.id).await, 10);
    }

    #[tokio::test]
    async fn test_same_product_on_two_lines_counts_both() {
        let db = test_db().await;
        let service = db.order_service();
        let p = seed_product(&db, "P", 100, 4).await;

        let err = service
            .place_order(
                "user-1",
                vec![LineRequest::new(p.id.clone(), 3), LineRequest::new(p.id.clone(), 2)],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::InsufficientStock { available: 1, requested: 2, .. }));
        assert_eq!(stock_of(&db, &p.id).await, 4);
    }

    #[tokio::test]
    async fn test_validation_happens_before_store_access() {
        let db = test_db().await;
        let service = db.order_service();

        assert!(matches!(
            service.place_order("user-1", vec![]).await,
            Err(OrderError::EmptyOrder)
        ));
        assert!(matches!(
            service
                .place_order("user-1", vec![LineRequest::new("whatever", 0)])
                .await,
            Err(OrderError::InvalidQuantity { quantity: 0, .. })
        ));
        assert!(matches!(
            service
                .place_order("  ", vec![LineRequest::new("whatever", 1)])
                .await,
            Err(OrderError::Validation(ValidationError::Required { .. }))
        ));
        assert_eq!(order_row_counts(&db).await, (0, 0));
    }

    #[tokio::test]
    async fn test_unknown_product_fails_before_mutation() {
        let db = test_db().await;
        let service = db.order_service();
        let p = seed_product(&db, "P", 100, 4).await;

        let err = service
            .place_order(
                "user-1",
                vec![LineRequest::new(p.id.clone(), 1), LineRequest::new("ghost", 1)],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::ProductNotFound(id) if id == "ghost"));
        assert_eq!(stock_of(&db, &p.id).await, 4);
        assert_eq!(order_row_counts(&db).await, (0, 0));
    }

    #[tokio::test]
    async fn test_product_deleted_after_pricing_is_not_found() {
        let db = test_db().await;
        let p = seed_product(&db, "P", 100, 4).await;

        let order = Order {
            id: "o-1".to_string(),
            user_id: "user-1".to_string(),
            order_no: "NO-1".to_string(),
            status: OrderStatus::Pending,
            total_cents: 100,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            lines: vec![myshop_core::OrderLine {
                order_id: "o-1".to_string(),
                line_no: 0,
                product_id: p.id.clone(),
                quantity: 1,
                unit_price_cents: 100,
            }],
        };
        db.products().soft_delete(&p.id).await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        let err = persist_and_reserve(&mut tx, &order).await.unwrap_err();
        tx.rollback().await.unwrap();

        assert!(matches!(err, OrderError::ProductNotFound(_)));
        assert_eq!(order_row_counts(&db).await, (0, 0));
    }

    #[tokio::test]
    async fn test_order_numbers_are_unique() {
        let db = test_db().await;
        let service = db.order_service();
        let p = seed_product(&db, "P", 100, 100).await;

        let mut numbers = std::collections::HashSet::new();
        for _ in 0..20 {
            let order = service
                .place_order("user-1", vec![LineRequest::new(p.id.clone(), 1)])
                .await
                .unwrap();
            assert!(numbers.insert(order.order_no));
        }
        assert_eq!(stock_of(&db, &p.id).await, 80);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_buyers_for_last_unit() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("race.db")).max_connections(4))
            .await
            .unwrap();
        let p = seed_product(&db, "Last One", 500, 1).await;

        let mut handles = Vec::new();
        for buyer in 0..2 {
            let service = db.order_service();
            let product_id = p.id.clone();
            handles.push(tokio::spawn(async move {
                service
                    .place_order(&format!("buyer-{buyer}"), vec![LineRequest::new(product_id, 1)])
                    .await
            }));
        }

        let mut placed = 0;
        let mut refused = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => placed += 1,
                Err(OrderError::InsufficientStock { available: 0, .. }) => refused += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!((placed, refused), (1, 1));
        assert_eq!(stock_of(&db, &p.id).await, 0);
        assert_eq!(order_row_counts(&db).await, (1, 1));
        db.close().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_overlapping_orders_never_oversell() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("oversell.db")).max_connections(4))
            .await
            .unwrap();
        let p = seed_product(&db, "Batch", 100, 10).await;

        // 8 buyers × 3 units against 10 in stock: at most 3 can win.
        let service = db.order_service();
        let mut handles = Vec::new();
        for buyer in 0..8 {
            let service = service.clone();
            let product_id = p.id.clone();
            handles.push(tokio::spawn(async move {
                service
                    .place_order(&format!("buyer-{buyer}"), vec![LineRequest::new(product_id, 3)])
                    .await
            }));
        }

        let mut placed = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => placed += 1,
                Err(OrderError::InsufficientStock { .. }) => {}
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!(placed, 3);
        assert_eq!(stock_of(&db, &p.id).await, 1);
        assert_eq!(order_row_counts(&db).await, (3, 3));
        db.close().await;
    }
}
