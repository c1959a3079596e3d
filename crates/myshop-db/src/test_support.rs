//! Fixtures shared by the unit tests in this crate.

use chrono::Utc;
use myshop_core::{Product, ProductStatus};

use crate::pool::{Database, DbConfig};
use crate::repository::product::generate_product_id;

/// Fresh, migrated in-memory database.
pub async fn test_db() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

pub fn sample_product(name: &str, price_cents: i64, stock: i64) -> Product {
    let now = Utc::now();
    Product {
        id: generate_product_id(),
        name: name.to_string(),
        description: None,
        price_cents,
        stock,
        status: ProductStatus::Active,
        category_id: None,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

/// Inserts a product and returns it.
pub async fn seed_product(db: &Database, name: &str, price_cents: i64, stock: i64) -> Product {
    db.products()
        .insert(&sample_product(name, price_cents, stock))
        .await
        .expect("insert product")
}

/// Current stock straight from the table, including soft-deleted rows.
pub async fn stock_of(db: &Database, product_id: &str) -> i64 {
    sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
        .bind(product_id)
        .fetch_one(db.pool())
        .await
        .expect("stock row")
}

/// Row counts of `orders` and `order_items`.
pub async fn order_row_counts(db: &Database) -> (i64, i64) {
    let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(db.pool())
        .await
        .expect("count orders");
    let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items")
        .fetch_one(db.pool())
        .await
        .expect("count order items");
    (orders, items)
}
