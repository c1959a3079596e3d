//! # Product Repository
//!
//! Catalog reads and writes.
//!
//! ## Key Operations
//! - Lookup by id (the pricing resolver's read path)
//! - Insert, update and soft delete
//! - Paginated listing
//!
//! ## Who Touches `stock`
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     products.stock writers                              │
//! │                                                                         │
//! │  insert()          sets the initial level          ✅                   │
//! │  update()          never touches stock             ✅                   │
//! │  stock::reserve()  conditional decrement in a tx   ✅                   │
//! │                                                                         │
//! │  Anything else writing `stock` would race with placement.  ❌           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use myshop_core::validation::validate_product;
use myshop_core::{Page, PageRequest, Product};

const PRODUCT_COLUMNS: &str = "id, name, description, price_cents, stock, status, category_id, \
     created_at, updated_at, deleted_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let product = repo.get_by_id("uuid-here").await?;
/// let page = repo.list(PageRequest::default()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - No such product, or it was soft-deleted
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Arguments
    /// * `product` - Product to insert (id should be generated beforehand)
    ///
    /// ## Returns
    /// * `Ok(Product)` - The inserted product
    /// * `Err(DbError::InvalidInput)` - Blank name, negative price or stock
    /// * `Err(DbError::UniqueViolation)` - ID already exists
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        validate_product(product)?;

        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, price_cents, stock, status,
                category_id, created_at, updated_at, deleted_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9, ?10
            )
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.status)
        .bind(&product.category_id)
        .bind(product.created_at)
        .bind(product.updated_at)
        .bind(product.deleted_at)
        .execute(&self.pool)
        .await?;

        Ok(product.clone())
    }

    /// Updates the catalog fields of an existing product.
    ///
    /// Name, description, price, status and category are written. `stock` in
    /// the argument is ignored: placement owns the counter.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Product doesn't exist or was soft-deleted
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        validate_product(product)?;

        debug!(id = %product.id, price_cents = product.price_cents, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                price_cents = ?4,
                status = ?5,
                category_id = ?6,
                updated_at = ?7
            WHERE id = ?1 AND deleted_at IS NULL
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.status)
        .bind(&product.category_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Soft-deletes a product by setting `deleted_at`.
    ///
    /// Existing order lines keep referencing the row. New placements see the
    /// product as missing.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET
                deleted_at = ?2,
                updated_at = ?2
            WHERE id = ?1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Lists products that are not soft-deleted, newest first.
    pub async fn list(&self, page: PageRequest) -> DbResult<Page<Product>> {
        debug!(page = page.page, page_size = page.page_size, "Listing products");

        let items = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE deleted_at IS NULL
             ORDER BY created_at DESC, id DESC
             LIMIT ?1 OFFSET ?2"
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE deleted_at IS NULL")
            .fetch_one(&self.pool)
            .await?;

        Ok(Page::new(items, total, page))
    }

    /// Counts active, non-deleted products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE status = 'active' AND deleted_at IS NULL",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
