//! # Domain Types
//!
//! Core domain types used throughout MyShop.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Order      │   │   OrderLine     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  order_id (FK)  │       │
//! │  │  price_cents    │   │  order_no       │   │  product_id     │       │
//! │  │  stock          │   │  status         │   │  quantity       │       │
//! │  │  status         │   │  total_cents    │   │  unit_price     │       │
//! │  └─────────────────┘   │  lines ─────────┼──►│  (snapshot)     │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every order has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - `order_no`: external reference handed to customers and support

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// Catalog lifecycle status of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    /// Listed in the catalog.
    #[default]
    Active,
    /// Taken off the shelf; still priced and reservable.
    Inactive,
}

/// A product owned by the catalog.
///
/// The order core only reads `price_cents` and `stock`, and only changes
/// `stock` through the stock ledger's conditional decrement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Optional long description.
    pub description: Option<String>,

    /// Unit price in cents.
    pub price_cents: i64,

    /// Units available to sell. Never negative.
    pub stock: i64,

    pub status: ProductStatus,

    pub category_id: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,

    /// Soft-delete marker. Deleted products cannot be ordered.
    #[ts(as = "Option<String>")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

// =============================================================================
// Price Quote
// =============================================================================

/// What the pricing resolver reads for one product at placement time.
///
/// `stock` is informational only; sufficiency is decided by the ledger
/// inside the placement transaction, never from this snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub product_id: String,
    pub unit_price: Money,
    pub stock: i64,
}

impl From<&Product> for PriceQuote {
    fn from(product: &Product) -> Self {
        PriceQuote {
            product_id: product.id.clone(),
            unit_price: product.price(),
            stock: product.stock,
        }
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of an order.
///
/// Placement only ever produces `Pending`; the other states belong to the
/// payment and fulfilment workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed, stock reserved, awaiting payment.
    #[default]
    Pending,
    Paid,
    Shipped,
    Completed,
    Cancelled,
}

// =============================================================================
// Order
// =============================================================================

/// An immutable order record with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: String,
    /// The already-authenticated buyer.
    pub user_id: String,
    /// Globally unique external reference.
    pub order_no: String,
    pub status: OrderStatus,
    /// Σ(unit price × quantity), fixed at placement.
    pub total_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
    /// Lines in request order. Loaded separately from `order_items`.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub lines: Vec<OrderLine>,
}

impl Order {
    /// Returns the order total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

// =============================================================================
// Order Line
// =============================================================================

/// A line of an order, keyed by `(order_id, line_no)`.
/// Uses snapshot pattern to freeze the unit price at time of placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderLine {
    pub order_id: String,
    /// Position in the original request, starting at 0.
    pub line_no: i64,
    pub product_id: String,
    pub quantity: i64,
    /// Unit price in cents at time of placement (frozen).
    pub unit_price_cents: i64,
}

impl OrderLine {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns unit price × quantity, or `None` on overflow.
    #[inline]
    pub fn line_total(&self) -> Option<Money> {
        self.unit_price().checked_mul_quantity(self.quantity)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
