//! # myshop-core: Pure Domain Logic for MyShop
//!
//! This crate holds the order-placement rules as pure functions with zero I/O
//! dependencies. Everything that touches the database (pricing reads, stock
//! reservation, transactions) lives in `myshop-db`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        MyShop Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Request layer (HTTP, auth) - external              │   │
//! │  │        place_order, get_order, get_user_orders                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                myshop-db (services + SQLite)                    │   │
//! │  │   PricingResolver ─► assemble_order ─► tx { insert, reserve }   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ calls into                             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ myshop-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   order   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ assembler │  │ pagination│  │   │
//! │  │   │  Order    │  │           │  │ order no. │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Order, OrderLine, statuses)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`order`] - Order assembly and order-number formatting
//! - [`pagination`] - Page request normalization and page results
//! - [`error`] - Domain error types
//! - [`validation`] - Request validation
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use myshop_core::money::Money;
//! use myshop_core::order::{assemble_order, LineRequest, NewOrder, PricedLine};
//!
//! let lines = vec![PricedLine::new(LineRequest::new("prod-1", 3), Money::from_cents(1000))];
//! let order = assemble_order(NewOrder {
//!     id: "order-1".to_string(),
//!     order_no: "20260101000000000000000100010000".to_string(),
//!     user_id: "user-1".to_string(),
//!     created_at: Utc::now(),
//!     lines,
//! })
//! .unwrap();
//!
//! assert_eq!(order.total().to_string(), "30.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod order;
pub mod pagination;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::{assemble_order, format_order_number, LineRequest, NewOrder, PricedLine};
pub use pagination::{Page, PageRequest};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Page size used when a caller omits it or sends something below 1.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Length of a generated order number.
///
/// Matches the width of the `orders.order_no` column.
pub const ORDER_NUMBER_LEN: usize = 32;
