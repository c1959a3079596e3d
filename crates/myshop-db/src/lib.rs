//! # myshop-db: Database Layer and Order Services for MyShop
//!
//! SQLite persistence through sqlx, plus the order services that run on it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        MyShop Data Flow                                 │
//! │                                                                         │
//! │  Request layer (place_order / get_order / get_user_orders)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    myshop-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ ProductRepo   │    │ 001_initial  │  │   │
//! │  │   │ SqlitePool    │◄───│ OrderRepo     │    │   _schema    │  │   │
//! │  │   │ DbConfig      │    │ stock ledger  │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │            ▲                                                    │   │
//! │  │            │            ┌───────────────┐                       │   │
//! │  │            └────────────│ OrderService  │                       │   │
//! │  │                         │ PricingResolver│                      │   │
//! │  │                         └───────────────┘                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (WAL)                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`config`] - `DbConfig::from_env`
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Catalog, orders, stock ledger
//! - [`service`] - Order placement and queries
//!
//! ## Usage
//!
//! ```rust,ignore
//! use myshop_core::LineRequest;
//! use myshop_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::from_env()?).await?;
//! let orders = db.order_service();
//!
//! let order = orders
//!     .place_order("user-42", vec![LineRequest::new(product_id, 2)])
//!     .await?;
//! let page = orders.get_user_orders("user-42", Some(1), Some(10)).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::ConfigError;
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
pub use repository::stock::Reservation;

pub use service::{ErrorBody, ErrorCode, OrderError, OrderResult, OrderService};
