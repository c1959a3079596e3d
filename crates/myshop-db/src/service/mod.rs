//! # Order Services
//!
//! The operations exposed to the request layer.
//!
//! ## Placement Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  place_order(user_id, lines)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  0. validate (no store access yet)    EmptyOrder / InvalidQuantity      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. PricingResolver (pool reads)      ProductNotFound                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. assemble_order (myshop-core)      AmountOverflow                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. BEGIN                                                               │
//! │     ├── INSERT orders, order_items                                      │
//! │     ├── stock::reserve per line       InsufficientStock / ProductNotFound│
//! │     └── COMMIT  (or ROLLBACK on any error above)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - [`placement`] - `place_order`
//! - [`query`] - `get_order`, `get_user_orders`
//! - [`pricing`] - catalog price lookups
//! - [`error`] - `OrderError` and its request-layer shape

pub mod error;
pub mod placement;
pub mod pricing;
pub mod query;

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::pool::Database;
use pricing::PricingResolver;

pub use error::{ErrorBody, ErrorCode, OrderError, OrderResult};

/// Entry point for placing and reading orders.
///
/// Clones share the database pool and the order-number sequence.
#[derive(Debug, Clone)]
pub struct OrderService {
    db: Database,
    pricing: PricingResolver,
    sequence: Arc<AtomicU32>,
}

impl OrderService {
    pub fn new(db: Database) -> Self {
        let pricing = PricingResolver::new(db.products());
        OrderService {
            db,
            pricing,
            sequence: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Next value of the per-service order-number sequence (wraps).
    fn next_sequence(&self) -> u32 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }
}
