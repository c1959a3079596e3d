//! # Order Service Errors
//!
//! What callers of [`OrderService`](super::OrderService) see.
//!
//! ## Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CoreError::EmptyOrder            ─► OrderError::EmptyOrder            │
//! │  CoreError::InvalidQuantity       ─► OrderError::InvalidQuantity       │
//! │  CoreError::Validation            ─► OrderError::Validation            │
//! │  Reservation::Insufficient        ─► OrderError::InsufficientStock     │
//! │  Reservation::Missing / no row    ─► OrderError::ProductNotFound       │
//! │  DbError::InvalidInput            ─► OrderError::Validation            │
//! │  any other DbError                ─► OrderError::Persistence (retry)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use crate::error::DbError;
use myshop_core::{CoreError, ValidationError};

/// Order placement and query failures.
///
/// Everything except `Persistence` is final for the given input. A
/// `Persistence` failure left no trace in the store and the whole call can be
/// repeated.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Order must contain at least one line")]
    EmptyOrder,

    #[error("Invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity { product_id: String, quantity: i64 },

    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Validation error: {0}")]
    Validation(ValidationError),

    #[error("Order amount overflow")]
    AmountOverflow,

    /// Storage or transaction failure (busy database, pool timeout, order
    /// number collision).
    #[error("Persistence failure: {0}")]
    Persistence(DbError),
}

impl OrderError {
    /// Whether repeating the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, OrderError::Persistence(_))
    }

    /// Machine-readable code for the request layer.
    pub fn code(&self) -> ErrorCode {
        match self {
            OrderError::ProductNotFound(_) | OrderError::OrderNotFound(_) => ErrorCode::NotFound,
            OrderError::EmptyOrder
            | OrderError::InvalidQuantity { .. }
            | OrderError::Validation(_)
            | OrderError::AmountOverflow => ErrorCode::ValidationError,
            OrderError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            OrderError::Persistence(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<CoreError> for OrderError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::EmptyOrder => OrderError::EmptyOrder,
            CoreError::InvalidQuantity {
                product_id,
                quantity,
            } => OrderError::InvalidQuantity {
                product_id,
                quantity,
            },
            CoreError::AmountOverflow => OrderError::AmountOverflow,
            CoreError::Validation(e) => OrderError::Validation(e),
        }
    }
}

impl From<ValidationError> for OrderError {
    fn from(err: ValidationError) -> Self {
        OrderError::Validation(err)
    }
}

impl From<DbError> for OrderError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::InvalidInput(e) => OrderError::Validation(e),
            other => OrderError::Persistence(other),
        }
    }
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        OrderError::from(DbError::from(err))
    }
}

/// Result type for order service operations.
pub type OrderResult<T> = Result<T, OrderError>;

// =============================================================================
// Request-layer shape
// =============================================================================

/// Error codes handed to the request layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Product or order does not exist (404)
    NotFound,

    /// Bad input (400)
    ValidationError,

    /// Not enough stock for a line (409)
    InsufficientStock,

    /// Transient storage failure; safe to retry (503)
    DatabaseError,
}

/// Serializable error body.
///
/// ```json
/// { "code": "INSUFFICIENT_STOCK", "message": "Insufficient stock for ...", "retryable": false }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
    pub retryable: bool,
}

impl From<&OrderError> for ErrorBody {
    fn from(err: &OrderError) -> Self {
        let message = match err {
            // Storage details stay in the logs.
            OrderError::Persistence(inner) => {
                tracing::error!(error = %inner, "Order persistence failure");
                "Order could not be stored, please retry".to_string()
            }
            other => other.to_string(),
        };

        ErrorBody {
            code: err.code(),
            message,
            retryable: err.is_retryable(),
        }
    }
}
