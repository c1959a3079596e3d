//! # Error Types
//!
//! Domain-specific error types for myshop-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  myshop-core errors (this file)                                        │
//! │  ├── CoreError        - Order rule violations                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  myshop-db errors (separate crate)                                     │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── OrderError       - What order service callers see                 │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → OrderError → request layer        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Product, stock and lookup failures need the store, so they exist only on
//! `OrderError` in myshop-db.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Order rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Order request has no lines.
    #[error("Order must contain at least one line")]
    EmptyOrder,

    /// A line asks for zero or a negative quantity.
    #[error("Invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity { product_id: String, quantity: i64 },

    /// A line total or the order total does not fit in an i64 of cents.
    #[error("Order amount overflow")]
    AmountOverflow,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before any store interaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_message() {
        assert_eq!(CoreError::AmountOverflow.to_string(), "Order amount overflow");
    }

    #[test]
    fn test_invalid_quantity_message() {
        let err = CoreError::InvalidQuantity {
            product_id: "prod-1".to_string(),
            quantity: 0,
        };
        assert_eq!(err.to_string(), "Invalid quantity 0 for product prod-1");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "user_id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.to_string(), "Validation error: user_id is required");
    }
}
