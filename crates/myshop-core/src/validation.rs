//! # Validation Module
//!
//! Input validation for order requests and catalog writes.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request layer (external)                                     │
//! │  └── Deserialization, auth resolves user_id                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Non-empty line list, positive quantities                          │
//! │  └── Runs before any database interaction                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (stock >= 0), CHECK (quantity > 0)                          │
//! │  ├── UNIQUE (order_no)                                                 │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::order::LineRequest;
use crate::types::Product;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest identifier accepted for users and products.
const MAX_ID_LEN: usize = 64;

// =============================================================================
// Order Requests
// =============================================================================

/// Validates the line list of an order request.
///
/// ## Rules
/// - At least one line (`EmptyOrder`)
/// - Every quantity > 0 (`InvalidQuantity`, first offending line wins)
/// - Every product id non-blank
///
/// ## Example
/// ```rust
/// use myshop_core::order::LineRequest;
/// use myshop_core::validation::validate_line_requests;
/// use myshop_core::CoreError;
///
/// assert_eq!(validate_line_requests(&[]), Err(CoreError::EmptyOrder));
/// assert!(validate_line_requests(&[LineRequest::new("p-1", 2)]).is_ok());
/// ```
pub fn validate_line_requests(lines: &[LineRequest]) -> CoreResult<()> {
    if lines.is_empty() {
        return Err(CoreError::EmptyOrder);
    }

    for line in lines {
        validate_identifier("product_id", &line.product_id)?;

        if line.quantity <= 0 {
            return Err(CoreError::InvalidQuantity {
                product_id: line.product_id.clone(),
                quantity: line.quantity,
            });
        }
    }

    Ok(())
}

/// Validates an identifier handed in by a collaborator (user id, product id).
///
/// The value is trusted for authenticity, but it still has to be usable as a
/// key: non-blank and bounded in length.
pub fn validate_identifier(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > MAX_ID_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_ID_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Catalog Writes
// =============================================================================

/// Validates a catalog row before it is written.
///
/// Stock is checked here for inserts only; after that the stock ledger is the
/// only writer.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_identifier("id", &product.id)?;
    validate_product_name(&product.name)?;
    validate_price_cents(product.price_cents)?;
    validate_stock(product.stock)?;
    Ok(())
}

/// Validates a product name (1-128 characters after trimming).
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 128 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 128,
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed (free items).
///
/// ## Example
/// ```rust
/// use myshop_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(699_900).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates an initial stock level.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
