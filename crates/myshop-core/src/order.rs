//! # Order Assembly
//!
//! Turns priced line requests into an immutable `Order` value.
//!
//! ## Where Assembly Sits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     place_order (myshop-db)                             │
//! │                                                                         │
//! │  [LineRequest] ──► PricingResolver ──► [PricedLine]                    │
//! │                                             │                           │
//! │                 clock, uuid, sequence ──►   ▼                           │
//! │                                     assemble_order ← THIS MODULE        │
//! │                                             │                           │
//! │                                             ▼                           │
//! │                              Order { status: Pending, total, lines }    │
//! │                                             │                           │
//! │                                             ▼                           │
//! │                           tx { insert order, reserve stock per line }   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything non-deterministic (ids, timestamps, entropy) is an input, so the
//! same `NewOrder` always assembles the same `Order`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Order, OrderLine, OrderStatus};
use crate::validation::{validate_identifier, validate_line_requests};
use crate::ORDER_NUMBER_LEN;

// =============================================================================
// Requests
// =============================================================================

/// One requested line: which product, how many units.
///
/// There is deliberately no price field. Prices always come from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineRequest {
    pub product_id: String,
    pub quantity: i64,
}

impl LineRequest {
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        LineRequest {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// A line request paired with the unit price the resolver read for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub request: LineRequest,
    pub unit_price: Money,
}

impl PricedLine {
    pub fn new(request: LineRequest, unit_price: Money) -> Self {
        PricedLine {
            request,
            unit_price,
        }
    }
}

/// Inputs to [`assemble_order`].
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub id: String,
    pub order_no: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<PricedLine>,
}

// =============================================================================
// Assembly
// =============================================================================

/// Builds a `Pending` order whose total is Σ(unit price × quantity).
///
/// ## Errors
/// - `EmptyOrder` when there are no lines
/// - `InvalidQuantity` when a quantity is ≤ 0
/// - `Validation` when the user id or a product id is blank
/// - `AmountOverflow` when a line or the total does not fit in i64 cents
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use myshop_core::money::Money;
/// use myshop_core::order::{assemble_order, LineRequest, NewOrder, PricedLine};
/// use myshop_core::OrderStatus;
///
/// let order = assemble_order(NewOrder {
///     id: "o-1".to_string(),
///     order_no: "N-1".to_string(),
///     user_id: "7".to_string(),
///     created_at: Utc::now(),
///     lines: vec![
///         PricedLine::new(LineRequest::new("a", 2), Money::from_cents(250)),
///         PricedLine::new(LineRequest::new("b", 1), Money::from_cents(1000)),
///     ],
/// })
/// .unwrap();
///
/// assert_eq!(order.status, OrderStatus::Pending);
/// assert_eq!(order.total_cents, 1500);
/// assert_eq!(order.lines[1].product_id, "b");
/// ```
pub fn assemble_order(new_order: NewOrder) -> CoreResult<Order> {
    let NewOrder {
        id,
        order_no,
        user_id,
        created_at,
        lines,
    } = new_order;

    validate_identifier("user_id", &user_id)?;

    let requests: Vec<LineRequest> = lines.iter().map(|l| l.request.clone()).collect();
    validate_line_requests(&requests)?;

    let mut total = Money::zero();
    let mut order_lines = Vec::with_capacity(lines.len());

    for (line_no, priced) in lines.into_iter().enumerate() {
        let line_total = priced
            .unit_price
            .checked_mul_quantity(priced.request.quantity)
            .ok_or(CoreError::AmountOverflow)?;
        total = total
            .checked_add(line_total)
            .ok_or(CoreError::AmountOverflow)?;

        order_lines.push(OrderLine {
            order_id: id.clone(),
            line_no: line_no as i64,
            product_id: priced.request.product_id,
            quantity: priced.request.quantity,
            unit_price_cents: priced.unit_price.cents(),
        });
    }

    Ok(Order {
        id,
        user_id,
        order_no,
        status: OrderStatus::Pending,
        total_cents: total.cents(),
        created_at,
        updated_at: created_at,
        lines: order_lines,
    })
}

// =============================================================================
// Order Numbers
// =============================================================================

/// Formats a 32-character order number.
///
/// ## Format
/// ```text
/// 20260131142503 123456 0042 0007 a3f9
/// └─────┬──────┘ └──┬─┘ └─┬┘ └─┬┘ └─┬┘
///   UTC time     micros  user  seq  entropy
/// ```
/// - user: last 4 alphanumeric characters of the user id, `0`-padded
/// - seq: caller-maintained counter, modulo 10000
/// - entropy: 16 random bits from the caller
///
/// Two orders collide only if they share the microsecond, the user tail, the
/// sequence slot and the entropy. The `UNIQUE` index on `orders.order_no`
/// catches whatever is left.
pub fn format_order_number(
    now: DateTime<Utc>,
    user_id: &str,
    sequence: u32,
    entropy: u16,
) -> String {
    // Leap seconds report up to 1_999_999 micros.
    let micros = now.timestamp_subsec_micros() % 1_000_000;

    let alnum: Vec<char> = user_id.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    let user_tail: String = alnum[alnum.len().saturating_sub(4)..].iter().collect();

    let order_no = format!(
        "{}{:06}{:0>4}{:04}{:04x}",
        now.format("%Y%m%d%H%M%S"),
        micros,
        user_tail,
        sequence % 10_000,
        entropy
    );
    debug_assert_eq!(order_no.len(), ORDER_NUMBER_LEN);
    order_no
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn new_order(lines: Vec<PricedLine>) -> NewOrder {
        NewOrder {
            id: "order-1".to_string(),
            order_no: "NO-1".to_string(),
            user_id: "user-1".to_string(),
            created_at: Utc::now(),
            lines,
        }
    }

    #[test]
    fn test_total_is_sum_of_lines() {
        let order = assemble_order(new_order(vec![
            PricedLine::new(LineRequest::new("p", 3), Money::from_cents(1000)),
            PricedLine::new(LineRequest::new("q", 2), Money::from_cents(199)),
        ]))
        .unwrap();

        assert_eq!(order.total_cents, 3398);
        let summed: i64 = order
            .lines
            .iter()
            .map(|l| l.line_total().unwrap().cents())
            .sum();
        assert_eq!(summed, order.total_cents);
    }

    #[test]
    fn test_lines_keep_request_order_and_prices() {
        let order = assemble_order(new_order(vec![
            PricedLine::new(LineRequest::new("z", 1), Money::from_cents(5)),
            PricedLine::new(LineRequest::new("a", 4), Money::from_cents(7)),
            PricedLine::new(LineRequest::new("z", 2), Money::from_cents(5)),
        ]))
        .unwrap();

        let ids: Vec<&str> = order.lines.iter().map(|l| l.product_id.as_str()).collect();
        assert_eq!(ids, vec!["z", "a", "z"]);
        let positions: Vec<i64> = order.lines.iter().map(|l| l.line_no).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert!(order.lines.iter().all(|l| l.order_id == "order-1"));
        assert_eq!(order.lines[1].unit_price_cents, 7);
        assert_eq!(order.item_count(), 7);
    }

    #[test]
    fn test_status_and_timestamps() {
        let order = assemble_order(new_order(vec![PricedLine::new(
            LineRequest::new("p", 1),
            Money::from_cents(1),
        )]))
        .unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.created_at, order.updated_at);
    }

    #[test]
    fn test_rejects_empty_and_bad_quantities() {
        assert_eq!(assemble_order(new_order(vec![])), Err(CoreError::EmptyOrder));

        let err = assemble_order(new_order(vec![PricedLine::new(
            LineRequest::new("p", 0),
            Money::from_cents(100),
        )]))
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidQuantity { quantity: 0, .. }));
    }

    #[test]
    fn test_rejects_blank_user() {
        let mut input = new_order(vec![PricedLine::new(
            LineRequest::new("p", 1),
            Money::from_cents(100),
        )]);
        input.user_id = " ".to_string();
        assert!(matches!(assemble_order(input), Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_overflow_is_reported() {
        let err = assemble_order(new_order(vec![PricedLine::new(
            LineRequest::new("p", 2),
            Money::from_cents(i64::MAX),
        )]))
        .unwrap_err();
        assert_eq!(err, CoreError::AmountOverflow);

        let err = assemble_order(new_order(vec![
            PricedLine::new(LineRequest::new("p", 1), Money::from_cents(i64::MAX)),
            PricedLine::new(LineRequest::new("q", 1), Money::from_cents(1)),
        ]))
        .unwrap_err();
        assert_eq!(err, CoreError::AmountOverflow);
    }

    #[test]
    fn test_order_number_layout() {
        let now = Utc.with_ymd_and_hms(2026, 1, 31, 14, 25, 3).unwrap()
            + chrono::Duration::microseconds(123_456);

        let order_no = format_order_number(now, "user-42", 7, 0xa3f9);
        assert_eq!(order_no, "20260131142503123456er420007a3f9");
        assert_eq!(order_no.len(), ORDER_NUMBER_LEN);
    }

    #[test]
    fn test_order_number_pads_short_users_and_wraps_sequence() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();

        let order_no = format_order_number(now, "7", 12_345, 0x1);
        assert_eq!(order_no, "20260301000000000000000723450001");
        assert_eq!(order_no.len(), ORDER_NUMBER_LEN);

        let empty_tail = format_order_number(now, "--", 0, 0xffff);
        assert_eq!(&empty_tail[20..24], "0000");
        assert_eq!(&empty_tail[28..], "ffff");
    }
}
