//! # Orders
//!
//! The immutable record of a completed purchase.
//!
//! ## Snapshot Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CartLine {B1, qty 2}  +  catalog price of B1 right now ($10.00)        │
//! │                       │                                                 │
//! │                       ▼                                                 │
//! │  OrderLine {B1, qty 2, unit_price_cents 1000}   ◄── frozen forever      │
//! │                                                                         │
//! │  Catalog price later changes to $12.00 → order still says $10.00        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status Lifecycle
//! ```text
//!              ┌──────────┐     ┌───────────┐
//!   place ───► │ Pending  │───► │  Shipped  │───► Delivered
//!              └────┬─────┘     └─────┬─────┘
//!                   │                 │
//!                   └──► Cancelled ◄──┘
//! ```
//! Only `status` (and `updated_at`) ever change after placement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::{validate_book_id, validate_price_cents, validate_quantity};

// =============================================================================
// Order Status
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
pub enum OrderStatus {
    #[default]
    Pending,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Whether fulfillment may move an order from `self` to `next`.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Shipped) | (Pending, Cancelled) | (Shipped, Delivered) | (Shipped, Cancelled)
        )
    }

    /// Cancelled orders no longer count toward revenue.
    pub fn counts_as_sale(&self) -> bool {
        *self != OrderStatus::Cancelled
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = crate::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(crate::ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: ["Pending", "Shipped", "Delivered", "Cancelled"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            }),
        }
    }
}

// =============================================================================
// Order Line
// =============================================================================

/// A purchased book with the unit price it was bought at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub book_id: String,
    pub quantity: i64,
    /// Catalog price at checkout (frozen).
    pub unit_price_cents: i64,
}

impl OrderLine {
    pub fn new(book_id: impl Into<String>, quantity: i64, unit_price: Money) -> CoreResult<Self> {
        let book_id = book_id.into();
        validate_book_id(&book_id)?;
        validate_quantity(quantity)?;
        validate_price_cents(unit_price.cents())?;
        Ok(OrderLine {
            book_id,
            quantity,
            unit_price_cents: unit_price.cents(),
        })
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// `quantity × unit price`, or `None` on overflow.
    pub fn line_total(&self) -> Option<Money> {
        self.unit_price().checked_times(self.quantity)
    }
}

// =============================================================================
// Order
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub items: Vec<OrderLine>,
    /// Exact Σ(quantity × unit_price_cents).
    pub total_cents: i64,
    pub status: OrderStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Builds a new `Pending` order from priced lines.
    ///
    /// The total is computed here and nowhere else.
    pub fn place(user_id: impl Into<String>, items: Vec<OrderLine>, now: DateTime<Utc>) -> CoreResult<Self> {
        if items.is_empty() {
            return Err(CoreError::EmptyOrder);
        }
        let total = Self::sum_lines(&items)?;

        Ok(Order {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            items,
            total_cents: total.cents(),
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    /// Σ line totals with overflow checking.
    pub fn sum_lines(items: &[OrderLine]) -> CoreResult<Money> {
        items.iter().try_fold(Money::zero(), |acc, line| {
            line.line_total()
                .and_then(|t| acc.checked_add(t))
                .ok_or(CoreError::TotalOverflow)
        })
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Re-checks that the stored total matches the stored lines.
    pub fn verify_total(&self) -> bool {
        matches!(Self::sum_lines(&self.items), Ok(sum) if sum.cents() == self.total_cents)
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    /// Moves the order to `next`. Items and total are untouched.
    pub fn transition_to(&mut self, next: OrderStatus, now: DateTime<Utc>) -> CoreResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::InvalidStatusTransition {
                order_id: self.id.clone(),
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = now;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(book: &str, qty: i64, cents: i64) -> OrderLine {
        OrderLine::new(book, qty, Money::from_cents(cents)).unwrap()
    }

    #[test]
    fn test_place_single_line() {
        let order = Order::place("u-1", vec![line("B1", 2, 1000)], Utc::now()).unwrap();

        assert_eq!(order.total_cents, 2000);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items[0].unit_price_cents, 1000);
        assert!(order.verify_total());
        assert!(Uuid::parse_str(&order.id).is_ok());
    }

    #[test]
    fn test_place_sums_exactly() {
        let items = vec![line("B1", 3, 1999), line("B2", 1, 1), line("B3", 10, 10)];
        let order = Order::place("u-1", items, Utc::now()).unwrap();
        assert_eq!(order.total_cents, 3 * 1999 + 1 + 100);
    }

    #[test]
    fn test_place_empty_is_rejected() {
        assert!(matches!(
            Order::place("u-1", vec![], Utc::now()),
            Err(CoreError::EmptyOrder)
        ));
    }

    #[test]
    fn test_place_overflow_is_rejected() {
        let huge = OrderLine {
            book_id: "B1".to_string(),
            quantity: 2,
            unit_price_cents: i64::MAX,
        };
        assert!(matches!(
            Order::place("u-1", vec![huge], Utc::now()),
            Err(CoreError::TotalOverflow)
        ));
    }

    #[test]
    fn test_line_rejects_bad_input() {
        assert!(OrderLine::new("B1", 0, Money::from_cents(100)).is_err());
        assert!(OrderLine::new("B1", 1, Money::from_cents(-1)).is_err());
        assert!(OrderLine::new("", 1, Money::from_cents(100)).is_err());
    }

    #[test]
    fn test_verify_total_detects_tampering() {
        let mut order = Order::place("u-1", vec![line("B1", 1, 500)], Utc::now()).unwrap();
        order.total_cents += 1;
        assert!(!order.verify_total());
    }

    #[test]
    fn test_status_transitions() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Shipped));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Shipped.can_transition_to(Delivered));
        assert!(Shipped.can_transition_to(Cancelled));

        assert!(!Pending.can_transition_to(Delivered));
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Delivered.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Shipped));
    }

    #[test]
    fn test_transition_keeps_items_and_total() {
        let mut order = Order::place("u-1", vec![line("B1", 2, 1000)], Utc::now()).unwrap();
        let items = order.items.clone();

        order.transition_to(OrderStatus::Shipped, Utc::now()).unwrap();
        assert_eq!(order.status, OrderStatus::Shipped);
        assert_eq!(order.items, items);
        assert_eq!(order.total_cents, 2000);

        let err = order
            .transition_to(OrderStatus::Pending, Utc::now())
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidStatusTransition { .. }));
        assert_eq!(order.status, OrderStatus::Shipped);
    }

    #[test]
    fn test_status_parse_and_json() {
        assert_eq!("shipped".parse::<OrderStatus>().unwrap(), OrderStatus::Shipped);
        assert!("lost".parse::<OrderStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            "\"Pending\""
        );
    }

    #[test]
    fn test_order_json_shape() {
        let order = Order::place("u-1", vec![line("B1", 2, 1000)], Utc::now()).unwrap();
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["userId"], "u-1");
        assert_eq!(json["totalCents"], 2000);
        assert_eq!(json["items"][0]["bookId"], "B1");
        assert_eq!(json["items"][0]["unitPriceCents"], 1000);
        assert_eq!(json["status"], "Pending");
    }
}
