//! # Cart
//!
//! A caller's pending purchase: an insertion-ordered set of book/quantity
//! lines, unique per book.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operation            Effect on lines                                   │
//! │  ─────────            ───────────────                                   │
//! │  add_line(b, n)       b present? qty += n : push {b, n}                 │
//! │  update_quantity(b,n) n == 0 ? remove b : qty = n   (b must exist)      │
//! │  remove_line(b)       drop b if present (idempotent)                    │
//! │  clear()              lines = []                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No prices live here. A cart line is only a reference; the price is
//! resolved once, at checkout, and frozen into the order.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::validation::{validate_book_id, validate_line_quantity, validate_quantity};
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

/// One book in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub book_id: String,
    /// Always >= 1 while the line exists.
    pub quantity: i64,
}

/// The cart owned by one user.
///
/// ## Invariants
/// - Lines are unique by `book_id`
/// - Every quantity is in `1..=MAX_LINE_QUANTITY`
/// - At most `MAX_CART_LINES` lines
/// - Line order is insertion order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub user_id: String,
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart for `user_id`.
    pub fn new(user_id: impl Into<String>) -> Self {
        Cart {
            user_id: user_id.into(),
            lines: Vec::new(),
        }
    }

    /// Adds `quantity` of a book, merging into an existing line.
    pub fn add_line(&mut self, book_id: &str, quantity: i64) -> CoreResult<()> {
        validate_book_id(book_id)?;
        validate_quantity(quantity)?;

        if let Some(line) = self.lines.iter_mut().find(|l| l.book_id == book_id) {
            let merged = line.quantity + quantity;
            if merged > MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: merged,
                    max: MAX_LINE_QUANTITY,
                });
            }
            line.quantity = merged;
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        self.lines.push(CartLine {
            book_id: book_id.to_string(),
            quantity,
        });
        Ok(())
    }

    /// Sets a line's quantity. Zero removes the line.
    ///
    /// Fails with [`CoreError::LineNotFound`] when there is no line for the
    /// book, including when `quantity` is zero.
    pub fn update_quantity(&mut self, book_id: &str, quantity: i64) -> CoreResult<()> {
        validate_line_quantity(quantity)?;

        let idx = self
            .lines
            .iter()
            .position(|l| l.book_id == book_id)
            .ok_or_else(|| CoreError::LineNotFound(book_id.to_string()))?;

        if quantity == 0 {
            self.lines.remove(idx);
        } else {
            self.lines[idx].quantity = quantity;
        }
        Ok(())
    }

    /// Removes the line for a book. Returns whether a line was dropped.
    pub fn remove_line(&mut self, book_id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.book_id != book_id);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn line(&self, book_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.book_id == book_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
