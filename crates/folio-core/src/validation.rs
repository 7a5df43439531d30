//! # Validation Module
//!
//! Input checks that run before any cart or order logic.
//!
//! ```text
//! Request body ──► validate_* ──► Ok ──► Cart / Order methods
//!                      │
//!                      └──► ValidationError ──► 400 InvalidInput
//! ```

use crate::error::ValidationError;
use crate::{MAX_BOOK_ID_LEN, MAX_LINE_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates a catalog book id.
///
/// ## Rules
/// - Not blank
/// - At most `MAX_BOOK_ID_LEN` characters
/// - Letters, digits, `-` and `_` only
///
/// ```rust
/// use folio_core::validation::validate_book_id;
///
/// assert!(validate_book_id("B1").is_ok());
/// assert!(validate_book_id("   ").is_err());
/// assert!(validate_book_id("B1; DROP TABLE").is_err());
/// ```
pub fn validate_book_id(book_id: &str) -> ValidationResult<()> {
    if book_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "bookId".to_string(),
        });
    }

    if book_id.len() > MAX_BOOK_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "bookId".to_string(),
            max: MAX_BOOK_ID_LEN,
        });
    }

    if !book_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "bookId".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates an order id (UUID).
pub fn validate_order_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "orderId".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "orderId".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Quantity for adding to a cart or for an order line: `1..=MAX_LINE_QUANTITY`.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Quantity for updating a cart line: `0..=MAX_LINE_QUANTITY`, where zero
/// means "remove".
pub fn validate_line_quantity(qty: i64) -> ValidationResult<()> {
    if !(0..=MAX_LINE_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Prices are non-negative; zero is a giveaway, not an error.
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

// =============================================================================
// Unit Tests
// =============================================================================
