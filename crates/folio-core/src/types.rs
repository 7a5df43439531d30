//! # Domain Types
//!
//! Callers, catalog entries and reports. Carts live in [`crate::cart`],
//! orders in [`crate::order`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Identity     │   │      Book       │   │  SalesReport    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  user_id        │   │  id             │   │  total_revenue  │       │
//! │  │  role           │   │  title, author  │   │  number_of_     │       │
//! │  │   member|admin  │   │  price_cents    │   │    orders       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names serialize in camelCase to match the storefront's JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Role
// =============================================================================

/// What an authenticated caller is allowed to do.
///
/// One tag on one identity type; capability checks happen where the
/// capability is used (report gate, order desk), not through subtyping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Member,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = crate::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "member" => Ok(Role::Member),
            "admin" => Ok(Role::Admin),
            _ => Err(crate::ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: vec!["member".to_string(), "admin".to_string()],
            }),
        }
    }
}

// =============================================================================
// Identity
// =============================================================================

/// An authenticated caller.
///
/// Produced by the authentication layer from a verified token. Nothing in
/// the domain constructs one from user input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: String,
    pub role: Role,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn member(user_id: impl Into<String>) -> Self {
        Self::new(user_id, Role::Member)
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Self::new(user_id, Role::Admin)
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// =============================================================================
// Book
// =============================================================================

/// A catalog entry.
///
/// Read-only from checkout's point of view: the price here is the price a
/// cart line will be charged at *the moment of checkout*, never later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub price_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Current catalog price.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Sales Report
// =============================================================================

/// Aggregated revenue over every order that still counts as a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub total_revenue_cents: i64,
    pub number_of_orders: i64,
    #[ts(as = "String")]
    pub generated_at: DateTime<Utc>,
}

impl SalesReport {
    pub fn total_revenue(&self) -> Money {
        Money::from_cents(self.total_revenue_cents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_display() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" Member ".parse::<Role>().unwrap(), Role::Member);
        assert!("owner".parse::<Role>().is_err());
        assert_eq!(Role::Admin.to_string(), "admin");
    }

    #[test]
    fn test_identity_capabilities() {
        assert!(Identity::admin("a-1").is_admin());
        assert!(!Identity::member("u-1").is_admin());
    }

    #[test]
    fn test_identity_json_shape() {
        let json = serde_json::to_value(Identity::member("u-1")).unwrap();
        assert_eq!(json["userId"], "u-1");
        assert_eq!(json["role"], "member");
    }
}
