//! # Order Desk
//!
//! Read access to placed orders plus the admin-only fulfillment path.
//!
//! ```text
//!   history(caller)        own orders, newest first
//!   get(caller, id)        owner or admin
//!   list_all(caller)       admin
//!   transition(caller,..)  admin; Pending ─► Shipped ─► Delivered
//!                                   └──────┴──► Cancelled
//! ```
//!
//! Items and totals are never touched here; only `status` moves.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use folio_core::validation::validate_order_id;
use folio_core::{Identity, Order, OrderStatus};

use crate::error::{ShopError, ShopResult};
use crate::ports::OrderRepository;

pub struct OrderDesk {
    orders: Arc<dyn OrderRepository>,
}

impl OrderDesk {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        OrderDesk { orders }
    }

    pub async fn history(&self, identity: &Identity) -> ShopResult<Vec<Order>> {
        self.orders.list_for_user(&identity.user_id).await
    }

    pub async fn get(&self, identity: &Identity, order_id: &str) -> ShopResult<Order> {
        validate_order_id(order_id)?;
        let order = self
            .orders
            .get(order_id)
            .await?
            .ok_or_else(|| ShopError::not_found("Order", order_id))?;

        if !order.is_owned_by(&identity.user_id) && !identity.is_admin() {
            return Err(ShopError::Unauthorized);
        }
        Ok(order)
    }

    pub async fn list_all(&self, identity: &Identity) -> ShopResult<Vec<Order>> {
        if !identity.is_admin() {
            return Err(ShopError::Unauthorized);
        }
        self.orders.list_all().await
    }

    /// Moves an order along the fulfillment lifecycle.
    #[instrument(skip(self, identity), fields(user_id = %identity.user_id))]
    pub async fn transition(
        &self,
        identity: &Identity,
        order_id: &str,
        next: OrderStatus,
    ) -> ShopResult<Order> {
        if !identity.is_admin() {
            return Err(ShopError::Unauthorized);
        }
        validate_order_id(order_id)?;

        let mut order = self
            .orders
            .get(order_id)
            .await?
            .ok_or_else(|| ShopError::not_found("Order", order_id))?;

        let from = order.status;
        let now = Utc::now();
        order.transition_to(next, now)?;
        self.orders.set_status(order_id, from, next, now).await?;

        info!(order_id = %order_id, %from, to = %next, "Order status changed");
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use folio_core::{Money, OrderLine};

    async fn desk_with_order(owner: &str) -> (OrderDesk, Order) {
        let store = InMemoryStore::new();
        let line = OrderLine::new("B1", 2, Money::from_cents(750)).unwrap();
        let order = Order::place(owner, vec![line], Utc::now()).unwrap();
        store.commit(&order).await.unwrap();
        (OrderDesk::new(Arc::new(store)), order)
    }

    #[tokio::test]
    async fn test_owner_and_admin_can_read() {
        let (desk, order) = desk_with_order("alice").await;

        let own = desk.get(&Identity::member("alice"), &order.id).await.unwrap();
        assert_eq!(own, order);
        assert!(desk.get(&Identity::admin("root"), &order.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_stranger_is_denied() {
        let (desk, order) = desk_with_order("alice").await;
        let err = desk.get(&Identity::member("bob"), &order.id).await.unwrap_err();
        assert!(matches!(err, ShopError::Unauthorized));
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_ids() {
        let (desk, _) = desk_with_order("alice").await;
        let alice = Identity::member("alice");

        let missing = desk
            .get(&alice, "5f0c4f6e-1a1b-4c3d-9e8f-0a1b2c3d4e5f")
            .await
            .unwrap_err();
        assert!(matches!(missing, ShopError::NotFound { .. }));

        let malformed = desk.get(&alice, "not-a-uuid").await.unwrap_err();
        assert!(matches!(malformed, ShopError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_history_is_per_user() {
        let (desk, order) = desk_with_order("alice").await;
        assert_eq!(desk.history(&Identity::member("alice")).await.unwrap(), vec![order]);
        assert!(desk.history(&Identity::member("bob")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_all_is_admin_only() {
        let (desk, _) = desk_with_order("alice").await;
        assert!(matches!(
            desk.list_all(&Identity::member("alice")).await,
            Err(ShopError::Unauthorized)
        ));
        assert_eq!(desk.list_all(&Identity::admin("root")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fulfillment_lifecycle() {
        let (desk, order) = desk_with_order("alice").await;
        let admin = Identity::admin("root");

        let shipped = desk
            .transition(&admin, &order.id, OrderStatus::Shipped)
            .await
            .unwrap();
        assert_eq!(shipped.status, OrderStatus::Shipped);
        assert_eq!(shipped.total_cents, order.total_cents);

        let err = desk
            .transition(&admin, &order.id, OrderStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::InvalidInput(_)));

        desk.transition(&admin, &order.id, OrderStatus::Delivered)
            .await
            .unwrap();
        let stored = desk.get(&admin, &order.id).await.unwrap();
        assert_eq!(stored.status, OrderStatus::Delivered);
        assert_eq!(stored.items, order.items);
    }

    #[tokio::test]
    async fn test_members_cannot_transition() {
        let (desk, order) = desk_with_order("alice").await;
        let err = desk
            .transition(&Identity::member("alice"), &order.id, OrderStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::Unauthorized));
    }
}
