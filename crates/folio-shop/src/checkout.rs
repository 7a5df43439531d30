//! # Checkout Engine
//!
//! Turns a user's cart into an order, all-or-nothing.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Take the user's cart lock                                           │
//! │  2. Load cart ─────────────── empty? ──► EmptyCart                      │
//! │  3. Price every line ──────── missing/bad price? ──► InvalidCartItem    │
//! │  4. Build order (Pending, total = Σ qty × unit price)                   │
//! │  5. commit: insert order + clear cart, one unit                         │
//! │  6. Release lock                                                        │
//! │  7. Publish to handlers (inline or background)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Any failure before step 5 completes leaves cart and orders exactly as
//! they were. Handler failures after step 5 never undo the order.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};

use folio_core::{Identity, Order, OrderLine};

use crate::cart_store::CartStore;
use crate::config::{NotifyMode, ShopConfig};
use crate::dispatcher::NotificationDispatcher;
use crate::error::{ShopError, ShopResult};
use crate::ports::{Catalog, OrderRepository};

pub struct CheckoutEngine {
    carts: Arc<CartStore>,
    catalog: Arc<dyn Catalog>,
    orders: Arc<dyn OrderRepository>,
    dispatcher: Arc<NotificationDispatcher>,
    config: ShopConfig,
}

impl CheckoutEngine {
    pub fn new(
        carts: Arc<CartStore>,
        catalog: Arc<dyn Catalog>,
        orders: Arc<dyn OrderRepository>,
        dispatcher: Arc<NotificationDispatcher>,
        config: ShopConfig,
    ) -> Self {
        CheckoutEngine {
            carts,
            catalog,
            orders,
            dispatcher,
            config,
        }
    }

    /// Places an order from the caller's cart.
    #[instrument(skip(self, identity), fields(user_id = %identity.user_id))]
    pub async fn checkout(&self, identity: &Identity) -> ShopResult<Order> {
        let order = {
            let guard = self.carts.lock(identity).await;
            let cart = self.carts.load(&guard).await?;
            if cart.is_empty() {
                return Err(ShopError::EmptyCart);
            }

            let mut items = Vec::with_capacity(cart.line_count());
            for line in &cart.lines {
                let price = self.catalog.price_of(&line.book_id).await?.ok_or_else(|| {
                    ShopError::InvalidCartItem {
                        book_id: line.book_id.clone(),
                        reason: "book is no longer in the catalog".to_string(),
                    }
                })?;

                let item = OrderLine::new(&line.book_id, line.quantity, price).map_err(|e| {
                    ShopError::InvalidCartItem {
                        book_id: line.book_id.clone(),
                        reason: e.to_string(),
                    }
                })?;
                items.push(item);
            }

            let order = Order::place(&identity.user_id, items, Utc::now())?;

            self.orders.commit(&order).await?;
            order
        };

        info!(order_id = %order.id, total = %order.total(), items = order.items.len(), "Order placed");
        self.notify(&order).await;
        Ok(order)
    }

    async fn notify(&self, order: &Order) {
        match self.config.notify_mode {
            NotifyMode::Inline => {
                self.dispatcher.publish(order).await;
            }
            NotifyMode::Background => {
                let dispatcher = Arc::clone(&self.dispatcher);
                let order = order.clone();
                tokio::spawn(async move {
                    dispatcher.publish(&order).await;
                });
                debug!("Order notification queued");
            }
        }
    }
}
