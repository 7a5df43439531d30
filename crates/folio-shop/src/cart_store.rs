//! # Cart Store
//!
//! Per-user carts with serialized mutation.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_line(alice, B1)   ──► lock(alice) ─► load ─► mutate ─► save        │
//! │  add_line(alice, B2)   ──► waits for lock(alice)                        │
//! │  add_line(bob, B1)     ──► lock(bob)   (independent)                    │
//! │  checkout(alice)       ──► lock(alice) held across price + commit       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutation is a read-modify-write of the whole cart under that
//! user's lock, so concurrent requests from one user never lose updates
//! and checkout never sees a half-applied change. Reads take no lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, instrument};

use folio_core::validation::{validate_book_id, validate_line_quantity, validate_quantity};
use folio_core::{Cart, Identity};

use crate::error::{ShopError, ShopResult};
use crate::ports::{CartRepository, Catalog};

/// Lock table size above which idle entries are pruned.
const LOCK_TABLE_PRUNE_AT: usize = 1024;

/// One async mutex per user id, created on first use.
#[derive(Default)]
struct CartLocks {
    table: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl CartLocks {
    fn handle(&self, user_id: &str) -> Arc<AsyncMutex<()>> {
        let mut table = self.table.lock().unwrap_or_else(|e| e.into_inner());
        if table.len() >= LOCK_TABLE_PRUNE_AT {
            // Only the table holds these; nobody is waiting on them.
            table.retain(|_, lock| Arc::strong_count(lock) > 1);
        }
        Arc::clone(table.entry(user_id.to_string()).or_default())
    }
}

/// Proof that the caller holds a user's cart lock.
pub struct CartGuard {
    user_id: String,
    _guard: OwnedMutexGuard<()>,
}

impl CartGuard {
    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

pub struct CartStore {
    catalog: Arc<dyn Catalog>,
    carts: Arc<dyn CartRepository>,
    locks: CartLocks,
}

impl CartStore {
    pub fn new(catalog: Arc<dyn Catalog>, carts: Arc<dyn CartRepository>) -> Self {
        CartStore {
            catalog,
            carts,
            locks: CartLocks::default(),
        }
    }

    /// Current cart contents in insertion order.
    pub async fn get(&self, identity: &Identity) -> ShopResult<Cart> {
        self.carts.load(&identity.user_id).await
    }

    /// Adds `quantity` copies of a catalog book, merging into an existing line.
    #[instrument(skip(self, identity), fields(user_id = %identity.user_id))]
    pub async fn add_line(&self, identity: &Identity, book_id: &str, quantity: i64) -> ShopResult<Cart> {
        validate_book_id(book_id)?;
        validate_quantity(quantity)?;

        if self.catalog.find(book_id).await?.is_none() {
            return Err(ShopError::not_found("Book", book_id));
        }

        let guard = self.lock(identity).await;
        let mut cart = self.load(&guard).await?;
        cart.add_line(book_id, quantity)?;
        self.carts.save(&cart).await?;

        debug!(lines = cart.line_count(), "Cart line added");
        Ok(cart)
    }

    /// Sets a line's quantity; zero removes the line.
    #[instrument(skip(self, identity), fields(user_id = %identity.user_id))]
    pub async fn update_quantity(
        &self,
        identity: &Identity,
        book_id: &str,
        quantity: i64,
    ) -> ShopResult<Cart> {
        validate_book_id(book_id)?;
        validate_line_quantity(quantity)?;

        let guard = self.lock(identity).await;
        let mut cart = self.load(&guard).await?;
        cart.update_quantity(book_id, quantity)?;
        self.carts.save(&cart).await?;
        Ok(cart)
    }

    /// Removes a line. Removing an absent line is not an error.
    #[instrument(skip(self, identity), fields(user_id = %identity.user_id))]
    pub async fn remove_line(&self, identity: &Identity, book_id: &str) -> ShopResult<Cart> {
        let guard = self.lock(identity).await;
        let mut cart = self.load(&guard).await?;
        if cart.remove_line(book_id) {
            self.carts.save(&cart).await?;
        }
        Ok(cart)
    }

    /// Empties the cart. Only callable while holding the cart lock.
    pub async fn clear(&self, guard: &CartGuard) -> ShopResult<()> {
        self.carts.clear(&guard.user_id).await
    }

    /// Waits for and takes the user's cart lock.
    pub(crate) async fn lock(&self, identity: &Identity) -> CartGuard {
        let lock = self.locks.handle(&identity.user_id);
        CartGuard {
            user_id: identity.user_id.clone(),
            _guard: lock.lock_owned().await,
        }
    }

    pub(crate) async fn load(&self, guard: &CartGuard) -> ShopResult<Cart> {
        self.carts.load(&guard.user_id).await
    }
}
