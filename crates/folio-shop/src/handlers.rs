//! # Order Handlers
//!
//! The two reactions the API wires up at startup.
//!
//! - [`AdminAlert`]: logs a summary line for staff
//! - [`InventorySimulation`]: pretends to decrement stock, one log per line
//!
//! Neither touches real external systems.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::info;

use folio_core::Order;

use crate::dispatcher::{HandlerError, OrderHandler};

#[derive(Debug, Default)]
pub struct AdminAlert;

#[async_trait]
impl OrderHandler for AdminAlert {
    fn name(&self) -> &str {
        "admin-alert"
    }

    async fn handle(&self, order: &Order) -> Result<(), HandlerError> {
        info!(
            order_id = %order.id,
            user_id = %order.user_id,
            total = %order.total(),
            items = order.items.len(),
            "New order placed"
        );
        Ok(())
    }
}

/// Tracks how many copies of each book orders have claimed.
#[derive(Debug, Default)]
pub struct InventorySimulation {
    reserved: Mutex<HashMap<String, i64>>,
}

impl InventorySimulation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies of `book_id` claimed so far.
    pub fn reserved(&self, book_id: &str) -> i64 {
        self.reserved
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(book_id)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl OrderHandler for InventorySimulation {
    fn name(&self) -> &str {
        "inventory-simulation"
    }

    async fn handle(&self, order: &Order) -> Result<(), HandlerError> {
        let mut reserved = self.reserved.lock().unwrap_or_else(|e| e.into_inner());
        for line in &order.items {
            let total = reserved.entry(line.book_id.clone()).or_insert(0);
            *total += line.quantity;
            info!(
                order_id = %order.id,
                book_id = %line.book_id,
                quantity = line.quantity,
                reserved = *total,
                "Stock decremented"
            );
        }
        Ok(())
    }
}
