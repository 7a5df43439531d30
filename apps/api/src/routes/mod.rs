//! Routing definitions for the Folio API.

mod admin;
mod books;
mod cart;
mod health;
mod orders;

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::AppState;

// =============================================================================
// Router Creation
// =============================================================================

/// Creates the API router with every route bound to `state`.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/books", get(books::list_books))
        // Cart
        .route("/api/cart", get(cart::get_cart))
        .route("/api/cart/add", post(cart::add_to_cart))
        .route("/api/cart/update-quantity", put(cart::update_quantity))
        .route("/api/cart/remove/{book_id}", delete(cart::remove_from_cart))
        // Orders
        .route("/api/orders", get(orders::list_orders))
        .route("/api/orders/checkout", post(orders::checkout))
        .route("/api/orders/history", get(orders::history))
        .route("/api/orders/{order_id}", get(orders::get_order))
        .route("/api/orders/{order_id}/status", put(orders::update_status))
        // Admin
        .route("/api/admin/sales", get(admin::sales_report))
        .with_state(state)
}
