//! Checkout and order endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use folio_core::{Order, OrderStatus};
use folio_shop::ShopError;

use crate::auth::Caller;
use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

pub async fn checkout(
    State(state): State<Arc<AppState>>,
    Caller(identity): Caller,
) -> ApiResult<(StatusCode, Json<Order>)> {
    let order = state.shop.checkout.checkout(&identity).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn history(
    State(state): State<Arc<AppState>>,
    Caller(identity): Caller,
) -> ApiResult<Json<Vec<Order>>> {
    Ok(Json(state.shop.orders.history(&identity).await?))
}

pub async fn get_order(
    State(state): State<Arc<AppState>>,
    Caller(identity): Caller,
    Path(order_id): Path<String>,
) -> ApiResult<Json<Order>> {
    Ok(Json(state.shop.orders.get(&identity, &order_id).await?))
}

pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    Caller(identity): Caller,
) -> ApiResult<Json<Vec<Order>>> {
    Ok(Json(state.shop.orders.list_all(&identity).await?))
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Caller(identity): Caller,
    Path(order_id): Path<String>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> ApiResult<Json<Order>> {
    let Json(req) = payload?;
    let next: OrderStatus = req.status.parse().map_err(ShopError::from)?;
    let order = state
        .shop
        .orders
        .transition(&identity, &order_id, next)
        .await?;
    Ok(Json(order))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use folio_core::Identity;
    use serde_json::json;

    use crate::routes::test_support::{app, json, send};

    async fn place_order(app: &crate::routes::test_support::TestApp, who: &Identity) -> String {
        send(&app.router, "POST", "/api/cart/add", Some(who), Some(json!({"bookId": "B1", "quantity": 2}))).await;
        let response = send(&app.router, "POST", "/api/orders/checkout", Some(who), None).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        json(response).await["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_checkout_returns_created_order() {
        let app = app().await;
        let alice = Identity::member("alice");
        send(&app.router, "POST", "/api/cart/add", Some(&alice), Some(json!({"bookId": "B1", "quantity": 2}))).await;

        let response = send(&app.router, "POST", "/api/orders/checkout", Some(&alice), None).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let order = json(response).await;
        assert_eq!(order["totalCents"], 2000);
        assert_eq!(order["status"], "Pending");
        assert_eq!(order["userId"], "alice");
        assert_eq!(order["items"][0]["unitPriceCents"], 1000);

        let cart = json(send(&app.router, "GET", "/api/cart", Some(&alice), None).await).await;
        assert_eq!(cart["lines"], json!([]));
    }

    #[tokio::test]
    async fn test_empty_cart_checkout_is_400() {
        let app = app().await;
        let alice = Identity::member("alice");
        let response = send(&app.router, "POST", "/api/orders/checkout", Some(&alice), None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(response).await["code"], "EMPTY_CART");
    }

    #[tokio::test]
    async fn test_removed_book_checkout_is_400() {
        let app = app().await;
        let alice = Identity::member("alice");
        send(&app.router, "POST", "/api/cart/add", Some(&alice), Some(json!({"bookId": "B2"}))).await;
        app.store.remove_book("B2").await;

        let response = send(&app.router, "POST", "/api/orders/checkout", Some(&alice), None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(response).await["code"], "INVALID_CART_ITEM");
        assert_eq!(app.store.order_count().await, 0);
    }

    #[tokio::test]
    async fn test_storage_outage_is_500_without_details() {
        let app = app().await;
        let alice = Identity::member("alice");
        send(&app.router, "POST", "/api/cart/add", Some(&alice), Some(json!({"bookId": "B1"}))).await;

        app.store.set_offline(true);
        let response = send(&app.router, "POST", "/api/orders/checkout", Some(&alice), None).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json(response).await["message"], "Internal server error");
    }

    #[tokio::test]
    async fn test_history_and_ownership() {
        let app = app().await;
        let alice = Identity::member("alice");
        let bob = Identity::member("bob");
        let order_id = place_order(&app, &alice).await;

        let history = json(send(&app.router, "GET", "/api/orders/history", Some(&alice), None).await).await;
        assert_eq!(history.as_array().unwrap().len(), 1);

        let uri = format!("/api/orders/{}", order_id);
        let own = send(&app.router, "GET", &uri, Some(&alice), None).await;
        assert_eq!(own.status(), StatusCode::OK);

        let other = send(&app.router, "GET", &uri, Some(&bob), None).await;
        assert_eq!(other.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_fulfillment() {
        let app = app().await;
        let alice = Identity::member("alice");
        let admin = Identity::admin("root");
        let order_id = place_order(&app, &alice).await;
        let uri = format!("/api/orders/{}/status", order_id);

        let denied = send(&app.router, "PUT", &uri, Some(&alice), Some(json!({"status": "Shipped"}))).await;
        assert_eq!(denied.status(), StatusCode::FORBIDDEN);

        let shipped = send(&app.router, "PUT", &uri, Some(&admin), Some(json!({"status": "Shipped"}))).await;
        assert_eq!(shipped.status(), StatusCode::OK);
        assert_eq!(json(shipped).await["status"], "Shipped");

        let bogus = send(&app.router, "PUT", &uri, Some(&admin), Some(json!({"status": "Lost"}))).await;
        assert_eq!(bogus.status(), StatusCode::BAD_REQUEST);

        let all = send(&app.router, "GET", "/api/orders", Some(&admin), None).await;
        assert_eq!(json(all).await.as_array().unwrap().len(), 1);
        let all = send(&app.router, "GET", "/api/orders", Some(&alice), None).await;
        assert_eq!(all.status(), StatusCode::FORBIDDEN);
    }
}
