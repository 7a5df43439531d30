//! Cart endpoints. Every route acts on the caller's own cart.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use folio_core::Cart;

use crate::auth::Caller;
use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub book_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityRequest {
    pub book_id: String,
    pub quantity: i64,
}

pub async fn get_cart(
    State(state): State<Arc<AppState>>,
    Caller(identity): Caller,
) -> ApiResult<Json<Cart>> {
    Ok(Json(state.shop.carts.get(&identity).await?))
}

pub async fn add_to_cart(
    State(state): State<Arc<AppState>>,
    Caller(identity): Caller,
    payload: Result<Json<AddToCartRequest>, JsonRejection>,
) -> ApiResult<Json<Cart>> {
    let Json(req) = payload?;
    let cart = state
        .shop
        .carts
        .add_line(&identity, &req.book_id, req.quantity)
        .await?;
    Ok(Json(cart))
}

pub async fn update_quantity(
    State(state): State<Arc<AppState>>,
    Caller(identity): Caller,
    payload: Result<Json<UpdateQuantityRequest>, JsonRejection>,
) -> ApiResult<Json<Cart>> {
    let Json(req) = payload?;
    let cart = state
        .shop
        .carts
        .update_quantity(&identity, &req.book_id, req.quantity)
        .await?;
    Ok(Json(cart))
}

pub async fn remove_from_cart(
    State(state): State<Arc<AppState>>,
    Caller(identity): Caller,
    Path(book_id): Path<String>,
) -> ApiResult<Json<Cart>> {
    Ok(Json(state.shop.carts.remove_line(&identity, &book_id).await?))
}
