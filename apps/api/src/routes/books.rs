//! Storefront catalog listing. Public.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use folio_core::Book;

use crate::error::ApiResult;
use crate::AppState;

pub async fn list_books(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Book>>> {
    Ok(Json(state.shop.catalog.list().await?))
}
