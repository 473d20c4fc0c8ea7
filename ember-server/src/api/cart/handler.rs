//! Cart API Handlers
//!
//! Every response carries the refreshed cart so clients can re-render
//! without a follow-up fetch.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::api::current_user_rid;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{CartItemView, CartView};
use crate::db::repository::RepoError;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};

fn default_quantity() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub menu_item_id: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: i64,
}

#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub cart: CartView,
}

#[derive(Debug, Serialize)]
pub struct CartItemResponse {
    pub cart: CartView,
    pub item: CartItemView,
}

/// GET /api/cart - The caller's cart, created lazily on first access
pub async fn get_cart(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<CartResponse>> {
    let user_rid = current_user_rid(&user)?;
    let carts = state.cart_repository();
    let cart = carts.get_or_create(&user_rid).await?;
    let cart = carts.view(&cart).await?;
    Ok(Json(CartResponse { cart }))
}

/// POST /api/cart/items - Add a menu item (or increment the existing line)
pub async fn add_item(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<AddItemRequest>,
) -> AppResult<(StatusCode, Json<CartItemResponse>)> {
    let menu_item_id = req
        .menu_item_id
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::validation("menuItemId is required"))?;
    validate_optional_text(&req.notes, "notes", MAX_NOTE_LEN)?;

    // The line must reference a real menu item
    let menu_item = match state.menu_repository().find_item(menu_item_id).await {
        Ok(item) => item,
        Err(RepoError::Validation(_)) => None,
        Err(e) => return Err(e.into()),
    };
    let menu_item = menu_item.ok_or_else(|| AppError::not_found("Menu item not found"))?;
    let menu_item_rid = menu_item
        .id
        .ok_or_else(|| AppError::internal("Menu item row without id"))?;

    let user_rid = current_user_rid(&user)?;
    let carts = state.cart_repository();
    let cart = carts.get_or_create(&user_rid).await?;
    let cart_rid = cart
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Cart row without id"))?;

    let line = carts
        .add_item(&cart_rid, &menu_item_rid, req.quantity, req.notes)
        .await?;
    let line_rid = line
        .id
        .ok_or_else(|| AppError::internal("Cart line without id"))?;

    let item = carts
        .line_view(&line_rid)
        .await?
        .ok_or_else(|| AppError::internal("Cart line vanished after upsert"))?;
    let cart = carts.view(&cart).await?;

    Ok((StatusCode::CREATED, Json(CartItemResponse { cart, item })))
}

/// PATCH /api/cart/items/{item_id} - Replace a line's quantity
pub async fn update_item(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(item_id): Path<String>,
    Json(req): Json<UpdateItemRequest>,
) -> AppResult<Json<CartItemResponse>> {
    let user_rid = current_user_rid(&user)?;
    let carts = state.cart_repository();

    let line = carts.update_item(&item_id, req.quantity).await?;
    let line_rid = line
        .id
        .ok_or_else(|| AppError::internal("Cart line without id"))?;
    let item = carts
        .line_view(&line_rid)
        .await?
        .ok_or_else(|| AppError::internal("Cart line vanished after update"))?;

    let cart = carts.get_or_create(&user_rid).await?;
    let cart = carts.view(&cart).await?;

    Ok(Json(CartItemResponse { cart, item }))
}

/// DELETE /api/cart/items/{item_id}
pub async fn remove_item(
    State(state): State<ServerState>,
    Path(item_id): Path<String>,
) -> AppResult<StatusCode> {
    state.cart_repository().remove_item(&item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/cart/clear - Delete every line of the caller's cart
pub async fn clear(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<CartResponse>> {
    let user_rid = current_user_rid(&user)?;
    let carts = state.cart_repository();
    let cart = carts.get_or_create(&user_rid).await?;
    if let Some(cart_rid) = cart.id.clone() {
        carts.clear(&cart_rid).await?;
    }
    let cart = carts.view(&cart).await?;
    Ok(Json(CartResponse { cart }))
}
