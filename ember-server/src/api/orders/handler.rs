//! Orders API Handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::api::current_user_rid;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::OrderView;
use crate::utils::validation::{MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// "all" returns every order (staff roles only)
    pub scope: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub cart_id: Option<String>,
    #[serde(default)]
    pub delivery_eta: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct OrdersResponse {
    pub orders: Vec<OrderView>,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub order: OrderView,
}

/// GET /api/orders - The caller's orders, newest-first
///
/// `?scope=all` widens to every order for STAFF/ADMIN callers; customers
/// asking for it silently get their own orders, like any other scope value.
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<OrdersResponse>> {
    let user_rid = current_user_rid(&user)?;
    let include_all = query.scope.as_deref() == Some("all") && user.is_staff();

    let orders = state
        .order_service()
        .list_for(&user_rid, include_all)
        .await?;
    Ok(Json(OrdersResponse { orders }))
}

/// POST /api/orders - Place an order from the caller's cart
pub async fn place(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<PlaceOrderRequest>,
) -> AppResult<(StatusCode, Json<OrderResponse>)> {
    let cart_id = req
        .cart_id
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::validation("cartId is required"))?;
    validate_optional_text(&req.delivery_eta, "deliveryEta", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&req.notes, "notes", MAX_NOTE_LEN)?;

    let user_rid = current_user_rid(&user)?;
    let order = state
        .order_service()
        .place_order(&user_rid, cart_id, req.delivery_eta, req.notes)
        .await?;

    Ok((StatusCode::CREATED, Json(OrderResponse { order })))
}

/// PATCH /api/orders/{order_id}/status - Update an order's status (staff)
pub async fn set_status(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    Json(req): Json<SetStatusRequest>,
) -> AppResult<Json<OrderResponse>> {
    let order = state
        .order_service()
        .set_status(&order_id, &req.status)
        .await?;
    Ok(Json(OrderResponse { order }))
}
