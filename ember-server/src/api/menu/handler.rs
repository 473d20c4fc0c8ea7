//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{MenuCategory, MenuItem, MenuItemDetail};
use crate::db::repository::MenuItemFilter;
use crate::utils::{AppError, AppResult};

/// Query params for listing menu items
#[derive(Debug, Deserialize)]
pub struct ItemsQuery {
    /// Category slug ("all" means no filter)
    pub category: Option<String>,
    /// Case-insensitive substring over name/description
    pub search: Option<String>,
    /// Comma-separated dietary tags, any-of semantics
    pub dietary: Option<String>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<MenuCategory>,
}

#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub item: MenuItemDetail,
}

/// GET /api/menu/categories
pub async fn list_categories(
    State(state): State<ServerState>,
) -> AppResult<Json<CategoriesResponse>> {
    let categories = state.menu_repository().list_categories().await?;
    Ok(Json(CategoriesResponse { categories }))
}

/// GET /api/menu/items
pub async fn list_items(
    State(state): State<ServerState>,
    Query(query): Query<ItemsQuery>,
) -> AppResult<Json<ItemsResponse>> {
    let dietary = query
        .dietary
        .as_deref()
        .map(|d| {
            d.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let filter = MenuItemFilter {
        category: query.category,
        search: query.search,
        dietary,
        max_price: query.max_price,
    };

    let items = state.menu_repository().list_items(&filter).await?;
    Ok(Json(ItemsResponse { items }))
}

/// GET /api/menu/items/{id}
pub async fn get_item(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ItemResponse>> {
    // An unparseable id is just a missing item from the caller's view
    let item = match state.menu_repository().find_item_detail(&id).await {
        Ok(item) => item,
        Err(crate::db::repository::RepoError::Validation(_)) => None,
        Err(e) => return Err(e.into()),
    };
    let item = item.ok_or_else(|| AppError::not_found("Item not found"))?;
    Ok(Json(ItemResponse { item }))
}
