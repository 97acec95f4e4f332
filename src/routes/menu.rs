//! Menu catalog endpoints: CRUD, listing/search and category grouping.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;

use crate::api::{Created, DataResponse, MessageResponse};
use crate::app::AppState;
use crate::domain::{MenuDraft, MenuFilter};
use crate::error::ApiResult;

/// Items per category when `per_category` is absent or unparsable.
pub const DEFAULT_PER_CATEGORY: i64 = 5;

/// Query parameters shared by `GET /menu` and `GET /menu/search`.
#[derive(Debug, Default, Deserialize)]
pub struct MenuQueryParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub max_cal: Option<i32>,
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl From<MenuQueryParams> for MenuFilter {
    fn from(params: MenuQueryParams) -> Self {
        MenuFilter {
            query: params.q.unwrap_or_default(),
            category: params.category.unwrap_or_default(),
            min_price: params.min_price.unwrap_or_default(),
            max_price: params.max_price.unwrap_or_default(),
            max_calories: params.max_cal.unwrap_or_default(),
            sort: params.sort.unwrap_or_default(),
            page: params.page.unwrap_or_default(),
            per_page: params.per_page.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GroupQueryParams {
    pub mode: Option<String>,
    pub per_category: Option<String>,
}

impl GroupQueryParams {
    pub fn per_category(&self) -> i64 {
        self.per_category
            .as_deref()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(DEFAULT_PER_CATEGORY)
    }
}

/// Create a menu item
///
/// POST /menu
pub async fn create_menu(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<MenuDraft>,
) -> ApiResult<impl IntoResponse> {
    let menu = state.catalog.create(draft).await?;
    Ok(Created(DataResponse::with_message(
        "Menu created successfully",
        menu,
    )))
}

/// List menu items with filters, sorting and pagination
///
/// GET /menu
pub async fn list_menus(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MenuQueryParams>,
) -> ApiResult<impl IntoResponse> {
    let page = state.catalog.list(params.into()).await?;
    Ok(page)
}

/// Search menu items by name or description
///
/// GET /menu/search
pub async fn search_menus(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MenuQueryParams>,
) -> ApiResult<impl IntoResponse> {
    tracing::debug!(q = ?params.q, "Searching menus");
    let page = state.catalog.list(params.into()).await?;
    Ok(page)
}

/// Get a menu item by ID
///
/// GET /menu/:id
pub async fn get_menu(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let menu = state.catalog.get_detail(id).await?;
    Ok(DataResponse::new(menu))
}

/// Replace the editable fields of a menu item
///
/// PUT /menu/:id
pub async fn update_menu(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(draft): Json<MenuDraft>,
) -> ApiResult<impl IntoResponse> {
    let menu = state.catalog.update(id, draft).await?;
    Ok(DataResponse::with_message("Menu updated successfully", menu))
}

/// Delete a menu item
///
/// DELETE /menu/:id
pub async fn delete_menu(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    state.catalog.delete(id).await?;
    Ok(MessageResponse::new("Menu deleted successfully"))
}

/// Group menu items by category
///
/// GET /menu/group-by-category?mode=count|list&per_category=N
pub async fn group_by_category(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GroupQueryParams>,
) -> ApiResult<impl IntoResponse> {
    let mode = params.mode.as_deref().unwrap_or_default();
    let grouping = state
        .catalog
        .grouped_view(mode, params.per_category())
        .await?;
    Ok(DataResponse::new(grouping))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params_map_onto_filter() {
        let params = MenuQueryParams {
            q: Some("latte".into()),
            max_price: Some(Decimal::new(5, 0)),
            sort: Some("price:asc".into()),
            page: Some(2),
            ..Default::default()
        };

        let filter = MenuFilter::from(params);
        assert_eq!(filter.query, "latte");
        assert_eq!(filter.category, "");
        assert_eq!(filter.max_price, Decimal::new(5, 0));
        assert_eq!(filter.min_price, Decimal::ZERO);
        assert_eq!(filter.sort, "price:asc");
        assert_eq!(filter.page, 2);
        assert_eq!(filter.per_page, 0);
    }

    #[test]
    fn test_per_category_defaults() {
        let mut params = GroupQueryParams::default();
        assert_eq!(params.per_category(), DEFAULT_PER_CATEGORY);

        params.per_category = Some("abc".into());
        assert_eq!(params.per_category(), DEFAULT_PER_CATEGORY);

        params.per_category = Some("0".into());
        assert_eq!(params.per_category(), 0);

        params.per_category = Some("12".into());
        assert_eq!(params.per_category(), 12);
    }
}
