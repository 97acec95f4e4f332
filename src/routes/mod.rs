pub mod ai;
pub mod health;
pub mod menu;

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Public routes
        .route("/", get(health::welcome))
        .route("/health", get(health::health_check))
        // Menu catalog
        .route("/menu", post(menu::create_menu).get(menu::list_menus))
        .route("/menu/search", get(menu::search_menus))
        .route("/menu/group-by-category", get(menu::group_by_category))
        .route(
            "/menu/:id",
            get(menu::get_menu)
                .put(menu::update_menu)
                .delete(menu::delete_menu),
        )
        // AI endpoints
        .route(
            "/menu/generate-description",
            post(ai::generate_description),
        )
        .route("/menu/recommendations", post(ai::recommend_menus))
}
