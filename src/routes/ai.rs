//! AI-backed menu endpoints.
//!
//! Both proxy to the configured completion model through the catalog
//! service; any model failure surfaces as 502.

use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::app::AppState;
use crate::domain::ai::{
    GenerateDescriptionRequest, GenerateDescriptionResponse, RecommendationListResponse,
    RecommendationRequest,
};
use crate::error::ApiResult;

/// Generate a marketing description for a dish.
///
/// POST /menu/generate-description
pub async fn generate_description(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateDescriptionRequest>,
) -> ApiResult<impl IntoResponse> {
    let generated_description = state
        .catalog
        .generate_description(&req.name, &req.ingredients)
        .await?;

    Ok(Json(GenerateDescriptionResponse {
        generated_description,
    }))
}

/// Recommend catalog items for a free-text preference.
///
/// POST /menu/recommendations
pub async fn recommend_menus(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecommendationRequest>,
) -> ApiResult<impl IntoResponse> {
    let recommendations = state.catalog.recommend(&req.preference).await?;

    tracing::debug!(
        count = recommendations.len(),
        "Returning recommendations"
    );

    Ok(Json(RecommendationListResponse { recommendations }))
}
