//! AI-related domain models.
//!
//! `RawSuggestion` is what the model claims; `Recommendation` is what
//! survived matching against the live catalog.

use serde::{Deserialize, Serialize};

use crate::domain::menu::MenuItem;

/// Untrusted suggestion as emitted by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSuggestion {
    pub menu_name: String,
    pub reason: String,
}

/// Suggestion matched to a real menu item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub menu: MenuItem,
    pub reason: String,
}

// =============================================================================
// Request/Response DTOs for API endpoints
// =============================================================================

/// Request for menu recommendations.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationRequest {
    pub preference: String,
}

/// Response for menu recommendations.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationListResponse {
    pub recommendations: Vec<Recommendation>,
}

/// Request for description generation.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateDescriptionRequest {
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
}

/// Response for description generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateDescriptionResponse {
    pub generated_description: String,
}
