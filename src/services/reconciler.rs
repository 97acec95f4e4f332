//! Trust boundary between model output and catalog data.
//!
//! The model's reply is parsed into `RawSuggestion`s and each one is kept
//! only if it names a real catalog item exactly.

use std::collections::{HashMap, HashSet};

use crate::domain::ai::{RawSuggestion, Recommendation};
use crate::domain::{CatalogError, CatalogResult, MenuItem};

/// Removes optional markdown code fences around a JSON payload.
fn strip_fences(raw: &str) -> &str {
    let text = raw.trim();
    let text = match text.strip_prefix("```") {
        // drop the language tag, whatever its case
        Some(rest) => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
        None => text,
    };
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

/// Parses the model's reply as a JSON array of `{menu_name, reason}`.
pub fn parse(raw: &str) -> CatalogResult<Vec<RawSuggestion>> {
    serde_json::from_str(strip_fences(raw)).map_err(|e| {
        tracing::warn!(error = %e, "AI recommendation output is not the expected JSON array");
        CatalogError::MalformedAiResponse(e.to_string())
    })
}

/// Keeps suggestions whose name matches a catalog item exactly
/// (case-sensitive), in suggestion order. Unknown names are dropped and a
/// name suggested twice is returned once.
pub fn reconcile(suggestions: Vec<RawSuggestion>, catalog: &[MenuItem]) -> Vec<Recommendation> {
    let by_name: HashMap<&str, &MenuItem> = catalog
        .iter()
        .map(|item| (item.name.as_str(), item))
        .collect();
    let mut seen: HashSet<String> = HashSet::new();

    let mut recommendations = Vec::with_capacity(suggestions.len());
    for suggestion in suggestions {
        let Some(item) = by_name.get(suggestion.menu_name.as_str()) else {
            tracing::debug!(menu_name = %suggestion.menu_name, "Dropping suggestion not in catalog");
            continue;
        };
        if !seen.insert(suggestion.menu_name) {
            continue;
        }
        recommendations.push(Recommendation {
            menu: (*item).clone(),
            reason: suggestion.reason,
        });
    }
    recommendations
}
