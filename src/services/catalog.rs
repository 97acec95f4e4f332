//! Menu catalog service.
//!
//! Orchestrates the store, the AI gateway and the reconciler, and enforces
//! the write-side invariants before anything reaches persistence.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::api::pagination::PageResult;
use crate::domain::ai::Recommendation;
use crate::domain::{
    per_category_cap, CatalogError, CatalogResult, CategoryGrouping, GroupMode, MenuDraft,
    MenuFilter, MenuItem,
};
use crate::services::ai_gateway::AiGateway;
use crate::services::reconciler;
use crate::store::MenuStore;

/// Default cap on the catalog snapshot sent to the model.
pub const DEFAULT_SNAPSHOT_LIMIT: i64 = 100;

#[derive(Clone)]
pub struct MenuCatalogService {
    store: Arc<dyn MenuStore>,
    ai: AiGateway,
    snapshot_limit: i64,
}

impl MenuCatalogService {
    pub fn new(store: Arc<dyn MenuStore>, ai: AiGateway) -> Self {
        Self {
            store,
            ai,
            snapshot_limit: DEFAULT_SNAPSHOT_LIMIT,
        }
    }

    pub fn with_snapshot_limit(mut self, limit: i64) -> Self {
        self.snapshot_limit = limit.max(1);
        self
    }

    /// Description used when generation fails at create time.
    pub fn fallback_description(name: &str) -> String {
        format!("Delicious {name}")
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create(&self, mut draft: MenuDraft) -> CatalogResult<MenuItem> {
        draft.validate()?;

        if draft.description.trim().is_empty() {
            let prompt = AiGateway::build_description_prompt(&draft.name, &draft.ingredients);
            draft.description = match self.ai.complete(&prompt).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "Description generation failed, using fallback");
                    Self::fallback_description(&draft.name)
                }
            };
        }

        let item = self.store.create(&draft).await?;
        info!(menu_id = item.id, "Menu created");
        Ok(item)
    }

    pub async fn list(&self, filter: MenuFilter) -> CatalogResult<PageResult<MenuItem>> {
        let filter = filter.normalized();
        let (items, total) = self.store.list(&filter).await?;
        Ok(PageResult::new(items, total, filter.page, filter.per_page))
    }

    pub async fn get_detail(&self, id: i64) -> CatalogResult<MenuItem> {
        self.store.get_by_id(id).await
    }

    #[instrument(skip(self, draft))]
    pub async fn update(&self, id: i64, draft: MenuDraft) -> CatalogResult<MenuItem> {
        draft.validate()?;
        let item = self.store.update(id, &draft).await?;
        info!(menu_id = item.id, "Menu updated");
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> CatalogResult<()> {
        self.store.delete(id).await?;
        info!(menu_id = id, "Menu deleted");
        Ok(())
    }

    pub async fn grouped_view(
        &self,
        mode: &str,
        limit_per_category: i64,
    ) -> CatalogResult<CategoryGrouping> {
        let mode: GroupMode = mode.parse()?;
        self.store
            .group_by_category(mode, per_category_cap(limit_per_category))
            .await
    }

    /// Direct generation: AI failures reach the caller.
    #[instrument(skip(self, ingredients))]
    pub async fn generate_description(
        &self,
        name: &str,
        ingredients: &[String],
    ) -> CatalogResult<String> {
        if name.trim().is_empty() {
            return Err(CatalogError::invalid("name is required"));
        }
        let prompt = AiGateway::build_description_prompt(name, ingredients);
        self.ai.complete(&prompt).await
    }

    #[instrument(skip(self, preference))]
    pub async fn recommend(&self, preference: &str) -> CatalogResult<Vec<Recommendation>> {
        let preference = preference.trim();
        if preference.is_empty() {
            return Err(CatalogError::invalid("preference is required"));
        }

        let (catalog, _) = self
            .store
            .list(&MenuFilter::first_page(self.snapshot_limit))
            .await?;
        if catalog.is_empty() {
            info!("Catalog is empty, nothing to recommend");
            return Ok(Vec::new());
        }

        let summary = AiGateway::catalog_summary(&catalog);
        let prompt = AiGateway::build_recommendation_prompt(preference, &summary);
        let raw = self.ai.complete(&prompt).await?;

        let suggestions = reconciler::parse(&raw)?;
        let suggested = suggestions.len();
        let recommendations = reconciler::reconcile(suggestions, &catalog);
        info!(
            suggested,
            matched = recommendations.len(),
            snapshot = catalog.len(),
            "Recommendations reconciled"
        );
        Ok(recommendations)
    }

    /// Storage connectivity for the health endpoint.
    pub async fn storage_healthy(&self) -> bool {
        self.store.ping().await.is_ok()
    }
}
