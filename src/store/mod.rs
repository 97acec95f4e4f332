//! Menu persistence.
//!
//! `MenuStore` owns filter translation, sorting and paging. `PgMenuStore`
//! is the production backend; `InMemoryMenuStore` keeps the same semantics
//! in process.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::domain::{CatalogResult, CategoryGrouping, GroupMode, MenuDraft, MenuFilter, MenuItem};

pub use memory::InMemoryMenuStore;
pub use postgres::PgMenuStore;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MenuStore: Send + Sync {
    /// Persists a new item, assigning its id and timestamps.
    async fn create(&self, draft: &MenuDraft) -> CatalogResult<MenuItem>;

    /// Returns the requested page and the number of items matching the
    /// filter before paging.
    async fn list(&self, filter: &MenuFilter) -> CatalogResult<(Vec<MenuItem>, u64)>;

    async fn get_by_id(&self, id: i64) -> CatalogResult<MenuItem>;

    /// Overwrites every mutable field of an existing item.
    async fn update(&self, id: i64, draft: &MenuDraft) -> CatalogResult<MenuItem>;

    async fn delete(&self, id: i64) -> CatalogResult<()>;

    /// `limit_per_category` of `None` keeps every item.
    async fn group_by_category(
        &self,
        mode: GroupMode,
        limit_per_category: Option<usize>,
    ) -> CatalogResult<CategoryGrouping>;

    /// Lightweight connectivity check.
    async fn ping(&self) -> CatalogResult<()>;
}
