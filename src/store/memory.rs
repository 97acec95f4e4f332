//! In-process menu store
//!
//! Used when no database is configured and by the HTTP tests.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::{
    CatalogError, CatalogResult, CategoryGrouping, GroupMode, MenuDraft, MenuFilter, MenuItem,
    SortDirection, SortField, SortSpec,
};
use crate::store::MenuStore;

#[derive(Default)]
struct Inner {
    next_id: i64,
    items: BTreeMap<i64, MenuItem>,
}

#[derive(Clone, Default)]
pub struct InMemoryMenuStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryMenuStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fully formed item, keeping its id and timestamps.
    pub fn insert(&self, item: MenuItem) {
        let mut inner = self.inner.write();
        inner.next_id = inner.next_id.max(item.id);
        inner.items.insert(item.id, item);
    }

    pub fn len(&self) -> usize {
        self.inner.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn compare(a: &MenuItem, b: &MenuItem, spec: SortSpec) -> Ordering {
    let ordering = match spec.field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Name => a.name.cmp(&b.name),
        SortField::Category => a.category.cmp(&b.category),
        SortField::Calories => a.calories.cmp(&b.calories),
        SortField::Price => a.price.cmp(&b.price),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    };
    let ordering = match spec.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    };
    // ties resolve newest id first, matching the SQL backend
    ordering.then_with(|| b.id.cmp(&a.id))
}

#[async_trait]
impl MenuStore for InMemoryMenuStore {
    async fn create(&self, draft: &MenuDraft) -> CatalogResult<MenuItem> {
        let mut inner = self.inner.write();
        inner.next_id += 1;
        let now = Utc::now();
        let item = MenuItem {
            id: inner.next_id,
            name: draft.name.clone(),
            category: draft.category.clone(),
            calories: draft.calories,
            price: draft.price,
            ingredients: draft.ingredients.clone(),
            description: draft.description.clone(),
            created_at: now,
            updated_at: now,
        };
        inner.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn list(&self, filter: &MenuFilter) -> CatalogResult<(Vec<MenuItem>, u64)> {
        let inner = self.inner.read();
        let mut matching: Vec<&MenuItem> = inner
            .items
            .values()
            .filter(|item| filter.matches(item))
            .collect();
        let total = matching.len() as u64;

        let spec = filter.sort_spec();
        matching.sort_by(|a, b| compare(a, b, spec));

        let offset = usize::try_from(filter.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(filter.limit()).unwrap_or(usize::MAX);
        let page = matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Ok((page, total))
    }

    async fn get_by_id(&self, id: i64) -> CatalogResult<MenuItem> {
        self.inner
            .read()
            .items
            .get(&id)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }

    async fn update(&self, id: i64, draft: &MenuDraft) -> CatalogResult<MenuItem> {
        let mut inner = self.inner.write();
        let item = inner.items.get_mut(&id).ok_or(CatalogError::NotFound(id))?;
        item.name = draft.name.clone();
        item.category = draft.category.clone();
        item.calories = draft.calories;
        item.price = draft.price;
        item.ingredients = draft.ingredients.clone();
        item.description = draft.description.clone();
        item.updated_at = Utc::now();
        Ok(item.clone())
    }

    async fn delete(&self, id: i64) -> CatalogResult<()> {
        self.inner
            .write()
            .items
            .remove(&id)
            .map(|_| ())
            .ok_or(CatalogError::NotFound(id))
    }

    async fn group_by_category(
        &self,
        mode: GroupMode,
        limit_per_category: Option<usize>,
    ) -> CatalogResult<CategoryGrouping> {
        let inner = self.inner.read();
        match mode {
            GroupMode::Count => {
                let mut counts: BTreeMap<String, u64> = BTreeMap::new();
                for item in inner.items.values() {
                    *counts.entry(item.category.clone()).or_default() += 1;
                }
                Ok(CategoryGrouping::CountView(counts))
            }
            GroupMode::List => {
                let mut ordered: Vec<MenuItem> = inner.items.values().cloned().collect();
                ordered.sort_by(|a, b| {
                    a.category
                        .cmp(&b.category)
                        .then_with(|| a.name.cmp(&b.name))
                        .then_with(|| a.id.cmp(&b.id))
                });
                Ok(CategoryGrouping::list_from_ordered(
                    ordered,
                    limit_per_category,
                ))
            }
        }
    }

    async fn ping(&self) -> CatalogResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::menu::fixtures::item;
    use rust_decimal::Decimal;

    fn seeded() -> InMemoryMenuStore {
        let store = InMemoryMenuStore::new();
        store.insert(item(1, "Latte", "Coffee", 30));
        store.insert(item(2, "Mocha", "Coffee", 35));
        store.insert(item(3, "Americano", "Coffee", 25));
        store.insert(item(4, "Green Tea", "Tea", 20));
        store.insert(item(5, "Croissant", "Pastry", 40));
        store
    }

    #[tokio::test]
    async fn test_total_ignores_paging() {
        let store = seeded();
        let coffee = |page, per_page| MenuFilter {
            category: "Coffee".to_string(),
            page,
            per_page,
            ..MenuFilter::default()
        };

        let (first, total) = store.list(&coffee(1, 2)).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(first.len(), 2);

        let (second, total) = store.list(&coffee(2, 2)).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(second.len(), 1);

        let (beyond, total) = store.list(&coffee(9, 2)).await.unwrap();
        assert_eq!(total, 3);
        assert!(beyond.is_empty());
    }

    #[tokio::test]
    async fn test_huge_page_is_empty_not_overflow() {
        let store = seeded();
        let filter = MenuFilter {
            page: 1_000_000_000_000_000_000,
            per_page: 10,
            ..MenuFilter::default()
        };
        let (items, total) = store.list(&filter).await.unwrap();
        assert!(items.is_empty());
        assert_eq!(total, 5);
    }

    #[tokio::test]
    async fn test_default_order_is_newest_first() {
        let store = seeded();
        let (items, _) = store.list(&MenuFilter::first_page(10)).await.unwrap();
        let ids: Vec<i64> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![5, 4, 3, 2, 1]);

        let malformed = MenuFilter {
            sort: "price:asc:desc".to_string(),
            ..MenuFilter::first_page(10)
        };
        let (items, _) = store.list(&malformed).await.unwrap();
        assert_eq!(items[0].id, 5);
    }

    #[tokio::test]
    async fn test_sort_price_ascending() {
        let store = seeded();
        let filter = MenuFilter {
            sort: "price:asc".to_string(),
            ..MenuFilter::first_page(10)
        };
        let (items, _) = store.list(&filter).await.unwrap();
        assert!(items.windows(2).all(|w| w[0].price <= w[1].price));
        assert_eq!(items[0].name, "Green Tea");
    }

    #[tokio::test]
    async fn test_price_and_text_filters() {
        let store = seeded();
        let filter = MenuFilter {
            min_price: Decimal::from(25),
            max_price: Decimal::from(35),
            ..MenuFilter::first_page(10)
        };
        let (_, total) = store.list(&filter).await.unwrap();
        assert_eq!(total, 3);

        let filter = MenuFilter {
            query: "tea".to_string(),
            ..MenuFilter::first_page(10)
        };
        let (items, total) = store.list(&filter).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].name, "Green Tea");
    }

    #[tokio::test]
    async fn test_group_list_is_capped_and_name_sorted() {
        let store = seeded();
        let grouping = store
            .group_by_category(GroupMode::List, Some(2))
            .await
            .unwrap();
        let CategoryGrouping::ListView(groups) = grouping else {
            panic!("expected list view");
        };
        let coffee: Vec<&str> = groups["Coffee"].iter().map(|i| i.name.as_str()).collect();
        assert_eq!(coffee, vec!["Americano", "Latte"]);
        assert!(groups.values().all(|items| items.len() <= 2));
    }

    #[tokio::test]
    async fn test_group_count() {
        let store = seeded();
        let grouping = store.group_by_category(GroupMode::Count, None).await.unwrap();
        let CategoryGrouping::CountView(counts) = grouping else {
            panic!("expected count view");
        };
        assert_eq!(counts["Coffee"], 3);
        assert_eq!(counts["Tea"], 1);
        assert_eq!(counts["Pastry"], 1);
    }

    #[tokio::test]
    async fn test_crud_not_found() {
        let store = InMemoryMenuStore::new();
        let draft = MenuDraft {
            name: "Latte".to_string(),
            category: "Coffee".to_string(),
            price: Decimal::from(30),
            ..MenuDraft::default()
        };
        assert!(store.is_empty());
        let created = store.create(&draft).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(store.len(), 1);

        let renamed = MenuDraft {
            name: "Oat Latte".to_string(),
            ..draft.clone()
        };
        let updated = store.update(created.id, &renamed).await.unwrap();
        assert_eq!(updated.name, "Oat Latte");
        assert_eq!(updated.created_at, created.created_at);

        store.delete(created.id).await.unwrap();
        assert!(store.is_empty());
        assert!(matches!(
            store.get_by_id(created.id).await,
            Err(CatalogError::NotFound(1))
        ));
        assert!(matches!(
            store.update(created.id, &draft).await,
            Err(CatalogError::NotFound(1))
        ));
        assert!(matches!(
            store.delete(created.id).await,
            Err(CatalogError::NotFound(1))
        ));
    }
}
