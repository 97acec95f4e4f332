//! PostgreSQL menu store
//!
//! Filters are assembled with `QueryBuilder` and bound parameters. Sort
//! columns come from the closed `SortField` set, never from raw input.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};
use std::collections::BTreeMap;

use crate::domain::{
    CatalogError, CatalogResult, CategoryGrouping, GroupMode, MenuDraft, MenuFilter, MenuItem,
    SortField, SortSpec,
};
use crate::store::MenuStore;

const MENU_COLUMNS: &str =
    "id, name, category, calories, price, ingredients, description, created_at, updated_at";

/// Database row for menu
#[derive(Debug, sqlx::FromRow)]
struct MenuRow {
    id: i64,
    name: String,
    category: String,
    calories: i32,
    price: Decimal,
    ingredients: Json<Vec<String>>,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MenuRow> for MenuItem {
    fn from(row: MenuRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            category: row.category,
            calories: row.calories,
            price: row.price,
            ingredients: row.ingredients.0,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct PgMenuStore {
    pool: PgPool,
}

impl PgMenuStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escapes LIKE metacharacters so user text matches literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &MenuFilter) {
    qb.push(" WHERE TRUE");

    if !filter.query.is_empty() {
        let pattern = format!("%{}%", escape_like(&filter.query));
        qb.push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if !filter.category.is_empty() {
        qb.push(" AND category = ").push_bind(filter.category.clone());
    }
    if filter.has_min_price() {
        qb.push(" AND price >= ").push_bind(filter.min_price);
    }
    if filter.has_max_price() {
        qb.push(" AND price <= ").push_bind(filter.max_price);
    }
    if filter.has_max_calories() {
        qb.push(" AND calories <= ").push_bind(filter.max_calories);
    }
}

/// Text columns sort bytewise so both stores agree regardless of the
/// database's default collation.
fn order_clause(spec: SortSpec) -> String {
    let collate = match spec.field {
        SortField::Name | SortField::Category => " COLLATE \"C\"",
        _ => "",
    };
    format!(
        " ORDER BY {}{} {}, id DESC",
        spec.field.column(),
        collate,
        spec.direction.keyword()
    )
}

#[async_trait]
impl MenuStore for PgMenuStore {
    async fn create(&self, draft: &MenuDraft) -> CatalogResult<MenuItem> {
        let row = sqlx::query_as::<_, MenuRow>(
            r#"
            INSERT INTO menus (name, category, calories, price, ingredients, description,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
            RETURNING id, name, category, calories, price, ingredients, description,
                      created_at, updated_at
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.category)
        .bind(draft.calories)
        .bind(draft.price)
        .bind(Json(&draft.ingredients))
        .bind(&draft.description)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(menu_id = row.id, "Menu inserted");
        Ok(row.into())
    }

    async fn list(&self, filter: &MenuFilter) -> CatalogResult<(Vec<MenuItem>, u64)> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM menus");
        push_filters(&mut count_query, filter);
        let (total,): (i64,) = count_query
            .build_query_as()
            .fetch_one(&self.pool)
            .await?;

        let mut page_query = QueryBuilder::<Postgres>::new(format!("SELECT {MENU_COLUMNS} FROM menus"));
        push_filters(&mut page_query, filter);
        page_query
            .push(order_clause(filter.sort_spec()))
            .push(" LIMIT ")
            .push_bind(filter.limit())
            .push(" OFFSET ")
            .push_bind(filter.offset());

        let rows: Vec<MenuRow> = page_query
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;

        Ok((
            rows.into_iter().map(Into::into).collect(),
            u64::try_from(total).unwrap_or_default(),
        ))
    }

    async fn get_by_id(&self, id: i64) -> CatalogResult<MenuItem> {
        sqlx::query_as::<_, MenuRow>(&format!("SELECT {MENU_COLUMNS} FROM menus WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Into::into)
            .ok_or(CatalogError::NotFound(id))
    }

    async fn update(&self, id: i64, draft: &MenuDraft) -> CatalogResult<MenuItem> {
        sqlx::query_as::<_, MenuRow>(
            r#"
            UPDATE menus SET
                name = $2,
                category = $3,
                calories = $4,
                price = $5,
                ingredients = $6,
                description = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, category, calories, price, ingredients, description,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.category)
        .bind(draft.calories)
        .bind(draft.price)
        .bind(Json(&draft.ingredients))
        .bind(&draft.description)
        .fetch_optional(&self.pool)
        .await?
        .map(Into::into)
        .ok_or(CatalogError::NotFound(id))
    }

    async fn delete(&self, id: i64) -> CatalogResult<()> {
        let result = sqlx::query("DELETE FROM menus WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound(id));
        }
        Ok(())
    }

    async fn group_by_category(
        &self,
        mode: GroupMode,
        limit_per_category: Option<usize>,
    ) -> CatalogResult<CategoryGrouping> {
        match mode {
            GroupMode::Count => {
                let rows = sqlx::query_as::<_, (String, i64)>(
                    "SELECT category, COUNT(*) FROM menus GROUP BY category",
                )
                .fetch_all(&self.pool)
                .await?;

                let counts: BTreeMap<String, u64> = rows
                    .into_iter()
                    .map(|(category, count)| (category, u64::try_from(count).unwrap_or_default()))
                    .collect();
                Ok(CategoryGrouping::CountView(counts))
            }
            GroupMode::List => {
                let cap = limit_per_category.and_then(|cap| i64::try_from(cap).ok());
                let rows = sqlx::query_as::<_, MenuRow>(&format!(
                    r#"
                    SELECT {MENU_COLUMNS} FROM (
                        SELECT {MENU_COLUMNS},
                               ROW_NUMBER() OVER (
                                   PARTITION BY category
                                   ORDER BY name COLLATE "C" ASC, id ASC
                               ) AS position
                        FROM menus
                    ) ranked
                    WHERE $1::BIGINT IS NULL OR position <= $1
                    ORDER BY category COLLATE "C" ASC, name COLLATE "C" ASC, id ASC
                    "#
                ))
                .bind(cap)
                .fetch_all(&self.pool)
                .await?;

                let items = rows.into_iter().map(Into::into).collect();
                Ok(CategoryGrouping::list_from_ordered(items, limit_per_category))
            }
        }
    }

    async fn ping(&self) -> CatalogResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
