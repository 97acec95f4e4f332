//! Menu domain types
//!
//! The stored menu item plus the request-scoped values used to list,
//! sort and group items. None of the query values are persisted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::domain::error::CatalogError;

/// Menu item entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub calories: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub ingredients: Vec<String>,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mutable fields of a menu item, supplied on create and on full update
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MenuDraft {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub calories: i32,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl MenuDraft {
    /// Checks the invariants every stored item must hold.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::invalid("name is required"));
        }
        if self.price < Decimal::ZERO {
            return Err(CatalogError::invalid("price cannot be negative"));
        }
        if self.calories < 0 {
            return Err(CatalogError::invalid("calories cannot be negative"));
        }
        Ok(())
    }
}

/// Column a listing may be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    Category,
    Calories,
    Price,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Category => "category",
            Self::Calories => "calories",
            Self::Price => "price",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

impl FromStr for SortField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "category" => Ok(Self::Category),
            "calories" => Ok(Self::Calories),
            "price" => Ok(Self::Price),
            "created_at" => Ok(Self::CreatedAt),
            "updated_at" => Ok(Self::UpdatedAt),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(()),
        }
    }
}

/// Parsed `field:direction` sort specifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Most recently created first.
    pub const NEWEST_FIRST: SortSpec = SortSpec {
        field: SortField::CreatedAt,
        direction: SortDirection::Desc,
    };

    /// Parses `field:direction`. Anything other than exactly one colon
    /// separating a known field and direction yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split(':');
        let (field, direction) = match (parts.next(), parts.next(), parts.next()) {
            (Some(field), Some(direction), None) => (field, direction),
            _ => return None,
        };

        Some(Self {
            field: field.parse().ok()?,
            direction: direction.parse().ok()?,
        })
    }
}

/// Listing query specification
///
/// Zero bounds mean "unbounded"; an empty `query` or `category` disables
/// that predicate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuFilter {
    pub query: String,
    pub category: String,
    pub min_price: Decimal,
    pub max_price: Decimal,
    pub max_calories: i32,
    pub sort: String,
    pub page: i64,
    pub per_page: i64,
}

impl MenuFilter {
    pub const DEFAULT_PAGE: i64 = 1;
    pub const DEFAULT_PER_PAGE: i64 = 10;

    /// Replaces out-of-range paging values with the defaults.
    pub fn normalized(mut self) -> Self {
        if self.page < 1 {
            self.page = Self::DEFAULT_PAGE;
        }
        if self.per_page < 1 {
            self.per_page = Self::DEFAULT_PER_PAGE;
        }
        self
    }

    /// First page of `per_page` items, newest first, no predicates.
    pub fn first_page(per_page: i64) -> Self {
        Self {
            page: 1,
            per_page,
            ..Self::default()
        }
    }

    /// Rows skipped before this page. Saturates, so an absurd `page` yields
    /// an empty page instead of overflowing.
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.per_page.max(1))
    }

    pub fn limit(&self) -> i64 {
        self.per_page.max(1)
    }

    pub fn sort_spec(&self) -> SortSpec {
        SortSpec::parse(&self.sort).unwrap_or(SortSpec::NEWEST_FIRST)
    }

    pub fn has_min_price(&self) -> bool {
        self.min_price > Decimal::ZERO
    }

    pub fn has_max_price(&self) -> bool {
        self.max_price > Decimal::ZERO
    }

    pub fn has_max_calories(&self) -> bool {
        self.max_calories > 0
    }

    /// Evaluates every predicate of the filter against one item.
    pub fn matches(&self, item: &MenuItem) -> bool {
        if !self.query.is_empty() {
            let needle = self.query.to_lowercase();
            let hit = item.name.to_lowercase().contains(&needle)
                || item.description.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        if !self.category.is_empty() && item.category != self.category {
            return false;
        }
        if self.has_min_price() && item.price < self.min_price {
            return false;
        }
        if self.has_max_price() && item.price > self.max_price {
            return false;
        }
        if self.has_max_calories() && item.calories > self.max_calories {
            return false;
        }
        true
    }
}

/// Aggregation mode for the category view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupMode {
    Count,
    List,
}

impl FromStr for GroupMode {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "count" => Ok(Self::Count),
            "list" => Ok(Self::List),
            other => Err(CatalogError::invalid(format!(
                "invalid mode '{other}', use 'count' or 'list'"
            ))),
        }
    }
}

/// Items grouped by category, keyed in ascending category order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CategoryGrouping {
    CountView(BTreeMap<String, u64>),
    ListView(BTreeMap<String, Vec<MenuItem>>),
}

impl CategoryGrouping {
    /// Builds the list view from items already ordered by category then
    /// name, keeping at most `limit` per category (`None` keeps all).
    pub fn list_from_ordered(items: Vec<MenuItem>, limit: Option<usize>) -> Self {
        let mut grouped: BTreeMap<String, Vec<MenuItem>> = BTreeMap::new();
        for item in items {
            let bucket = grouped.entry(item.category.clone()).or_default();
            if limit.is_some_and(|cap| bucket.len() >= cap) {
                continue;
            }
            bucket.push(item);
        }
        Self::ListView(grouped)
    }
}

/// Converts the caller's per-category cap, where zero or negative means
/// unbounded.
pub fn per_category_cap(limit: i64) -> Option<usize> {
    usize::try_from(limit).ok().filter(|cap| *cap > 0)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    pub fn item(id: i64, name: &str, category: &str, price: i64) -> MenuItem {
        let created = Utc.timestamp_opt(1_700_000_000 + id * 60, 0).unwrap();
        MenuItem {
            id,
            name: name.to_string(),
            category: category.to_string(),
            calories: 100 * id as i32,
            price: Decimal::from(price),
            ingredients: vec!["water".to_string()],
            description: format!("{name} description"),
            created_at: created,
            updated_at: created,
        }
    }
}
