//! Menu Repository
//!
//! Read paths for the public menu endpoints plus the insert helpers used
//! by seeding and test fixtures.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{MenuCategory, MenuItem, MenuItemCreate, MenuItemDetail};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

/// Filters accepted by `GET /api/menu/items`
///
/// All fields are optional and combine with AND; `category = "all"` is
/// treated as no filter, mirroring the frontend's default tab.
#[derive(Debug, Clone, Default)]
pub struct MenuItemFilter {
    pub category: Option<String>,
    pub search: Option<String>,
    pub dietary: Vec<String>,
    pub max_price: Option<f64>,
}

#[derive(Clone)]
pub struct MenuRepository {
    base: BaseRepository,
}

impl MenuRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All categories, name-ascending
    pub async fn list_categories(&self) -> RepoResult<Vec<MenuCategory>> {
        let categories: Vec<MenuCategory> = self
            .base
            .db()
            .query("SELECT * FROM menu_category ORDER BY name ASC")
            .await?
            .take(0)?;
        Ok(categories)
    }

    /// Find a category by its slug
    pub async fn find_category_by_slug(&self, slug: &str) -> RepoResult<Option<MenuCategory>> {
        let slug_owned = slug.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM menu_category WHERE slug = $slug LIMIT 1")
            .bind(("slug", slug_owned))
            .await?;
        let categories: Vec<MenuCategory> = result.take(0)?;
        Ok(categories.into_iter().next())
    }

    /// List items matching the filter, name-ascending
    pub async fn list_items(&self, filter: &MenuItemFilter) -> RepoResult<Vec<MenuItem>> {
        let mut conditions: Vec<&str> = Vec::new();

        let category = filter
            .category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != "all")
            .map(str::to_string);
        if category.is_some() {
            conditions.push("category.slug = $category");
        }

        let search = filter
            .search
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::to_lowercase);
        if search.is_some() {
            conditions.push(
                "(string::contains(string::lowercase(name), $search) \
                 OR string::contains(string::lowercase(description ?? \"\"), $search))",
            );
        }

        if !filter.dietary.is_empty() {
            conditions.push("dietary CONTAINSANY $dietary");
        }

        if filter.max_price.is_some() {
            conditions.push("price <= $max_price");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!("SELECT * FROM menu_item {where_clause} ORDER BY name ASC");

        let mut query = self.base.db().query(sql);
        if let Some(category) = category {
            query = query.bind(("category", category));
        }
        if let Some(search) = search {
            query = query.bind(("search", search));
        }
        if !filter.dietary.is_empty() {
            query = query.bind(("dietary", filter.dietary.clone()));
        }
        if let Some(max_price) = filter.max_price {
            query = query.bind(("max_price", max_price));
        }

        let items: Vec<MenuItem> = query.await?.take(0)?;
        Ok(items)
    }

    /// Find a single item by id
    pub async fn find_item(&self, id: &str) -> RepoResult<Option<MenuItem>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let item: Option<MenuItem> = self.base.db().select(thing).await?;
        Ok(item)
    }

    /// Find a single item with its category hydrated
    pub async fn find_item_detail(&self, id: &str) -> RepoResult<Option<MenuItemDetail>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM $item FETCH category")
            .bind(("item", thing))
            .await?;
        let items: Vec<MenuItemDetail> = result.take(0)?;
        Ok(items.into_iter().next())
    }

    /// Insert a category (seeding / fixtures)
    pub async fn create_category(
        &self,
        slug: &str,
        name: &str,
        icon: Option<&str>,
    ) -> RepoResult<MenuCategory> {
        let mut result = self
            .base
            .db()
            .query("CREATE menu_category SET slug = $slug, name = $name, icon = $icon RETURN AFTER")
            .bind(("slug", slug.to_string()))
            .bind(("name", name.to_string()))
            .bind(("icon", icon.map(str::to_string)))
            .await?;
        let created: Option<MenuCategory> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create category".to_string()))
    }

    /// Insert a menu item (seeding / fixtures)
    pub async fn create_item(&self, data: MenuItemCreate) -> RepoResult<MenuItem> {
        let created: Option<MenuItem> = self.base.db().create("menu_item").content(data).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))
    }

    /// Number of categories (seed gate)
    pub async fn count_categories(&self) -> RepoResult<i64> {
        #[derive(serde::Deserialize)]
        struct CountRow {
            count: i64,
        }
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS count FROM menu_category GROUP ALL")
            .await?;
        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }
}
