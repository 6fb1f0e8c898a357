//! Category Repository

use super::{RepoError, RepoResult, on_duplicate};
use shared::models::{Category, CategoryCreate, CategoryUpdate};
use shared::util::{now_millis, slugify, snowflake_id};
use shared::{AppError, ErrorCode};
use sqlx::SqlitePool;

pub(crate) const SELECT_CATEGORY: &str = "SELECT c.id, c.name, c.slug, c.icon, c.is_active, c.sort_order, \
     (SELECT COUNT(*) FROM menu_items m WHERE m.category_id = c.id) AS menu_item_count, \
     c.created_at, c.updated_at FROM categories c";

/// All categories ordered for display; inactive ones only when asked
pub async fn find_all(pool: &SqlitePool, include_inactive: bool) -> RepoResult<Vec<Category>> {
    let sql = if include_inactive {
        format!("{SELECT_CATEGORY} ORDER BY c.sort_order, c.name")
    } else {
        format!("{SELECT_CATEGORY} WHERE c.is_active = 1 ORDER BY c.sort_order, c.name")
    };
    let categories = sqlx::query_as::<_, Category>(&sql).fetch_all(pool).await?;
    Ok(categories)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(&format!("{SELECT_CATEGORY} WHERE c.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(category)
}

pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> RepoResult<Option<Category>> {
    let category =
        sqlx::query_as::<_, Category>(&format!("{SELECT_CATEGORY} WHERE c.slug = ? LIMIT 1"))
            .bind(slug)
            .fetch_optional(pool)
            .await?;
    Ok(category)
}

pub async fn create(pool: &SqlitePool, data: CategoryCreate) -> RepoResult<Category> {
    let slug = resolve_slug(data.slug.as_deref(), &data.name)?;
    let now = now_millis();
    let id = snowflake_id();

    sqlx::query(
        "INSERT INTO categories (id, name, slug, icon, is_active, sort_order, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(data.name.trim())
    .bind(&slug)
    .bind(&data.icon)
    .bind(data.is_active.unwrap_or(true))
    .bind(data.sort_order.unwrap_or(0))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(RepoError::from)
    .map_err(on_duplicate(
        ErrorCode::CategorySlugExists,
        &format!("Category slug '{slug}' already exists"),
    ))?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create category".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: CategoryUpdate) -> RepoResult<Category> {
    let slug = match data.slug.as_deref() {
        Some(raw) => Some(resolve_slug(Some(raw), raw)?),
        None => None,
    };

    let rows = sqlx::query(
        "UPDATE categories SET \
         name = COALESCE(?1, name), \
         slug = COALESCE(?2, slug), \
         icon = COALESCE(?3, icon), \
         is_active = COALESCE(?4, is_active), \
         sort_order = COALESCE(?5, sort_order), \
         updated_at = ?6 \
         WHERE id = ?7",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(&slug)
    .bind(&data.icon)
    .bind(data.is_active)
    .bind(data.sort_order)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await
    .map_err(RepoError::from)
    .map_err(on_duplicate(
        ErrorCode::CategorySlugExists,
        "Category slug already exists",
    ))?;

    if rows.rows_affected() == 0 {
        return Err(category_not_found(id));
    }
    find_by_id(pool, id).await?.ok_or_else(|| category_not_found(id))
}

/// Hard delete; rejected while any menu item references the category
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let category = find_by_id(pool, id)
        .await?
        .ok_or_else(|| category_not_found(id))?;

    if category.menu_item_count > 0 {
        return Err(AppError::with_message(
            ErrorCode::CategoryHasItems,
            format!(
                "Category '{}' still has {} menu item(s)",
                category.name, category.menu_item_count
            ),
        )
        .with_detail("menuItemCount", category.menu_item_count)
        .into());
    }

    sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) fn category_not_found(id: i64) -> RepoError {
    AppError::with_message(ErrorCode::CategoryNotFound, format!("Category {id} not found")).into()
}

/// Explicit slug (normalized) or one derived from the name
pub(crate) fn resolve_slug(explicit: Option<&str>, name: &str) -> RepoResult<String> {
    let slug = slugify(explicit.unwrap_or(name));
    if slug.is_empty() {
        return Err(RepoError::Validation(
            "Slug must contain at least one letter or digit".into(),
        ));
    }
    Ok(slug)
}
