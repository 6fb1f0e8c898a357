//! Ingredient Repository
//!
//! Deletion is soft: `is_active` is cleared, the row stays fetchable by id.

use super::{RepoError, RepoResult, on_duplicate};
use shared::models::{Ingredient, IngredientCreate, IngredientUpdate};
use shared::util::{now_millis, snowflake_id};
use shared::{AppError, ErrorCode};
use sqlx::SqlitePool;

const SELECT_INGREDIENT: &str =
    "SELECT id, name, description, allergens, is_active, created_at, updated_at FROM ingredients";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Ingredient>> {
    let ingredients =
        sqlx::query_as::<_, Ingredient>(&format!("{SELECT_INGREDIENT} ORDER BY name"))
            .fetch_all(pool)
            .await?;
    Ok(ingredients)
}

pub async fn find_active(pool: &SqlitePool) -> RepoResult<Vec<Ingredient>> {
    let ingredients = sqlx::query_as::<_, Ingredient>(&format!(
        "{SELECT_INGREDIENT} WHERE is_active = 1 ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(ingredients)
}

/// Case-insensitive name search (chat assistant lookups)
pub async fn search(pool: &SqlitePool, query: &str) -> RepoResult<Vec<Ingredient>> {
    let pattern = format!("%{}%", query.trim().to_lowercase());
    let ingredients = sqlx::query_as::<_, Ingredient>(&format!(
        "{SELECT_INGREDIENT} WHERE is_active = 1 AND LOWER(name) LIKE ? ORDER BY name LIMIT 50"
    ))
    .bind(pattern)
    .fetch_all(pool)
    .await?;
    Ok(ingredients)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Ingredient>> {
    let ingredient = sqlx::query_as::<_, Ingredient>(&format!("{SELECT_INGREDIENT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(ingredient)
}

pub async fn create(pool: &SqlitePool, data: IngredientCreate) -> RepoResult<Ingredient> {
    let now = now_millis();
    let name = data.name.trim().to_string();
    let ingredient = sqlx::query_as::<_, Ingredient>(
        "INSERT INTO ingredients (id, name, description, allergens, is_active, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?) \
         RETURNING id, name, description, allergens, is_active, created_at, updated_at",
    )
    .bind(snowflake_id())
    .bind(&name)
    .bind(&data.description)
    .bind(&data.allergens)
    .bind(data.is_active.unwrap_or(true))
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(RepoError::from)
    .map_err(on_duplicate(
        ErrorCode::IngredientNameExists,
        &format!("Ingredient '{name}' already exists"),
    ))?;
    Ok(ingredient)
}

pub async fn update(pool: &SqlitePool, id: i64, data: IngredientUpdate) -> RepoResult<Ingredient> {
    let rows = sqlx::query(
        "UPDATE ingredients SET \
         name = COALESCE(?1, name), \
         description = COALESCE(?2, description), \
         allergens = COALESCE(?3, allergens), \
         is_active = COALESCE(?4, is_active), \
         updated_at = ?5 \
         WHERE id = ?6",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(&data.description)
    .bind(&data.allergens)
    .bind(data.is_active)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await
    .map_err(RepoError::from)
    .map_err(on_duplicate(
        ErrorCode::IngredientNameExists,
        "Ingredient name already exists",
    ))?;

    if rows.rows_affected() == 0 {
        return Err(ingredient_not_found(id));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| ingredient_not_found(id))
}

/// Soft delete
pub async fn deactivate(pool: &SqlitePool, id: i64) -> RepoResult<Ingredient> {
    update(
        pool,
        id,
        IngredientUpdate {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
}

pub(crate) fn ingredient_not_found(id: i64) -> RepoError {
    AppError::with_message(
        ErrorCode::IngredientNotFound,
        format!("Ingredient {id} not found"),
    )
    .into()
}
