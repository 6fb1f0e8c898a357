//! Ingredient API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::ingredient;
use crate::utils::{AppError, AppResult, ErrorCode, ValidatedJson};
use shared::models::{Ingredient, IngredientCreate, IngredientUpdate};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub active: bool,
    /// Name substring
    pub q: Option<String>,
}

/// GET /api/ingredients - 获取原料 (`?active=true`, `?q=` 名称搜索)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Ingredient>>> {
    let search = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
    let ingredients = match (search, query.active) {
        (Some(q), _) => ingredient::search(&state.db, q).await?,
        (None, true) => ingredient::find_active(&state.db).await?,
        (None, false) => ingredient::find_all(&state.db).await?,
    };
    Ok(Json(ingredients))
}

/// GET /api/ingredients/{id} - 获取单个原料 (含已停用)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Ingredient>> {
    let i = ingredient::find_by_id(&state.db, id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::IngredientNotFound, format!("Ingredient {id} not found"))
    })?;
    Ok(Json(i))
}

/// POST /api/ingredients - 创建原料
pub async fn create(
    State(state): State<ServerState>,
    ValidatedJson(payload): ValidatedJson<IngredientCreate>,
) -> AppResult<Json<Ingredient>> {
    let i = ingredient::create(&state.db, payload).await?;
    Ok(Json(i))
}

/// PATCH /api/ingredients/{id} - 更新原料
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<IngredientUpdate>,
) -> AppResult<Json<Ingredient>> {
    let i = ingredient::update(&state.db, id, payload).await?;
    Ok(Json(i))
}

/// DELETE /api/ingredients/{id} - 停用原料 (软删除)
pub async fn deactivate(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Ingredient>> {
    let i = ingredient::deactivate(&state.db, id).await?;
    tracing::info!(ingredient_id = id, "Ingredient deactivated");
    Ok(Json(i))
}
