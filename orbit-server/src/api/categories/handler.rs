//! Category API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::MaybeUser;
use crate::core::ServerState;
use crate::db::repository::category;
use crate::utils::{AppError, AppResult, ErrorCode, ValidatedJson};
use shared::models::{Category, CategoryCreate, CategoryUpdate};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

/// GET /api/categories - 获取分类 (`includeInactive` 仅管理员生效)
pub async fn list(
    State(state): State<ServerState>,
    user: MaybeUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Category>>> {
    let include_inactive = query.include_inactive && user.is_admin();
    let categories = category::find_all(&state.db, include_inactive).await?;
    Ok(Json(categories))
}

/// GET /api/categories/{id} - 获取单个分类
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Category>> {
    let c = category::find_by_id(&state.db, id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::CategoryNotFound, format!("Category {id} not found"))
    })?;
    Ok(Json(c))
}

/// POST /api/categories - 创建分类
pub async fn create(
    State(state): State<ServerState>,
    ValidatedJson(payload): ValidatedJson<CategoryCreate>,
) -> AppResult<Json<Category>> {
    let c = category::create(&state.db, payload).await?;
    tracing::info!(category_id = c.id, slug = %c.slug, "Category created");
    Ok(Json(c))
}

/// PATCH /api/categories/{id} - 更新分类
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    let c = category::update(&state.db, id, payload).await?;
    Ok(Json(c))
}

/// DELETE /api/categories/{id} - 删除分类 (仍有菜品时拒绝)
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    category::delete(&state.db, id).await?;
    tracing::info!(category_id = id, "Category deleted");
    Ok(Json(true))
}
