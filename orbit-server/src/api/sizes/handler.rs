//! Size API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::size;
use crate::utils::{AppError, AppResult, ErrorCode, ValidatedJson};
use shared::models::{Size, SizeCreate, SizeUpdate};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub active: bool,
}

/// GET /api/sizes - 获取杯型 (`?active=true` 只返回启用的)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Size>>> {
    let sizes = size::find_all(&state.db, query.active).await?;
    Ok(Json(sizes))
}

/// GET /api/sizes/{id} - 获取单个杯型
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Size>> {
    let s = size::find_by_id(&state.db, id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::SizeNotFound, format!("Size {id} not found"))
    })?;
    Ok(Json(s))
}

/// POST /api/sizes - 创建杯型
pub async fn create(
    State(state): State<ServerState>,
    ValidatedJson(payload): ValidatedJson<SizeCreate>,
) -> AppResult<Json<Size>> {
    let s = size::create(&state.db, payload).await?;
    tracing::info!(size_id = s.id, abbreviation = %s.abbreviation, "Size created");
    Ok(Json(s))
}

/// PATCH /api/sizes/{id} - 更新杯型
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<SizeUpdate>,
) -> AppResult<Json<Size>> {
    let s = size::update(&state.db, id, payload).await?;
    Ok(Json(s))
}

/// DELETE /api/sizes/{id} - 删除杯型 (同时移除菜品关联)
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    size::delete(&state.db, id).await?;
    tracing::info!(size_id = id, "Size deleted");
    Ok(Json(true))
}
