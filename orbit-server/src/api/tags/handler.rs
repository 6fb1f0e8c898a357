//! Tag API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::tag;
use crate::utils::{AppError, AppResult, ErrorCode, ValidatedJson};
use shared::models::{Tag, TagCreate, TagUpdate};

/// GET /api/tags - 获取所有标签
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Tag>>> {
    let tags = tag::find_all(&state.db).await?;
    Ok(Json(tags))
}

/// GET /api/tags/{id} - 获取单个标签
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Tag>> {
    let t = tag::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::TagNotFound, format!("Tag {id} not found")))?;
    Ok(Json(t))
}

/// POST /api/tags - 创建标签
pub async fn create(
    State(state): State<ServerState>,
    ValidatedJson(payload): ValidatedJson<TagCreate>,
) -> AppResult<Json<Tag>> {
    let t = tag::create(&state.db, payload).await?;
    Ok(Json(t))
}

/// PATCH /api/tags/{id} - 更新标签
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<TagUpdate>,
) -> AppResult<Json<Tag>> {
    let t = tag::update(&state.db, id, payload).await?;
    Ok(Json(t))
}

/// DELETE /api/tags/{id} - 删除标签 (被菜品引用时拒绝)
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    tag::delete(&state.db, id).await?;
    Ok(Json(true))
}
