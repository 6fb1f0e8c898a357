//! Menu Item API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::api::upload::remove_stored_image;
use crate::auth::MaybeUser;
use crate::core::ServerState;
use crate::db::repository::menu_item;
use crate::utils::{AppError, AppResult, ErrorCode, ValidatedJson};
use shared::models::{MenuItem, MenuItemCreate, MenuItemDetail, MenuItemFilter, MenuItemUpdate};

/// GET /api/menu-items - 获取菜品 (`?category=<slug>&featured=true&includeInactive=true`)
///
/// `includeInactive` 仅管理员生效
pub async fn list(
    State(state): State<ServerState>,
    user: MaybeUser,
    Query(mut filter): Query<MenuItemFilter>,
) -> AppResult<Json<Vec<MenuItemDetail>>> {
    filter.include_inactive = filter.include_inactive && user.is_admin();
    let items = menu_item::find_all(&state.db, &filter).await?;
    Ok(Json(items))
}

/// GET /api/menu-items/{id} - 获取菜品详情 (含杯型、标签、原料、配方)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: MaybeUser,
    Path(id): Path<i64>,
) -> AppResult<Json<MenuItemDetail>> {
    let detail = menu_item::find_detail(&state.db, id)
        .await?
        .filter(|d| d.item.is_active || user.is_admin())
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::MenuItemNotFound, format!("Menu item {id} not found"))
        })?;
    Ok(Json(detail))
}

/// POST /api/menu-items - 创建菜品及其关联
pub async fn create(
    State(state): State<ServerState>,
    ValidatedJson(payload): ValidatedJson<MenuItemCreate>,
) -> AppResult<Json<MenuItemDetail>> {
    let detail = menu_item::create(&state.db, payload).await?;
    Ok(Json(detail))
}

/// PATCH /api/menu-items/{id} - 更新菜品 (关联只在变化时重写)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<MenuItemUpdate>,
) -> AppResult<Json<MenuItemDetail>> {
    let (detail, changes) = menu_item::update(&state.db, id, payload).await?;
    if changes.any() {
        tracing::info!(
            menu_item_id = id,
            sizes = changes.sizes,
            tags = changes.tags,
            ingredients = changes.ingredients,
            recipe_steps = changes.recipe_steps,
            "Menu item relations rewritten"
        );
    }
    Ok(Json(detail))
}

/// DELETE /api/menu-items/{id} - 删除菜品 (历史订单保留快照)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MenuItem>> {
    let deleted = menu_item::delete(&state.db, id).await?;
    if let Some(path) = deleted.image_path.as_deref() {
        remove_stored_image(&state.config.menu_uploads_dir(), path).await;
    }
    tracing::info!(menu_item_id = id, name = %deleted.name, "Menu item deleted");
    Ok(Json(deleted))
}
