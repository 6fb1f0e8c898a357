//! Settings API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::repository::settings;
use crate::utils::{AppResult, ValidatedJson};
use shared::models::{Settings, SettingsUpdate};

/// GET /api/settings - 获取店铺设置 (首次读取时创建默认行)
pub async fn get(State(state): State<ServerState>) -> AppResult<Json<Settings>> {
    let current = settings::get_or_create(&state.db).await?;
    Ok(Json(current))
}

/// PATCH /api/settings - 更新店铺设置
pub async fn update(
    State(state): State<ServerState>,
    ValidatedJson(payload): ValidatedJson<SettingsUpdate>,
) -> AppResult<Json<Settings>> {
    let updated = settings::update(&state.db, payload).await?;
    tracing::info!(tax_rate = updated.tax_rate, "Store settings updated");
    Ok(Json(updated))
}
