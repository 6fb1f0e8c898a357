//! User API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::{AdminUser, hash_password};
use crate::core::ServerState;
use crate::db::repository::user::{self, NewUser, UserChanges};
use crate::security_log;
use crate::utils::{AppError, AppResult, ErrorCode, ValidatedJson};
use shared::models::{User, UserCreate, UserUpdate};

/// GET /api/users - 获取所有用户
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<User>>> {
    let users = user::find_all(&state.db).await?;
    Ok(Json(users))
}

/// GET /api/users/{id} - 获取单个用户
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<User>> {
    let u = user::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| user_not_found(id))?;
    Ok(Json(u))
}

/// POST /api/users - 创建用户 (默认 USER 角色)
pub async fn create(
    State(state): State<ServerState>,
    AdminUser(admin): AdminUser,
    ValidatedJson(payload): ValidatedJson<UserCreate>,
) -> AppResult<Json<User>> {
    let password_hash = hash(&payload.password)?;
    let created = user::create(
        &state.db,
        NewUser {
            username: payload.username.trim().to_string(),
            password_hash,
            email: payload.email,
            role: payload.role.unwrap_or_default(),
        },
    )
    .await?;

    security_log!(
        "INFO",
        "user_created",
        user_id = created.id,
        role = created.role.as_str(),
        operator = admin.username.clone()
    );
    Ok(Json(created))
}

/// PATCH /api/users/{id} - 更新用户 (密码可选，重新哈希)
pub async fn update(
    State(state): State<ServerState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UserUpdate>,
) -> AppResult<Json<User>> {
    if user::find_by_id(&state.db, id).await?.is_none() {
        return Err(user_not_found(id));
    }

    let password_hash = payload.password.as_deref().map(hash).transpose()?;
    let role_changed = payload.role.is_some();
    let updated = user::update(
        &state.db,
        id,
        UserChanges {
            username: payload.username.map(|u| u.trim().to_string()),
            password_hash,
            email: payload.email.map(Some),
            role: payload.role,
        },
    )
    .await?;

    if role_changed {
        security_log!(
            "INFO",
            "user_role_changed",
            user_id = id,
            role = updated.role.as_str(),
            operator = admin.username.clone()
        );
    }
    Ok(Json(updated))
}

/// DELETE /api/users/{id} - 删除用户 (不能删除自己)
pub async fn delete(
    State(state): State<ServerState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if admin.id == id {
        return Err(AppError::new(ErrorCode::CannotDeleteSelf));
    }
    if !user::delete(&state.db, id).await? {
        return Err(user_not_found(id));
    }
    security_log!(
        "INFO",
        "user_deleted",
        user_id = id,
        operator = admin.username.clone()
    );
    Ok(Json(true))
}

fn hash(password: &str) -> AppResult<String> {
    hash_password(password).map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
}

fn user_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::UserNotFound, format!("User {id} not found"))
}
