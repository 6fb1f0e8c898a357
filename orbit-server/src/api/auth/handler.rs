//! Authentication Handlers
//!
//! Every successful sign-in returns the token in the body and also sets
//! the `HttpOnly` session cookie, so browsers and API clients both work.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use shared::client::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};
use shared::models::{Role, User};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::{clear_session_cookie, session_cookie};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::user::{self, NewUser};
use crate::db::seed::GUEST_USERNAME;
use crate::security_log;
use crate::utils::{AppError, AppResult, ValidatedJson};

/// POST /api/auth/register - 注册普通用户
pub async fn register(
    State(state): State<ServerState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> AppResult<Response> {
    let password_hash = hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;

    let created = user::create(
        &state.db,
        NewUser {
            username: req.username.trim().to_string(),
            password_hash,
            email: req.email.filter(|e| !e.trim().is_empty()),
            role: Role::User,
        },
    )
    .await?;

    tracing::info!(user_id = created.id, username = %created.username, "User registered");
    session_response(&state, &created)
}

/// POST /api/auth/login - 用户名密码登录
pub async fn login(
    State(state): State<ServerState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> AppResult<Response> {
    let found = user::find_by_username(&state.db, req.username.trim()).await?;

    // Unified error for unknown user and wrong password
    let Some(account) = found.filter(|u| verify_password(&req.password, &u.password_hash)) else {
        security_log!("WARN", "login_failed", username = req.username.clone());
        return Err(AppError::invalid_credentials());
    };

    security_log!(
        "INFO",
        "login_success",
        user_id = account.id,
        username = account.username.clone()
    );
    session_response(&state, &account)
}

/// POST /api/auth/guest - 以内置访客账号登录
pub async fn guest(State(state): State<ServerState>) -> AppResult<Response> {
    let account = user::find_by_username(&state.db, GUEST_USERNAME)
        .await?
        .ok_or_else(|| AppError::internal("Guest account is missing"))?;
    session_response(&state, &account)
}

/// POST /api/auth/logout - 清除会话 Cookie
pub async fn logout() -> Response {
    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, clear_session_cookie())],
    )
        .into_response()
}

/// GET /api/auth/me - 当前用户信息
pub async fn me(user: CurrentUser) -> Json<UserInfo> {
    Json(UserInfo {
        id: user.id,
        username: user.username,
        email: user.email,
        role: user.role,
    })
}

fn session_response(state: &ServerState, account: &User) -> AppResult<Response> {
    let token = state
        .jwt_service
        .generate_token(account)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    let cookie = session_cookie(
        &token,
        state.jwt_service.cookie_max_age_seconds(),
        state.config.is_production(),
    );

    let body = LoginResponse {
        token,
        user: UserInfo::from(account),
    };
    Ok(([(header::SET_COOKIE, cookie)], Json(body)).into_response())
}
