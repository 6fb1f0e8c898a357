//! 认证中间件
//!
//! - [`authenticate`] 全局中间件: 解析会话并注入 [`CurrentUser`]，不拦截请求
//! - [`require_admin`] 管理员 API 路由: 非管理员返回 401 JSON
//! - [`admin_page_guard`] `/admin/*` 页面: 非管理员 303 跳转登录页

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use http::Extensions;

use crate::auth::session::{AuthRejection, CurrentUser, extract_token, resolve_user};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// 会话解析中间件
///
/// 有令牌时验证并加载用户；令牌无效时写入 [`AuthRejection`]，
/// 由需要登录的提取器决定是否拒绝。公共路由不受影响。
pub async fn authenticate(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Response {
    if req.method() == http::Method::OPTIONS {
        return next.run(req).await;
    }

    if let Some(token) = extract_token(req.headers()) {
        match resolve_user(&state, &token).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(err) => {
                req.extensions_mut().insert(AuthRejection(err));
            }
        }
    }

    next.run(req).await
}

/// 从请求扩展读取已认证用户
pub fn session_user(extensions: &Extensions) -> Result<&CurrentUser, AppError> {
    if let Some(user) = extensions.get::<CurrentUser>() {
        return Ok(user);
    }
    match extensions.get::<AuthRejection>() {
        Some(AuthRejection(err)) => Err(err.clone()),
        None => Err(AppError::unauthorized()),
    }
}

/// 管理员中间件 - 要求管理员角色
///
/// 未登录与非管理员均返回 401 (`AdminRequired`)
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = session_user(req.extensions()).map_err(|_| {
        security_log!("WARN", "admin_required", uri = req.uri().to_string());
        AppError::admin_required()
    })?;

    if !user.is_admin() {
        security_log!(
            "WARN",
            "admin_required",
            user_id = user.id,
            username = user.username.clone(),
            uri = req.uri().to_string()
        );
        return Err(AppError::admin_required());
    }

    Ok(next.run(req).await)
}

/// 管理后台页面守卫
///
/// 非管理员跳转到 `/login?callbackUrl=<原路径>`
pub async fn admin_page_guard(req: Request, next: Next) -> Response {
    let is_admin = session_user(req.extensions())
        .map(CurrentUser::is_admin)
        .unwrap_or(false);

    if is_admin {
        return next.run(req).await;
    }

    let callback = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/admin");
    Redirect::to(&login_redirect_target(callback)).into_response()
}

/// `/login?callbackUrl=<encoded>`
pub fn login_redirect_target(callback: &str) -> String {
    format!("/login?callbackUrl={}", encode_query_component(callback))
}

fn encode_query_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
