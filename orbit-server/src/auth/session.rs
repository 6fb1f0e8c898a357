//! 会话解析
//!
//! 令牌来源: `Authorization: Bearer <token>` 优先，其次 `orbit_session` Cookie。
//! 每次请求都会从数据库重新加载用户，角色变更立即生效，已删除用户返回 401。

use http::{HeaderMap, HeaderValue, header};
use shared::models::{Role, User};

use crate::auth::{JwtError, JwtService};
use crate::core::ServerState;
use crate::db::repository::user;
use crate::security_log;
use crate::utils::AppError;

/// 会话 Cookie 名称
pub const SESSION_COOKIE: &str = "orbit_session";

/// 当前用户上下文
///
/// 由认证中间件解析，注入到请求扩展
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub role: Role,
}

impl CurrentUser {
    /// 是否管理员
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
        }
    }
}

/// 会话解析失败 (令牌存在但无效)，由中间件写入请求扩展
#[derive(Debug, Clone)]
pub struct AuthRejection(pub AppError);

/// 从请求头提取令牌
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(JwtService::extract_from_header)
    {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|v| !v.is_empty())
}

/// 验证令牌并从数据库加载用户
pub async fn resolve_user(state: &ServerState, token: &str) -> Result<CurrentUser, AppError> {
    let claims = state.jwt_service.validate_token(token).map_err(|e| {
        security_log!("WARN", "auth_failed", error = e.to_string());
        match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid token"),
        }
    })?;

    let user_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| AppError::invalid_token("Malformed token subject"))?;

    match user::find_by_id(&state.db, user_id).await? {
        Some(user) => Ok(CurrentUser::from(user)),
        None => {
            security_log!(
                "WARN",
                "auth_user_missing",
                user_id = user_id,
                username = claims.username
            );
            Err(AppError::unauthorized())
        }
    }
}

/// 构造会话 Cookie (HttpOnly, SameSite=Lax)
pub fn session_cookie(token: &str, max_age_seconds: i64, secure: bool) -> HeaderValue {
    let mut cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_seconds}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| clear_session_cookie())
}

/// 清除会话 Cookie
pub fn clear_session_cookie() -> HeaderValue {
    HeaderValue::from_static("orbit_session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(extract_token(&headers).as_deref(), Some("abc.def"));
    }

    #[test]
    fn test_extract_cookie_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; orbit_session=tok123; other=1"),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("tok123"));
    }

    #[test]
    fn test_bearer_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer header"));
        headers.insert(header::COOKIE, HeaderValue::from_static("orbit_session=cookie"));
        assert_eq!(extract_token(&headers).as_deref(), Some("header"));
    }

    #[test]
    fn test_no_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("orbit_session="));
        assert!(extract_token(&headers).is_none());
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok", 3600, true);
        let value = cookie.to_str().unwrap();
        assert!(value.starts_with("orbit_session=tok;"));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("Max-Age=3600"));
        assert!(value.ends_with("Secure"));
    }
}
