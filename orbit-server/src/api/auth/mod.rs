//! 认证路由
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/auth/register | POST | 注册 (USER 角色) | 无 |
//! | /api/auth/login | POST | 登录 | 无 |
//! | /api/auth/guest | POST | 访客会话 | 无 |
//! | /api/auth/logout | POST | 清除会话 Cookie | 无 |
//! | /api/auth/me | GET | 当前用户 | 需要 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/register", post(handler::register))
        .route("/login", post(handler::login))
        .route("/guest", post(handler::guest))
        .route("/logout", post(handler::logout))
        .route("/me", get(handler::me))
}
