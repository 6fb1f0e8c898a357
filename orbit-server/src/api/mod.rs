//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 注册、登录、访客会话
//! - [`categories`] - 分类管理接口
//! - [`sizes`] - 杯型管理接口
//! - [`tags`] - 标签管理接口
//! - [`ingredients`] - 原料管理接口
//! - [`menu_items`] - 菜品管理接口
//! - [`upload`] - 菜品图片上传与读取
//! - [`orders`] - 下单与订单管理
//! - [`users`] - 用户管理接口
//! - [`settings`] - 店铺设置
//! - [`chat`] - 聊天助手
//! - [`admin`] - 管理后台静态资源

pub mod admin;
pub mod auth;
pub mod chat;
pub mod health;
pub mod upload;

// Data model APIs
pub mod categories;
pub mod ingredients;
pub mod menu_items;
pub mod orders;
pub mod settings;
pub mod sizes;
pub mod tags;
pub mod users;

use axum::Router;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};

/// Build the Axum router (without state)
pub fn build_router(state: &ServerState) -> Router<ServerState> {
    let router = Router::<ServerState>::new()
        // Core APIs
        .merge(health::router())
        .merge(auth::router())
        .merge(upload::router(state.config.upload_max_bytes))
        .merge(chat::router())
        // Data model APIs
        .merge(categories::router())
        .merge(sizes::router())
        .merge(tags::router())
        .merge(ingredients::router())
        .merge(menu_items::router())
        .merge(orders::router())
        .merge(users::router())
        .merge(settings::router());

    match state.config.admin_dist_dir.as_deref() {
        Some(dir) => router.merge(admin::router(dir)),
        None => router,
    }
}
