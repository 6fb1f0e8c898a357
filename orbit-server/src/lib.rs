//! Orbit Server - 咖啡店点单与后台管理服务
//!
//! # 架构概述
//!
//! - **数据库** (`db`): SQLite (sqlx) 存储与嵌入式迁移
//! - **认证** (`auth`): JWT + Argon2，Bearer 或会话 Cookie
//! - **下单** (`orders`): 服务端重新计价、原子订单号
//! - **菜单** (`menu`): 菜品关联集合差异比较
//! - **聊天助手** (`chat`): OpenAI 兼容接口 + 目录工具调用
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! orbit-server/src/
//! ├── core/          # 配置、状态、错误、HTTP 服务
//! ├── auth/          # JWT 认证、会话、角色守卫
//! ├── api/           # HTTP 路由和处理器
//! ├── chat/          # 聊天助手
//! ├── db/            # 数据库层 (repository + seed)
//! ├── menu/          # 菜品关联差异
//! ├── orders/        # 下单流程
//! └── utils/         # 日志、校验
//! ```

pub mod api;
pub mod auth;
pub mod chat;
pub mod core;
pub mod db;
pub mod menu;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState, build_app};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ErrorBody, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境: 加载 `.env` 并初始化日志
///
/// | 环境变量 | 说明 |
/// |----------|------|
/// | LOG_LEVEL | 日志级别 (RUST_LOG 优先) |
/// | LOG_DIR | 日志目录，设置后按天滚动写文件 |
/// | LOG_JSON | `true` 时输出 JSON 格式 |
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    // .env 不存在不是错误
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty());
    let log_json = std::env::var("LOG_JSON")
        .ok()
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1");

    init_logger_with_file(log_level.as_deref(), log_json, log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ____       __    _ __
  / __ \_____/ /_  (_) /_
 / / / / ___/ __ \/ / __/
/ /_/ / /  / /_/ / / /_
\____/_/  /_.___/_/\__/
      Coffee
    "#
    );
}
