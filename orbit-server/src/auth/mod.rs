//! 认证授权模块
//!
//! 提供 JWT 认证、会话解析和中间件：
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentUser`] - 当前用户上下文 (每次请求从数据库重新加载)
//! - [`AdminUser`] / [`MaybeUser`] - 处理器级别的权限提取器
//! - [`authenticate`] / [`require_admin`] / [`admin_page_guard`] - 中间件

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod session;

pub use extractor::{AdminUser, MaybeUser};
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{admin_page_guard, authenticate, require_admin};
pub use password::{hash_password, verify_password};
pub use session::{CurrentUser, SESSION_COOKIE};
