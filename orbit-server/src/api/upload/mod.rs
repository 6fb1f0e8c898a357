//! Upload Routes
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/menu-items/{id}/upload-image | POST | 上传菜品图片 (multipart 字段 `file`) | 管理员 |
//! | /api/uploads/menu/{filename} | GET | 读取菜品图片 | 无 |

mod handler;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub use handler::{UploadResponse, remove_stored_image};

/// Public URL prefix of stored menu images
pub const MENU_IMAGE_URL_PREFIX: &str = "/api/uploads/menu/";

/// Multipart framing allowance on top of the file size limit
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build upload router
pub fn router(upload_max_bytes: usize) -> Router<ServerState> {
    let upload_routes = Router::new()
        .route(
            "/api/menu-items/{id}/upload-image",
            post(handler::upload_menu_image),
        )
        .layer(DefaultBodyLimit::max(upload_max_bytes + MULTIPART_OVERHEAD))
        .layer(middleware::from_fn(require_admin));

    Router::new()
        .route("/api/uploads/menu/{filename}", get(handler::serve_menu_image))
        .merge(upload_routes)
}
