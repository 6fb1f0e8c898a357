//! 管理后台静态资源
//!
//! `ADMIN_DIST_DIR` 设置时挂载到 `/admin`，非管理员 303 跳转到登录页。

use axum::{Router, middleware};
use tower_http::services::ServeDir;

use crate::auth::admin_page_guard;
use crate::core::ServerState;

pub fn router(dist_dir: &str) -> Router<ServerState> {
    let index = std::path::Path::new(dist_dir).join("index.html");
    let service = ServeDir::new(dist_dir)
        .append_index_html_on_directories(true)
        .fallback(tower_http::services::ServeFile::new(index));

    Router::new()
        .nest_service("/admin", service)
        .layer(middleware::from_fn(admin_page_guard))
}
