//! Settings API 模块
//!
//! 单例店铺设置: 读取公开，修改需要管理员。

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/settings", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new().route("/", get(handler::get));

    let write_routes = Router::new()
        .route("/", axum::routing::patch(handler::update))
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(write_routes)
}
