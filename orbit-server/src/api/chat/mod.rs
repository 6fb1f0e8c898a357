//! Chat assistant API (管理员)

mod handler;

use axum::{Router, middleware, routing::post};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/chat", post(handler::chat))
        .layer(middleware::from_fn(require_admin))
}
