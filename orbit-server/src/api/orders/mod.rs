//! Order API 模块
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/orders | GET | 管理员: 全部 (`?status=`)；用户: 自己的订单 | 需要 |
//! | /api/orders | POST | 下单 (允许访客) | 可选 |
//! | /api/orders/{id} | GET | 订单详情 (本人或管理员) | 需要 |
//! | /api/orders/{id} | PATCH | 更新订单状态 | 管理员 |
//! | /api/orders/number/{orderNumber} | GET | 订单追踪 | 无 |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    let customer_routes = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/number/{order_number}", get(handler::track));

    let admin_routes = Router::new()
        .route("/{id}", patch(handler::update_status))
        .layer(middleware::from_fn(require_admin));

    customer_routes.merge(admin_routes)
}
