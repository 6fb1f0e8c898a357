//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::auth::{CurrentUser, MaybeUser};
use crate::core::ServerState;
use crate::db::repository::order;
use crate::orders::place_order;
use crate::utils::{AppError, AppResult, ErrorCode, ValidatedJson};
use shared::models::{Order, OrderCreate, OrderFilter, OrderStatusUpdate, OrderTracking};

/// GET /api/orders - 订单列表 (管理员看全部，普通用户只看自己的)
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(filter): Query<OrderFilter>,
) -> AppResult<Json<Vec<Order>>> {
    let owner = (!user.is_admin()).then_some(user.id);
    let orders = order::find_all(&state.db, &filter, owner).await?;
    Ok(Json(orders))
}

/// POST /api/orders - 下单 (服务端重新计价)
pub async fn create(
    State(state): State<ServerState>,
    user: MaybeUser,
    ValidatedJson(payload): ValidatedJson<OrderCreate>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let placed = place_order(&state.db, user.id(), payload).await?;
    Ok((StatusCode::CREATED, Json(placed)))
}

/// GET /api/orders/{id} - 订单详情 (本人或管理员)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    // Someone else's order answers like a missing one
    let found = order::find_by_id(&state.db, id)
        .await?
        .filter(|o| user.is_admin() || o.user_id == Some(user.id))
        .ok_or_else(|| AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found")))?;
    Ok(Json(found))
}

/// PATCH /api/orders/{id} - 更新订单状态
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    let updated = order::update_status(&state.db, id, payload.status).await?;
    tracing::info!(order_id = id, status = %updated.status, "Order status updated");
    Ok(Json(updated))
}

/// GET /api/orders/number/{orderNumber} - 按订单号追踪 (公开视图，不含顾客信息)
pub async fn track(
    State(state): State<ServerState>,
    Path(order_number): Path<String>,
) -> AppResult<Json<OrderTracking>> {
    let found = order::find_by_number(&state.db, &order_number)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::OrderNotFound,
                format!("Order {order_number} not found"),
            )
        })?;
    Ok(Json(found.into()))
}
