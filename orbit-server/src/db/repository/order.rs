//! Order Repository

use super::{RepoError, RepoResult};
use shared::models::{Order, OrderFilter, OrderItem, OrderStatus};
use shared::util::now_millis;
use shared::{AppError, ErrorCode};
use sqlx::{SqliteConnection, SqlitePool};

const SELECT_ORDER: &str = "SELECT id, order_number, user_id, customer_name, customer_email, \
     status, subtotal, tax, total, notes, created_at, updated_at FROM orders";

/// First order number is `ORB-1001`
const ORDER_NUMBER_BASE: i64 = 1000;

/// Allocate the next order number.
///
/// Must be the first statement of the placement transaction: the counter
/// UPDATE takes SQLite's write lock, so concurrent placements serialize here
/// and a rolled-back order releases its number.
pub async fn next_order_number(conn: &mut SqliteConnection) -> RepoResult<String> {
    let value: i64 = sqlx::query_scalar(
        "UPDATE order_counter SET value = value + 1 WHERE id = 1 RETURNING value",
    )
    .fetch_one(&mut *conn)
    .await?;
    Ok(format_order_number(value))
}

pub fn format_order_number(counter: i64) -> String {
    format!("ORB-{}", ORDER_NUMBER_BASE + counter)
}

/// Insert an order and its lines
pub(crate) async fn insert(conn: &mut SqliteConnection, order: &Order) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO orders (id, order_number, user_id, customer_name, customer_email, status, \
         subtotal, tax, total, notes, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(order.id)
    .bind(&order.order_number)
    .bind(order.user_id)
    .bind(&order.customer_name)
    .bind(&order.customer_email)
    .bind(order.status)
    .bind(order.subtotal)
    .bind(order.tax)
    .bind(order.total)
    .bind(&order.notes)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(&mut *conn)
    .await?;

    for (line_no, item) in order.items.iter().enumerate() {
        sqlx::query(
            "INSERT INTO order_items (id, order_id, menu_item_id, name, size, quantity, price, line_no) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(item.id)
        .bind(order.id)
        .bind(item.menu_item_id)
        .bind(&item.name)
        .bind(&item.size)
        .bind(item.quantity)
        .bind(item.price)
        .bind(line_no as i64)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let mut conn = pool.acquire().await?;
    let order = sqlx::query_as::<_, Order>(&format!("{SELECT_ORDER} WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    with_items(&mut conn, order).await
}

/// Order tracking lookup
pub async fn find_by_number(pool: &SqlitePool, order_number: &str) -> RepoResult<Option<Order>> {
    let mut conn = pool.acquire().await?;
    let order = sqlx::query_as::<_, Order>(&format!("{SELECT_ORDER} WHERE order_number = ?"))
        .bind(order_number.trim().to_uppercase())
        .fetch_optional(&mut *conn)
        .await?;
    with_items(&mut conn, order).await
}

/// Newest first; `user_id` restricts to one customer's orders
pub async fn find_all(
    pool: &SqlitePool,
    filter: &OrderFilter,
    user_id: Option<i64>,
) -> RepoResult<Vec<Order>> {
    let mut conn = pool.acquire().await?;
    let orders = sqlx::query_as::<_, Order>(&format!(
        "{SELECT_ORDER} WHERE (?1 IS NULL OR status = ?1) AND (?2 IS NULL OR user_id = ?2) \
         ORDER BY created_at DESC, id DESC"
    ))
    .bind(filter.status)
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;

    let mut result = Vec::with_capacity(orders.len());
    for mut order in orders {
        order.items = load_items(&mut conn, order.id).await?;
        result.push(order);
    }
    Ok(result)
}

/// Move an order along its lifecycle
pub async fn update_status(pool: &SqlitePool, id: i64, next: OrderStatus) -> RepoResult<Order> {
    let mut tx = pool.begin().await?;
    let current: Option<OrderStatus> =
        sqlx::query_scalar("SELECT status FROM orders WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    let current = current.ok_or_else(|| order_not_found(id))?;

    if current != next {
        if !current.can_transition_to(next) {
            return Err(AppError::with_message(
                ErrorCode::InvalidStatusTransition,
                format!("Cannot move order from {current} to {next}"),
            )
            .with_detail("from", current.as_str())
            .with_detail("to", next.as_str())
            .into());
        }
        sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ?")
            .bind(next)
            .bind(now_millis())
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    find_by_id(pool, id).await?.ok_or_else(|| order_not_found(id))
}

async fn with_items(conn: &mut SqliteConnection, order: Option<Order>) -> RepoResult<Option<Order>> {
    match order {
        Some(mut order) => {
            order.items = load_items(conn, order.id).await?;
            Ok(Some(order))
        }
        None => Ok(None),
    }
}

async fn load_items(conn: &mut SqliteConnection, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT id, order_id, menu_item_id, name, size, quantity, price \
         FROM order_items WHERE order_id = ? ORDER BY line_no",
    )
    .bind(order_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(items)
}

pub(crate) fn order_not_found(id: impl std::fmt::Display) -> RepoError {
    AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found")).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_order_number() {
        assert_eq!(format_order_number(1), "ORB-1001");
        assert_eq!(format_order_number(250), "ORB-1250");
    }
}
