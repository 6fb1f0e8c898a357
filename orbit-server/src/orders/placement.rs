//! Order placement
//!
//! Every line is re-priced from canonical data (`base_price` plus the
//! linked size's `price_modifier`); client prices are only hints. Tax comes
//! from Settings. Counter, order and lines are written in one transaction.

use rust_decimal::Decimal;
use shared::models::{MenuItem, Order, OrderCreate, OrderItem, OrderStatus, Size};
use shared::money::{PricedLine, compute_totals, to_decimal, to_f64};
use shared::util::{now_millis, snowflake_id};
use shared::{AppError, ErrorCode};
use sqlx::SqlitePool;

use crate::db::repository::menu_item::{self, menu_item_not_found};
use crate::db::repository::{RepoResult, order, settings};

/// Canonical price of one order line
#[derive(Debug, Clone, PartialEq)]
pub struct PricedItem {
    pub unit_price: f64,
    /// Canonical size name, when a size was requested
    pub size: Option<String>,
}

/// Resolve the unit price of `item` in the requested size.
///
/// The size is matched by name or abbreviation among the item's linked,
/// active sizes. No size means the base price.
pub fn price_item(
    item: &MenuItem,
    sizes: &[Size],
    requested_size: Option<&str>,
) -> Result<PricedItem, AppError> {
    if !item.is_active {
        return Err(AppError::with_message(
            ErrorCode::MenuItemUnavailable,
            format!("'{}' is not available", item.name),
        )
        .with_detail("menuItemId", item.id));
    }

    let base = to_decimal(item.base_price);
    match requested_size.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(PricedItem {
            unit_price: to_f64(base),
            size: None,
        }),
        Some(label) => {
            let size = sizes
                .iter()
                .find(|s| s.is_active && s.matches(label))
                .ok_or_else(|| {
                    AppError::with_message(
                        ErrorCode::SizeUnavailable,
                        format!("Size '{label}' is not available for '{}'", item.name),
                    )
                    .with_detail("menuItemId", item.id)
                    .with_detail("size", label)
                })?;
            let unit: Decimal = base + to_decimal(size.price_modifier);
            Ok(PricedItem {
                unit_price: to_f64(unit),
                size: Some(size.name.clone()),
            })
        }
    }
}

/// Place an order (guest checkout when `user_id` is `None`)
pub async fn place_order(
    pool: &SqlitePool,
    user_id: Option<i64>,
    data: OrderCreate,
) -> RepoResult<Order> {
    if data.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty).into());
    }

    let mut tx = pool.begin().await?;

    // Counter first: takes the write lock before anything is read
    let order_number = order::next_order_number(&mut tx).await?;
    let store = settings::get_or_create_conn(&mut tx).await?;

    let order_id = snowflake_id();
    let mut items = Vec::with_capacity(data.items.len());
    let mut lines = Vec::with_capacity(data.items.len());

    for input in &data.items {
        let item = menu_item::find_row(&mut tx, input.menu_item_id)
            .await?
            .ok_or_else(|| menu_item_not_found(input.menu_item_id))?;
        if !menu_item::category_is_active(&mut tx, item.category_id).await? {
            return Err(AppError::with_message(
                ErrorCode::MenuItemUnavailable,
                format!("'{}' is not available", item.name),
            )
            .with_detail("menuItemId", item.id)
            .into());
        }
        let sizes = menu_item::find_sizes(&mut tx, item.id).await?;
        let priced = price_item(&item, &sizes, input.size.as_deref())?;

        if let Some(hint) = input.price
            && to_decimal(hint) != to_decimal(priced.unit_price)
        {
            tracing::debug!(
                menu_item_id = item.id,
                client_price = hint,
                server_price = priced.unit_price,
                "Client price differs from canonical price, using canonical"
            );
        }

        lines.push(PricedLine::new(priced.unit_price, input.quantity));
        items.push(OrderItem {
            id: snowflake_id(),
            order_id,
            menu_item_id: Some(item.id),
            name: item.name,
            size: priced.size,
            quantity: input.quantity,
            price: priced.unit_price,
        });
    }

    let totals = compute_totals(&lines, store.tax_rate);
    let now = now_millis();
    let order = Order {
        id: order_id,
        order_number,
        user_id,
        customer_name: data.customer_name.trim().to_string(),
        customer_email: data
            .customer_email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty()),
        status: OrderStatus::Pending,
        subtotal: totals.subtotal,
        tax: totals.tax,
        total: totals.total,
        notes: data
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        created_at: now,
        updated_at: now,
        items,
    };

    order::insert(&mut tx, &order).await?;
    tx.commit().await?;

    tracing::info!(
        order_number = %order.order_number,
        total = order.total,
        lines = order.items.len(),
        "Order placed"
    );
    Ok(order)
}
