//! Order Model

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Order lifecycle status
///
/// `PENDING -> PREPARING -> READY -> COMPLETED`, and any non-terminal
/// status may move to `CANCELLED`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Whether a transition from `self` to `next` is allowed
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (from, Cancelled) => !from.is_terminal(),
            (Pending, Preparing) | (Preparing, Ready) | (Ready, Completed) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::Ready => "READY",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order line (name and unit price are snapshots taken at order time)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    /// `None` once the menu item has been deleted
    pub menu_item_id: Option<i64>,
    pub name: String,
    pub size: Option<String>,
    pub quantity: i32,
    /// Unit price snapshot
    pub price: f64,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    /// `ORB-<n>`
    pub order_number: String,
    /// `None` for guest checkout
    pub user_id: Option<i64>,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub status: OrderStatus,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,

    // -- Relations (populated by application code, skipped by FromRow) --
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// Public tracking view of an order (no customer or account data)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTracking {
    pub order_number: String,
    pub status: OrderStatus,
    pub items: Vec<TrackedLine>,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedLine {
    pub name: String,
    pub size: Option<String>,
    pub quantity: i32,
    pub price: f64,
}

impl From<Order> for OrderTracking {
    fn from(order: Order) -> Self {
        Self {
            order_number: order.order_number,
            status: order.status,
            items: order
                .items
                .into_iter()
                .map(|line| TrackedLine {
                    name: line.name,
                    size: line.size,
                    quantity: line.quantity,
                    price: line.price,
                })
                .collect(),
            subtotal: order.subtotal,
            tax: order.tax,
            total: order.total,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

/// Largest quantity a single order line accepts
pub const MAX_LINE_QUANTITY: i32 = 99;

/// Order line payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub menu_item_id: i64,
    #[validate(range(min = 1, max = 99, message = "Quantity must be between 1 and 99"))]
    pub quantity: i32,
    /// Size name or abbreviation
    pub size: Option<String>,
    /// Client-side unit price; only a hint, the server re-prices
    #[validate(range(exclusive_min = 0.0, message = "Price must be positive"))]
    pub price: Option<f64>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    #[validate(length(min = 1, message = "Order must contain at least one item"), nested)]
    pub items: Vec<OrderItemInput>,
    #[validate(
        length(min = 1, max = 100, message = "Customer name is required"),
        custom(function = "not_blank")
    )]
    pub customer_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub customer_email: Option<String>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("Customer name is required".into()));
    }
    Ok(())
}

/// Update order status payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

/// Order list filter (`GET /api/orders`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
}
