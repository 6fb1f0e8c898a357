//! Category Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Category entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    /// Optional emoji shown next to the name
    pub icon: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    /// Number of menu items referencing this category (computed)
    #[cfg_attr(feature = "db", sqlx(default))]
    #[serde(default)]
    pub menu_item_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCreate {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    /// Derived from the name when absent
    #[validate(length(min = 1, max = 100, message = "Slug must be 1-100 characters"))]
    pub slug: Option<String>,
    #[validate(length(max = 16, message = "Icon is too long"))]
    pub icon: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Update category payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Slug must be 1-100 characters"))]
    pub slug: Option<String>,
    #[validate(length(max = 16, message = "Icon is too long"))]
    pub icon: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}
