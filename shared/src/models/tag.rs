//! Tag Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Tag entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub slug: String,
    /// Number of menu items carrying this tag (computed)
    #[cfg_attr(feature = "db", sqlx(default))]
    #[serde(default)]
    pub menu_item_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create tag payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TagCreate {
    #[validate(length(min = 1, max = 50, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 50, message = "Slug must be 1-50 characters"))]
    pub slug: Option<String>,
}

/// Update tag payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TagUpdate {
    #[validate(length(min = 1, max = 50, message = "Name is required"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Slug must be 1-50 characters"))]
    pub slug: Option<String>,
}
