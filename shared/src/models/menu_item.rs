//! Menu Item Model

use super::{Category, Size, Tag};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Menu item entity (row only, no relations)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub base_price: f64,
    pub category_id: i64,
    /// Served path (`/api/uploads/menu/<file>`)
    pub image_path: Option<String>,
    pub is_active: bool,
    pub is_featured: bool,
    pub sort_order: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Ingredient attached to a menu item, with per-link attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct MenuItemIngredient {
    pub ingredient_id: i64,
    pub name: String,
    pub allergens: Option<String>,
    /// Free-text amount (e.g. "18g", "2 pumps")
    pub quantity: Option<String>,
    pub is_optional: bool,
    pub sort_order: i32,
    /// When this link row was written
    pub created_at: i64,
}

/// Recipe step
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct RecipeStep {
    pub id: i64,
    pub menu_item_id: i64,
    pub step_number: i32,
    pub instruction: String,
    /// Seconds
    pub duration: Option<i32>,
    pub temperature: Option<String>,
}

/// Menu item with all relations loaded
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemDetail {
    #[serde(flatten)]
    pub item: MenuItem,
    pub category: Option<Category>,
    pub sizes: Vec<Size>,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<MenuItemIngredient>,
    pub recipe_steps: Vec<RecipeStep>,
}

/// Ingredient link payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IngredientLinkInput {
    pub ingredient_id: i64,
    #[validate(length(max = 50))]
    pub quantity: Option<String>,
    #[serde(default)]
    pub is_optional: bool,
    #[serde(default)]
    pub sort_order: i32,
}

/// Recipe step payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecipeStepInput {
    #[validate(range(min = 1, message = "Step number must be positive"))]
    pub step_number: i32,
    #[validate(length(min = 1, max = 1000, message = "Instruction is required"))]
    pub instruction: String,
    #[validate(range(min = 0))]
    pub duration: Option<i32>,
    #[validate(length(max = 50))]
    pub temperature: Option<String>,
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemCreate {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "Base price must be greater than 0"))]
    pub base_price: f64,
    pub category_id: i64,
    pub image_path: Option<String>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub size_ids: Vec<i64>,
    #[serde(default)]
    pub tag_ids: Vec<i64>,
    #[validate(nested)]
    #[serde(default)]
    pub ingredients: Vec<IngredientLinkInput>,
    #[validate(nested)]
    #[serde(default)]
    pub recipe_steps: Vec<RecipeStepInput>,
}

/// Update menu item payload
///
/// Absent scalar fields keep their stored value. A relation is only
/// touched when it is present and differs from what is persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemUpdate {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "Base price must be greater than 0"))]
    pub base_price: Option<f64>,
    pub category_id: Option<i64>,
    pub image_path: Option<String>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub sort_order: Option<i32>,
    pub size_ids: Option<Vec<i64>>,
    pub tag_ids: Option<Vec<i64>>,
    #[validate(nested)]
    pub ingredients: Option<Vec<IngredientLinkInput>>,
    #[validate(nested)]
    pub recipe_steps: Option<Vec<RecipeStepInput>>,
}

/// Which relations a menu item update rewrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationChanges {
    pub sizes: bool,
    pub tags: bool,
    pub ingredients: bool,
    pub recipe_steps: bool,
}

impl RelationChanges {
    pub fn any(&self) -> bool {
        self.sizes || self.tags || self.ingredients || self.recipe_steps
    }
}

/// Menu item list filter (`GET /api/menu-items`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemFilter {
    /// Category slug
    pub category: Option<String>,
    pub featured: Option<bool>,
    #[serde(default)]
    pub include_inactive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_rejects_non_positive_price() {
        let payload: MenuItemCreate = serde_json::from_value(serde_json::json!({
            "name": "Latte",
            "basePrice": 0.0,
            "categoryId": 1
        }))
        .unwrap();
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("base_price"));
    }

    #[test]
    fn test_update_defaults_leave_relations_untouched() {
        let update: MenuItemUpdate =
            serde_json::from_value(serde_json::json!({ "name": "Flat White" })).unwrap();
        assert_eq!(update.name.as_deref(), Some("Flat White"));
        assert!(update.size_ids.is_none());
        assert!(update.ingredients.is_none());
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_detail_flattens_item_fields() {
        let detail = MenuItemDetail {
            item: MenuItem {
                id: 7,
                name: "Mocha".into(),
                description: None,
                base_price: 4.5,
                category_id: 1,
                image_path: None,
                is_active: true,
                is_featured: false,
                sort_order: 0,
                created_at: 0,
                updated_at: 0,
            },
            category: None,
            sizes: vec![],
            tags: vec![],
            ingredients: vec![],
            recipe_steps: vec![],
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["basePrice"], 4.5);
        assert!(json["recipeSteps"].as_array().unwrap().is_empty());
    }
}
