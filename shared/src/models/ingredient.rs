//! Ingredient Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Ingredient entity
///
/// Deleting an ingredient only clears `is_active`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Free-text, comma separated (e.g. "milk, soy")
    pub allergens: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Ingredient {
    /// Allergen list split on commas, trimmed, empty entries dropped
    pub fn allergen_list(&self) -> Vec<&str> {
        self.allergens
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Create ingredient payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IngredientCreate {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub allergens: Option<String>,
    pub is_active: Option<bool>,
}

/// Update ingredient payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IngredientUpdate {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub allergens: Option<String>,
    pub is_active: Option<bool>,
}
