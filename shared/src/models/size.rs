//! Size Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Size entity (portion option with a price modifier)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Size {
    pub id: i64,
    pub name: String,
    pub abbreviation: String,
    /// Added on top of the menu item's base price
    pub price_modifier: f64,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Size {
    /// Whether `label` names this size (by name or abbreviation, case-insensitive)
    pub fn matches(&self, label: &str) -> bool {
        let label = label.trim();
        self.name.eq_ignore_ascii_case(label) || self.abbreviation.eq_ignore_ascii_case(label)
    }
}

/// Create size payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SizeCreate {
    #[validate(length(min = 1, max = 50, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 4, message = "Abbreviation must be 1-4 characters"))]
    pub abbreviation: String,
    #[validate(range(min = 0.0, message = "Price modifier cannot be negative"))]
    pub price_modifier: Option<f64>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Update size payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SizeUpdate {
    #[validate(length(min = 1, max = 50, message = "Name is required"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 4, message = "Abbreviation must be 1-4 characters"))]
    pub abbreviation: Option<String>,
    #[validate(range(min = 0.0, message = "Price modifier cannot be negative"))]
    pub price_modifier: Option<f64>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(name: &str, abbreviation: &str) -> Size {
        Size {
            id: 1,
            name: name.to_string(),
            abbreviation: abbreviation.to_string(),
            price_modifier: 0.5,
            is_active: true,
            sort_order: 0,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_matches_name_or_abbreviation() {
        let s = size("Large", "L");
        assert!(s.matches("Large"));
        assert!(s.matches("large"));
        assert!(s.matches(" L "));
        assert!(!s.matches("Medium"));
    }

    #[test]
    fn test_abbreviation_length() {
        let payload = SizeCreate {
            name: "Extra Large".into(),
            abbreviation: "XXXXL".into(),
            price_modifier: Some(1.0),
            is_active: None,
            sort_order: None,
        };
        assert!(payload.validate().is_err());

        let payload = SizeCreate {
            abbreviation: "XL".into(),
            price_modifier: Some(-1.0),
            ..payload
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("price_modifier"));
    }
}
