//! Store Settings Model (singleton row)

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Default tax rate (percent) for a freshly created settings row
pub const DEFAULT_TAX_RATE: f64 = 8.0;

/// Global store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub pricing_enabled: bool,
    pub store_name: String,
    pub store_address: Option<String>,
    pub store_phone: Option<String>,
    /// Percent, 0-100
    pub tax_rate: f64,
    /// Minutes
    pub prep_time: i32,
    pub updated_at: i64,
}

/// Update settings payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub pricing_enabled: Option<bool>,
    #[validate(length(min = 1, max = 100, message = "Store name is required"))]
    pub store_name: Option<String>,
    #[validate(length(max = 200))]
    pub store_address: Option<String>,
    #[validate(length(max = 50))]
    pub store_phone: Option<String>,
    #[validate(range(min = 0.0, max = 100.0, message = "Tax rate must be between 0 and 100"))]
    pub tax_rate: Option<f64>,
    #[validate(range(min = 0, message = "Prep time cannot be negative"))]
    pub prep_time: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_bounds() {
        let update = SettingsUpdate {
            tax_rate: Some(101.0),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = SettingsUpdate {
            tax_rate: Some(0.0),
            prep_time: Some(5),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
    }
}
