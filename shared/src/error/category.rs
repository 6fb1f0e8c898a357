//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Authentication errors
/// - 2xxx: Permission errors
/// - 3xxx: Catalog errors
/// - 4xxx: Order errors
/// - 5xxx: User errors
/// - 6xxx: Upload errors
/// - 7xxx: Chat errors
/// - 8xxx and above: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Permission errors (2xxx)
    Permission,
    /// Catalog errors (3xxx)
    Catalog,
    /// Order errors (4xxx)
    Order,
    /// User errors (5xxx)
    User,
    /// Upload errors (6xxx)
    Upload,
    /// Chat assistant errors (7xxx)
    Chat,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            3000..4000 => Self::Catalog,
            4000..5000 => Self::Order,
            5000..6000 => Self::User,
            6000..7000 => Self::Upload,
            7000..8000 => Self::Chat,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Catalog => "catalog",
            Self::Order => "order",
            Self::User => "user",
            Self::Upload => "upload",
            Self::Chat => "chat",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
