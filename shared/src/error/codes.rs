//! Unified error codes for Orbit
//!
//! This module defines all error codes used by orbit-server and its clients.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Catalog errors (categories, sizes, tags, ingredients, menu items)
//! - 4xxx: Order errors
//! - 5xxx: User errors
//! - 6xxx: File upload errors
//! - 7xxx: Chat assistant errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Payload failed validation; field messages in `details.fields`
    ValidationFailed = 2,
    /// Resource without a dedicated not-found code
    NotFound = 3,
    /// Unique constraint hit without a dedicated code
    AlreadyExists = 4,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Admin role required
    AdminRequired = 2003,
    /// Users cannot delete their own account
    CannotDeleteSelf = 2005,

    // ==================== 3xxx: Catalog ====================
    CategoryNotFound = 3001,
    /// Category is still referenced by menu items
    CategoryHasItems = 3002,
    CategorySlugExists = 3003,
    SizeNotFound = 3101,
    SizeAbbreviationExists = 3102,
    TagNotFound = 3201,
    /// Tag is still referenced by menu items
    TagInUse = 3202,
    TagSlugExists = 3203,
    IngredientNotFound = 3301,
    IngredientNameExists = 3302,
    MenuItemNotFound = 3401,
    /// Menu item exists but is not available for ordering
    MenuItemUnavailable = 3402,
    /// Requested size is not offered for the menu item
    SizeUnavailable = 3403,

    // ==================== 4xxx: Order ====================
    OrderNotFound = 4001,
    OrderEmpty = 4007,
    /// Status change not allowed from the current status
    InvalidStatusTransition = 4008,

    // ==================== 5xxx: User ====================
    UserNotFound = 5001,
    UsernameExists = 5002,
    EmailExists = 5003,

    // ==================== 6xxx: File Upload ====================
    FileTooLarge = 6001,
    UnsupportedMediaType = 6002,
    NoFileProvided = 6003,
    EmptyFile = 6004,
    InvalidFilename = 6005,
    FileStorageFailed = 6006,

    // ==================== 7xxx: Chat ====================
    /// No upstream model is configured
    ChatNotConfigured = 7001,
    /// Upstream model call failed
    ChatUpstreamFailed = 7002,

    // ==================== 9xxx: System ====================
    InternalError = 9001,
    DatabaseError = 9002,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::AdminRequired => "Unauthorized",
            ErrorCode::CannotDeleteSelf => "Cannot delete your own account",

            // Catalog
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryHasItems => "Category has menu items",
            ErrorCode::CategorySlugExists => "Category slug already exists",
            ErrorCode::SizeNotFound => "Size not found",
            ErrorCode::SizeAbbreviationExists => "Size abbreviation already exists",
            ErrorCode::TagNotFound => "Tag not found",
            ErrorCode::TagInUse => "Tag is in use by menu items",
            ErrorCode::TagSlugExists => "Tag slug already exists",
            ErrorCode::IngredientNotFound => "Ingredient not found",
            ErrorCode::IngredientNameExists => "Ingredient name already exists",
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::MenuItemUnavailable => "Menu item is not available",
            ErrorCode::SizeUnavailable => "Size is not available for this item",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order is empty",
            ErrorCode::InvalidStatusTransition => "Invalid order status transition",

            // User
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::UsernameExists => "Username already exists",
            ErrorCode::EmailExists => "Email already exists",

            // File Upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedMediaType => "Unsupported file type",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::InvalidFilename => "Invalid filename",
            ErrorCode::FileStorageFailed => "File storage failed",

            // Chat
            ErrorCode::ChatNotConfigured => "Chat assistant is not configured",
            ErrorCode::ChatUpstreamFailed => "Chat assistant request failed",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2003 => Ok(ErrorCode::AdminRequired),
            2005 => Ok(ErrorCode::CannotDeleteSelf),

            // Catalog
            3001 => Ok(ErrorCode::CategoryNotFound),
            3002 => Ok(ErrorCode::CategoryHasItems),
            3003 => Ok(ErrorCode::CategorySlugExists),
            3101 => Ok(ErrorCode::SizeNotFound),
            3102 => Ok(ErrorCode::SizeAbbreviationExists),
            3201 => Ok(ErrorCode::TagNotFound),
            3202 => Ok(ErrorCode::TagInUse),
            3203 => Ok(ErrorCode::TagSlugExists),
            3301 => Ok(ErrorCode::IngredientNotFound),
            3302 => Ok(ErrorCode::IngredientNameExists),
            3401 => Ok(ErrorCode::MenuItemNotFound),
            3402 => Ok(ErrorCode::MenuItemUnavailable),
            3403 => Ok(ErrorCode::SizeUnavailable),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4007 => Ok(ErrorCode::OrderEmpty),
            4008 => Ok(ErrorCode::InvalidStatusTransition),

            // User
            5001 => Ok(ErrorCode::UserNotFound),
            5002 => Ok(ErrorCode::UsernameExists),
            5003 => Ok(ErrorCode::EmailExists),

            // File Upload
            6001 => Ok(ErrorCode::FileTooLarge),
            6002 => Ok(ErrorCode::UnsupportedMediaType),
            6003 => Ok(ErrorCode::NoFileProvided),
            6004 => Ok(ErrorCode::EmptyFile),
            6005 => Ok(ErrorCode::InvalidFilename),
            6006 => Ok(ErrorCode::FileStorageFailed),

            // Chat
            7001 => Ok(ErrorCode::ChatNotConfigured),
            7002 => Ok(ErrorCode::ChatUpstreamFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
