//! Unified error system for the Orbit workspace
//!
//! This module provides a comprehensive error handling system with:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ErrorBody`]: JSON body of every error response
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Catalog errors (categories, sizes, tags, ingredients, menu items)
//! - 4xxx: Order errors
//! - 5xxx: User errors
//! - 6xxx: Upload errors
//! - 7xxx: Chat assistant errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorBody, ErrorCode};
//!
//! let err = AppError::with_message(ErrorCode::SizeUnavailable, "Size 'XL' is not available")
//!     .with_detail("size", "XL");
//!
//! let body = ErrorBody::from(&err);
//! assert_eq!(body.code, 3403);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorBody};
