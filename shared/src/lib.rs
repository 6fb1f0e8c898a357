//! Shared types for the Orbit workspace
//!
//! Domain models, the unified error system, money helpers and small
//! utilities used by both orbit-server and orbit-client.

pub mod client;
pub mod error;
pub mod models;
pub mod money;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorBody, ErrorCategory, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
