//! Data models
//!
//! Shared between orbit-server and orbit-client (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes; timestamps are Unix millis.

pub mod category;
pub mod ingredient;
pub mod menu_item;
pub mod order;
pub mod settings;
pub mod size;
pub mod tag;
pub mod user;

// Re-exports
pub use category::*;
pub use ingredient::*;
pub use menu_item::*;
pub use order::*;
pub use settings::*;
pub use size::*;
pub use tag::*;
pub use user::*;
