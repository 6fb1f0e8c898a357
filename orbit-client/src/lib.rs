//! Orbit Client - HTTP client and storefront state for Orbit Coffee
//!
//! - [`HttpClient`]: typed calls to the orbit-server REST API
//! - [`CartStore`]: cart lines with persisted state and derived totals
//! - [`SettingsStore`]: cached store settings, gated by a hydrated flag
//! - [`GuestSession`]: one-time guest sign-in for anonymous visitors

pub mod cart;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod settings;
pub mod storage;

pub use cart::{CartItem, CartStore};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use session::{GuestLogin, GuestSession};
pub use settings::{SettingsSnapshot, SettingsSource, SettingsStore};
pub use storage::{FileStorage, MemoryStorage, Storage};

// Re-export shared types for convenience
pub use shared::client::{LoginResponse, UserInfo};
