//! Order placement and lifecycle

pub mod placement;

pub use placement::{PricedItem, place_order, price_item};
