//! Menu domain logic shared by the REST API and the chat assistant

pub mod diff;

pub use diff::{ingredients_changed, recipe_steps_changed, sizes_changed, tags_changed};
