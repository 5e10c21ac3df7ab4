//! HTTP handlers for the pantry service.

pub mod health;
pub mod items;
pub mod recipes;

pub use health::{health_check, metrics_endpoint, not_found, readiness_check, root};
pub use items::{add_item, list_items};
pub use recipes::{generate_recipe, recipe_history};
