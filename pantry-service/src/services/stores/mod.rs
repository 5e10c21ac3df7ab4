//! Persistence seams for items and recipes.
//!
//! [`crate::services::PantryDb`] implements these traits against MongoDB;
//! [`MemoryStore`] keeps everything in process for tests.

pub mod memory;

use crate::models::{Item, Recipe};
use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryStore;

#[derive(Error, Debug)]
pub enum StoreError {
    /// A unique index rejected the write.
    #[error("Duplicate key: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),
}

#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Look up an item by name, ignoring case.
    async fn find_by_name(&self, name: &str) -> Result<Option<Item>, StoreError>;

    /// Insert a new item. Case-insensitive name collisions fail with
    /// [`StoreError::Duplicate`].
    async fn insert_item(&self, item: &Item) -> Result<(), StoreError>;

    /// All items ordered alphabetically by name.
    async fn list_items(&self) -> Result<Vec<Item>, StoreError>;
}

#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Insert a complete recipe in a single write.
    async fn insert_recipe(&self, recipe: &Recipe) -> Result<(), StoreError>;

    /// All recipes, most recently created first.
    async fn list_recipes(&self) -> Result<Vec<Recipe>, StoreError>;
}

/// Liveness probe for whatever backs the stores.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn health_check(&self) -> Result<(), StoreError>;
}
