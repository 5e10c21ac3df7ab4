pub mod database;
pub mod error;
pub mod generator;
pub mod items;
pub mod metrics;
pub mod providers;
pub mod recipes;
pub mod stores;

pub use database::PantryDb;
pub use error::ServiceError;
pub use generator::{GeneratorError, RecipeGenerator};
pub use items::ItemService;
pub use metrics::{get_metrics, init_metrics};
pub use recipes::RecipeService;
pub use stores::{ItemStore, MemoryStore, RecipeStore, StoreError, StoreHealth};
