//! MongoDB persistence for the pantry service.
//!
//! Two independent collections: `items` (unique, case-insensitive names) and
//! `recipes` (append-only generation history).

use crate::models::{Item, Recipe};
use crate::services::metrics;
use crate::services::stores::{ItemStore, RecipeStore, StoreError, StoreHealth};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::{Collation, CollationStrength, FindOneOptions, FindOptions, IndexOptions},
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;
use std::time::Instant;

const ITEMS: &str = "items";
const RECIPES: &str = "recipes";

/// Server error code for unique index violations.
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Case-insensitive comparison shared by the name index, lookups and sorting.
fn name_collation() -> Collation {
    Collation::builder()
        .locale("en")
        .strength(CollationStrength::Secondary)
        .build()
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

fn db_error(operation: &str, collection: &str, err: mongodb::error::Error) -> StoreError {
    tracing::error!(operation, collection, "MongoDB operation failed: {}", err);
    metrics::record_db_error(operation, collection);
    StoreError::Database(err.to_string())
}

#[derive(Clone)]
pub struct PantryDb {
    client: MongoClient,
    db: Database,
}

impl PantryDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!("Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for pantry-service");

        let name_index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(
                IndexOptions::builder()
                    .name("name_unique_ci_idx".to_string())
                    .unique(true)
                    .collation(name_collation())
                    .build(),
            )
            .build();

        self.items()
            .create_index(name_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create name index: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_idx".to_string())
                    .build(),
            )
            .build();

        self.recipes()
            .create_index(created_at_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create created_at index: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        tracing::info!("Successfully created all MongoDB indexes");
        Ok(())
    }

    // Collection accessors

    pub fn items(&self) -> Collection<Item> {
        self.db.collection(ITEMS)
    }

    pub fn recipes(&self) -> Collection<Recipe> {
        self.db.collection(RECIPES)
    }
}

#[async_trait]
impl StoreHealth for PantryDb {
    async fn health_check(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                StoreError::Database(e.to_string())
            })?;
        Ok(())
    }
}

#[async_trait]
impl ItemStore for PantryDb {
    async fn find_by_name(&self, name: &str) -> Result<Option<Item>, StoreError> {
        let start = Instant::now();
        let options = FindOneOptions::builder().collation(name_collation()).build();

        let found = self
            .items()
            .find_one(doc! { "name": name }, options)
            .await
            .map_err(|e| db_error("find_one", ITEMS, e))?;

        metrics::record_db_operation("find_one", ITEMS, start.elapsed().as_secs_f64());
        Ok(found)
    }

    async fn insert_item(&self, item: &Item) -> Result<(), StoreError> {
        let start = Instant::now();

        match self.items().insert_one(item, None).await {
            Ok(_) => {}
            Err(e) if is_duplicate_key(&e) => {
                tracing::warn!(item = %item.name, "Unique index rejected item insert");
                return Err(StoreError::Duplicate(format!("name: {}", item.name)));
            }
            Err(e) => return Err(db_error("insert_one", ITEMS, e)),
        }

        metrics::record_db_operation("insert_one", ITEMS, start.elapsed().as_secs_f64());
        Ok(())
    }

    async fn list_items(&self) -> Result<Vec<Item>, StoreError> {
        let start = Instant::now();
        let options = FindOptions::builder()
            .sort(doc! { "name": 1 })
            .collation(name_collation())
            .build();

        let cursor = self
            .items()
            .find(None, options)
            .await
            .map_err(|e| db_error("find", ITEMS, e))?;

        let items: Vec<Item> = cursor
            .try_collect()
            .await
            .map_err(|e| db_error("find", ITEMS, e))?;

        metrics::record_db_operation("find", ITEMS, start.elapsed().as_secs_f64());
        Ok(items)
    }
}

#[async_trait]
impl RecipeStore for PantryDb {
    async fn insert_recipe(&self, recipe: &Recipe) -> Result<(), StoreError> {
        let start = Instant::now();

        self.recipes()
            .insert_one(recipe, None)
            .await
            .map_err(|e| db_error("insert_one", RECIPES, e))?;

        metrics::record_db_operation("insert_one", RECIPES, start.elapsed().as_secs_f64());
        Ok(())
    }

    async fn list_recipes(&self) -> Result<Vec<Recipe>, StoreError> {
        let start = Instant::now();
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();

        let cursor = self
            .recipes()
            .find(None, options)
            .await
            .map_err(|e| db_error("find", RECIPES, e))?;

        let recipes: Vec<Recipe> = cursor
            .try_collect()
            .await
            .map_err(|e| db_error("find", RECIPES, e))?;

        metrics::record_db_operation("find", RECIPES, start.elapsed().as_secs_f64());
        Ok(recipes)
    }
}
