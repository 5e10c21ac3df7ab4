use super::{ItemStore, RecipeStore, StoreError, StoreHealth};
use crate::models::{Item, Recipe};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

/// In-process store with the same ordering and uniqueness rules as the
/// MongoDB collections.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    items: Vec<Item>,
    recipes: Vec<Recipe>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn item_count(&self) -> usize {
        self.lock().items.len()
    }

    pub fn recipe_count(&self) -> usize {
        self.lock().recipes.len()
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<Item>, StoreError> {
        Ok(self
            .lock()
            .items
            .iter()
            .find(|item| same_name(&item.name, name))
            .cloned())
    }

    async fn insert_item(&self, item: &Item) -> Result<(), StoreError> {
        let mut inner = self.lock();
        if inner.items.iter().any(|existing| same_name(&existing.name, &item.name)) {
            return Err(StoreError::Duplicate(format!("name: {}", item.name)));
        }
        inner.items.push(item.clone());
        Ok(())
    }

    async fn list_items(&self) -> Result<Vec<Item>, StoreError> {
        let mut items = self.lock().items.clone();
        items.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(items)
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn insert_recipe(&self, recipe: &Recipe) -> Result<(), StoreError> {
        self.lock().recipes.push(recipe.clone());
        Ok(())
    }

    async fn list_recipes(&self) -> Result<Vec<Recipe>, StoreError> {
        // Newest insert wins ties on equal timestamps.
        let mut recipes: Vec<Recipe> = self.lock().recipes.iter().rev().cloned().collect();
        recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(recipes)
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn insert_rejects_case_variants() {
        let store = MemoryStore::new();
        store.insert_item(&Item::new("Egg")).await.unwrap();

        let err = store.insert_item(&Item::new("EGG")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(store.item_count(), 1);
    }

    #[tokio::test]
    async fn find_by_name_ignores_case() {
        let store = MemoryStore::new();
        store.insert_item(&Item::new("Garlic")).await.unwrap();

        let found = store.find_by_name("gARLIC").await.unwrap();
        assert_eq!(found.map(|i| i.name), Some("Garlic".to_string()));
        assert!(store.find_by_name("Onion").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn recipes_are_listed_newest_first() {
        let store = MemoryStore::new();
        let base = Utc::now();
        for (offset, title) in [(1, "first"), (3, "third"), (2, "second")] {
            let recipe = Recipe {
                id: title.to_string(),
                ingredients: vec!["Rice".to_string()],
                title: title.to_string(),
                instructions: vec!["Cook.".to_string()],
                created_at: base + Duration::seconds(offset),
                updated_at: base + Duration::seconds(offset),
            };
            store.insert_recipe(&recipe).await.unwrap();
        }

        let titles: Vec<String> = store
            .list_recipes()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
    }
}
