use crate::models::Item;
use crate::services::error::ServiceError;
use crate::services::stores::{ItemStore, StoreError};
use std::sync::Arc;

#[derive(Clone)]
pub struct ItemService {
    store: Arc<dyn ItemStore>,
}

impl ItemService {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }

    /// Add a pantry item. Names are trimmed and must be unique ignoring case.
    pub async fn add(&self, name: &str) -> Result<Item, ServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::InvalidInput(
                "Item name is required and must be a non-empty string.".to_string(),
            ));
        }

        // The unique index is authoritative; this only avoids a doomed write.
        if self.store.find_by_name(name).await?.is_some() {
            return Err(duplicate(name));
        }

        let item = Item::new(name);
        match self.store.insert_item(&item).await {
            Ok(()) => {}
            Err(StoreError::Duplicate(_)) => {
                tracing::info!(item = %name, "Concurrent insert won the race for item name");
                return Err(duplicate(name));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(item_id = %item.id, item = %item.name, "Item added");
        Ok(item)
    }

    /// All items, alphabetical by name.
    pub async fn list(&self) -> Result<Vec<Item>, ServiceError> {
        Ok(self.store.list_items().await?)
    }
}

fn duplicate(name: &str) -> ServiceError {
    ServiceError::DuplicateItem(format!("Item '{}' already exists.", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::stores::MemoryStore;
    use async_trait::async_trait;

    fn service() -> (ItemService, MemoryStore) {
        let store = MemoryStore::new();
        (ItemService::new(Arc::new(store.clone())), store)
    }

    #[tokio::test]
    async fn add_trims_and_stores() {
        let (service, store) = service();
        let item = service.add("  Tomato \n").await.unwrap();
        assert_eq!(item.name, "Tomato");
        assert_eq!(store.item_count(), 1);
    }

    #[tokio::test]
    async fn case_variant_is_duplicate() {
        let (service, store) = service();
        service.add("Egg").await.unwrap();

        let err = service.add("egg").await.unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateItem(ref m) if m == "Item 'egg' already exists."));
        assert_eq!(store.item_count(), 1);
    }

    #[tokio::test]
    async fn blank_names_are_invalid() {
        let (service, store) = service();
        for name in ["", "   ", "\t\n"] {
            let err = service.add(name).await.unwrap_err();
            assert!(matches!(err, ServiceError::InvalidInput(_)));
        }
        assert_eq!(store.item_count(), 0);
    }

    #[tokio::test]
    async fn list_is_alphabetical() {
        let (service, _) = service();
        for name in ["Rice", "Egg", "Milk"] {
            service.add(name).await.unwrap();
        }

        let names: Vec<String> = service
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Egg", "Milk", "Rice"]);
    }

    /// Store whose lookup never sees the competing writer.
    struct RacingStore;

    #[async_trait]
    impl ItemStore for RacingStore {
        async fn find_by_name(&self, _name: &str) -> Result<Option<Item>, StoreError> {
            Ok(None)
        }

        async fn insert_item(&self, item: &Item) -> Result<(), StoreError> {
            Err(StoreError::Duplicate(format!("name: {}", item.name)))
        }

        async fn list_items(&self) -> Result<Vec<Item>, StoreError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn write_time_violation_is_duplicate() {
        let service = ItemService::new(Arc::new(RacingStore));
        let err = service.add("Butter").await.unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateItem(_)));
    }

    #[tokio::test]
    async fn concurrent_adds_store_one_item() {
        let (service, store) = service();
        let (a, b) = tokio::join!(service.add("Onion"), service.add("ONION"));

        assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
        assert_eq!(store.item_count(), 1);
    }
}
