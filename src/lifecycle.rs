//! Item Lifecycle
//!
//! Create and delete showcase items against the remote store.

use std::sync::Arc;

use crate::domain::{DomainError, DomainResult, ItemId, NewItem};
use crate::repository::RemoteListStore;
use crate::sync::OrderedListSync;

/// Creates and deletes items of the list a sync instance follows
pub struct ItemLifecycleManager<S: RemoteListStore> {
    sync: Arc<OrderedListSync<S>>,
}

impl<S: RemoteListStore + 'static> ItemLifecycleManager<S> {
    pub fn new(sync: Arc<OrderedListSync<S>>) -> Self {
        Self { sync }
    }

    /// Add an item after the current last one.
    ///
    /// The order key is read from the local view, so two editors adding at
    /// the same time can produce equal keys; the sort still yields a total order.
    pub async fn add_item(&self, input: NewItem) -> DomainResult<ItemId> {
        input.validate()?;

        let max = self.sync.view().max_order();
        let order = max.checked_add(1).ok_or_else(|| {
            DomainError::Validation(format!(
                "order {} leaves no room after it; renumber the list first",
                max
            ))
        })?;
        let collection = self.sync.collection();
        let id = self
            .sync
            .store()
            .create(collection, input.into_fields(order))
            .await?;
        log::info!("Created item {} in '{}' at order {}", id, collection, order);
        Ok(id)
    }

    /// Remove an item; the remaining orders are left as they are
    pub async fn delete_item(&self, id: &ItemId) -> DomainResult<()> {
        let collection = self.sync.collection();
        self.sync.store().delete(collection, id).await?;
        log::info!("Deleted item {} from '{}'", id, collection);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::domain::ItemFields;
    use crate::repository::MemoryStore;
    use crate::store::OrderedList;

    const PROJECTS: &str = "projects";

    async fn setup(entries: &[(&str, Option<i64>)]) -> (Arc<MemoryStore>, Arc<OrderedListSync<MemoryStore>>) {
        let store = Arc::new(MemoryStore::new());
        for (id, order) in entries {
            store.seed(
                PROJECTS,
                *id,
                ItemFields {
                    url: format!("https://{}.test", id),
                    title: None,
                    description: None,
                    order: *order,
                },
            );
        }
        let sync = Arc::new(OrderedListSync::new(store.clone(), PROJECTS));
        let mut rx = sync.watch();
        sync.subscribe().await.unwrap();
        let expected = entries.len();
        tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|v| v.len() == expected))
            .await
            .expect("timed out waiting for view")
            .expect("view channel closed");
        (store, sync)
    }

    fn order_of(store: &MemoryStore, id: &ItemId) -> Option<i64> {
        store
            .documents(PROJECTS)
            .into_iter()
            .find(|item| &item.id == id)
            .and_then(|item| item.order)
    }

    #[tokio::test]
    async fn test_add_to_empty_list_gets_order_one() {
        let (store, sync) = setup(&[]).await;
        let manager = ItemLifecycleManager::new(sync);

        let id = manager.add_item(NewItem::new("https://x.test", "X", "")).await.unwrap();
        assert_eq!(order_of(&store, &id), Some(1));

        let created = store.documents(PROJECTS).into_iter().next().unwrap();
        assert_eq!(created.url, "https://x.test");
        assert_eq!(created.title.as_deref(), Some("X"));
        assert_eq!(created.description, None);
    }

    #[tokio::test]
    async fn test_add_uses_max_order_plus_one() {
        let (store, sync) = setup(&[("a", Some(3)), ("b", Some(7)), ("c", Some(7))]).await;
        let manager = ItemLifecycleManager::new(sync);

        let id = manager.add_item(NewItem::new("https://n.test", "", "")).await.unwrap();
        assert_eq!(order_of(&store, &id), Some(8));
    }

    #[tokio::test]
    async fn test_add_counts_absent_order_as_zero() {
        let (store, sync) = setup(&[("a", None)]).await;
        let manager = ItemLifecycleManager::new(sync);

        let id = manager.add_item(NewItem::new("https://n.test", "", "")).await.unwrap();
        assert_eq!(order_of(&store, &id), Some(1));
    }

    #[tokio::test]
    async fn test_add_after_largest_order_rejected() {
        let (store, sync) = setup(&[("a", Some(1)), ("b", Some(i64::MAX))]).await;
        let manager = ItemLifecycleManager::new(sync.clone());

        let err = manager.add_item(NewItem::new("https://n.test", "", "")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(store.documents(PROJECTS).len(), 2);

        // Renumbering frees the key space again
        sync.persist_order(&[ItemId::from("a"), ItemId::from("b")]).await.unwrap();
        let mut rx = sync.watch();
        tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|v| v.max_order() == 2))
            .await
            .unwrap()
            .unwrap();
        let id = manager.add_item(NewItem::new("https://n.test", "", "")).await.unwrap();
        assert_eq!(order_of(&store, &id), Some(3));
    }

    #[tokio::test]
    async fn test_empty_url_rejected_before_store_call() {
        let (store, sync) = setup(&[]).await;
        store.fail_next_write(DomainError::StoreUnavailable("should not be reached".to_string()));
        let manager = ItemLifecycleManager::new(sync);

        let err = manager.add_item(NewItem::new("", "Title", "Desc")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        // The injected failure is still armed, so no write happened
        let err = manager.add_item(NewItem::new("https://x.test", "", "")).await.unwrap_err();
        assert!(matches!(err, DomainError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let (store, sync) = setup(&[("a", Some(1))]).await;
        store.fail_next_write(DomainError::StoreUnavailable("offline".to_string()));
        let manager = ItemLifecycleManager::new(sync.clone());

        let err = manager.add_item(NewItem::new("https://x.test", "", "")).await.unwrap_err();
        assert_eq!(err, DomainError::StoreUnavailable("offline".to_string()));
        assert_eq!(sync.view().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_keeps_remaining_orders() {
        let (store, sync) = setup(&[("a", Some(1)), ("b", Some(2))]).await;
        let mut rx = sync.watch();
        let manager = ItemLifecycleManager::new(sync.clone());

        manager.delete_item(&ItemId::from("a")).await.unwrap();

        let view = tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|v| v.len() == 1))
            .await
            .unwrap()
            .unwrap()
            .clone();
        let remaining: &OrderedList = &view;
        assert_eq!(remaining.items()[0].id, ItemId::from("b"));
        assert_eq!(remaining.items()[0].order, Some(2));
        assert_eq!(order_of(&store, &ItemId::from("b")), Some(2));
    }

    #[tokio::test]
    async fn test_delete_missing_reports_not_found() {
        let (_store, sync) = setup(&[("a", Some(1))]).await;
        let manager = ItemLifecycleManager::new(sync);

        let err = manager.delete_item(&ItemId::from("ghost")).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
