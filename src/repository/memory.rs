//! In-Memory Store
//!
//! Process-local `RemoteListStore` with the same snapshot semantics as a
//! hosted realtime database. Supports fault injection for tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{DomainError, DomainResult, Item, ItemFields, ItemId, OrderUpdate};
use super::subscribers::Subscribers;
use super::traits::{RemoteListStore, Subscription};

type Collection = BTreeMap<ItemId, ItemFields>;

#[derive(Default)]
struct MemoryInner {
    collections: HashMap<String, Collection>,
    fail_next_write: Option<DomainError>,
}

impl MemoryInner {
    fn snapshot(&self, collection: &str) -> Vec<Item> {
        self.collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| Item::from_fields(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn take_failure(&mut self) -> DomainResult<()> {
        match self.fail_next_write.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// In-memory document store
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
    subscribers: Subscribers,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert or replace a document under a chosen id
    pub fn seed(&self, collection: &str, id: impl Into<ItemId>, fields: ItemFields) {
        let mut inner = self.lock();
        inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.into(), fields);
        self.subscribers.publish(collection, Ok(inner.snapshot(collection)));
    }

    /// Make the next write operation fail with `err` without touching any document
    pub fn fail_next_write(&self, err: DomainError) {
        self.lock().fail_next_write = Some(err);
    }

    /// Push a stream fault to the collection's subscribers
    pub fn push_error(&self, collection: &str, err: DomainError) {
        let _inner = self.lock();
        self.subscribers.publish(collection, Err(err));
    }

    /// Current documents, in no particular order
    pub fn documents(&self, collection: &str) -> Vec<Item> {
        self.lock().snapshot(collection)
    }

    pub fn subscriber_count(&self, collection: &str) -> usize {
        self.subscribers.count(collection)
    }

    /// Drop every open stream of `collection`, as a hosted store does on disconnect
    pub fn close_streams(&self, collection: &str) {
        let _inner = self.lock();
        self.subscribers.close(collection);
    }
}

#[async_trait]
impl RemoteListStore for MemoryStore {
    async fn subscribe(&self, collection: &str) -> DomainResult<Subscription> {
        let inner = self.lock();
        Ok(self.subscribers.attach(collection, Ok(inner.snapshot(collection))))
    }

    async fn create(&self, collection: &str, fields: ItemFields) -> DomainResult<ItemId> {
        let mut inner = self.lock();
        inner.take_failure()?;

        let id = ItemId::new(uuid::Uuid::new_v4().to_string());
        inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields);
        self.subscribers.publish(collection, Ok(inner.snapshot(collection)));
        Ok(id)
    }

    async fn delete(&self, collection: &str, id: &ItemId) -> DomainResult<()> {
        let mut inner = self.lock();
        inner.take_failure()?;

        let removed = inner
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(id));
        if removed.is_none() {
            return Err(DomainError::NotFound(format!("Item {} not found", id)));
        }
        self.subscribers.publish(collection, Ok(inner.snapshot(collection)));
        Ok(())
    }

    async fn atomic_update(&self, collection: &str, updates: &[OrderUpdate]) -> DomainResult<()> {
        let mut inner = self.lock();
        inner.take_failure()?;

        let docs = inner.collections.entry(collection.to_string()).or_default();
        // Check every target before applying anything
        if let Some(missing) = updates.iter().find(|u| !docs.contains_key(&u.id)) {
            return Err(DomainError::NotFound(format!("Item {} not found", missing.id)));
        }
        for update in updates {
            if let Some(fields) = docs.get_mut(&update.id) {
                fields.order = Some(update.order);
            }
        }
        self.subscribers.publish(collection, Ok(inner.snapshot(collection)));
        Ok(())
    }
}
