//! Repository Layer - Core Traits
//!
//! Defines the abstract interface of the remote document store.
//! Implementations can use SQLite, in-memory, or a hosted realtime database.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::{DomainResult, Item, ItemFields, ItemId, OrderUpdate};

/// One push from a subscription: a full snapshot of the collection, or a stream fault
pub type SnapshotEvent = DomainResult<Vec<Item>>;

/// Realtime document store holding named collections of items
///
/// All operations are async to support various backends.
#[async_trait]
pub trait RemoteListStore: Send + Sync {
    /// Open a snapshot stream. The first event is the current state of the
    /// collection; one full snapshot follows every committed change.
    async fn subscribe(&self, collection: &str) -> DomainResult<Subscription>;

    /// Create a document and return its store-assigned id
    async fn create(&self, collection: &str, fields: ItemFields) -> DomainResult<ItemId>;

    /// Delete a document, `NotFound` if it does not exist
    async fn delete(&self, collection: &str, id: &ItemId) -> DomainResult<()>;

    /// Set `order` on every listed document in one all-or-nothing write
    async fn atomic_update(&self, collection: &str, updates: &[OrderUpdate]) -> DomainResult<()>;
}

/// Receiving end of a snapshot stream; dropping it detaches from the store
#[derive(Debug)]
pub struct Subscription {
    rx: mpsc::UnboundedReceiver<SnapshotEvent>,
}

impl Subscription {
    pub fn new(rx: mpsc::UnboundedReceiver<SnapshotEvent>) -> Self {
        Self { rx }
    }

    /// Wait for the next event; `None` once the store has gone away
    pub async fn next(&mut self) -> Option<SnapshotEvent> {
        self.rx.recv().await
    }

    /// Next event if one is already queued
    pub fn try_next(&mut self) -> Option<SnapshotEvent> {
        self.rx.try_recv().ok()
    }
}
