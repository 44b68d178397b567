//! Showcase Admin Backend
//!
//! Layered architecture:
//! - domain: Items, form input and errors
//! - repository: Remote store boundary (in-memory and SQLite implementations)
//! - store / sync: Sorted view of a collection, refreshed from store snapshots
//! - lifecycle / reorder: Create, delete and drag-reorder items
//! - contact: Contact form relay boundary

use std::sync::Arc;

pub mod config;
pub mod contact;
pub mod domain;
pub mod lifecycle;
pub mod reorder;
pub mod repository;
pub mod store;
pub mod sync;

pub use config::{AppConfig, MailServer, MailSettings};
pub use domain::{DomainError, DomainResult, Item, ItemId, NewItem, OrderUpdate};
pub use lifecycle::ItemLifecycleManager;
pub use reorder::DragReorderController;
pub use repository::{MemoryStore, RemoteListStore, SqliteStore};
pub use store::OrderedList;
pub use sync::OrderedListSync;

/// Application state for one showcase list
pub struct Showcase<S: RemoteListStore> {
    pub sync: Arc<OrderedListSync<S>>,
    pub items: ItemLifecycleManager<S>,
}

impl<S: RemoteListStore + 'static> Showcase<S> {
    pub fn new(store: Arc<S>, collection: impl Into<String>) -> Self {
        let sync = Arc::new(OrderedListSync::new(store, collection));
        Self {
            items: ItemLifecycleManager::new(sync.clone()),
            sync,
        }
    }

    /// A fresh drag controller over this list, owned by the caller
    pub fn reorder_controller(&self) -> DragReorderController<S> {
        DragReorderController::new(self.sync.clone())
    }
}

/// Install the rolling file logger described by `config`
pub fn init_logging(config: &AppConfig) -> DomainResult<()> {
    rolling_logger::init_logger_with(&config.log_dir, "Showcase", config.rolling())
        .map_err(DomainError::Config)
}

/// Open the SQLite store from `config` and start following its collection
pub async fn open(config: &AppConfig) -> DomainResult<Showcase<SqliteStore>> {
    let store = Arc::new(SqliteStore::open(&config.db_path)?);
    let showcase = Showcase::new(store, config.collection.clone());
    showcase.sync.subscribe().await?;
    let _ = rolling_logger::info(&format!("Showcase '{}' ready", config.collection));
    Ok(showcase)
}
