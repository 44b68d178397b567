//! Ordered List Sync
//!
//! Keeps a sorted view of one remote collection. Every snapshot pushed by the
//! store replaces the view wholesale; nothing is patched incrementally and
//! the view is never written locally, not even after our own writes.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::domain::{DomainError, DomainResult, ItemId, OrderUpdate};
use crate::repository::{RemoteListStore, Subscription};
use crate::store::OrderedList;

type ViewSender = Arc<watch::Sender<Arc<OrderedList>>>;

struct ActiveSubscription {
    /// Cleared under lock on unsubscribe; snapshots are applied under the same lock
    live: Arc<Mutex<bool>>,
    task: JoinHandle<()>,
}

impl ActiveSubscription {
    /// False once the store closed the stream
    fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    fn stop(self) {
        *self.live.lock().unwrap_or_else(|e| e.into_inner()) = false;
        self.task.abort();
    }
}

#[derive(Default)]
struct SubscriptionSlot {
    /// Bumped by every unsubscribe; a subscribe that spans one is discarded
    epoch: u64,
    current: Option<ActiveSubscription>,
}

/// Sorted, snapshot-driven view of a remote collection
pub struct OrderedListSync<S: RemoteListStore> {
    store: Arc<S>,
    collection: String,
    view: ViewSender,
    active: Mutex<SubscriptionSlot>,
    /// Held for the duration of a renumbering write
    write_gate: tokio::sync::Mutex<()>,
}

impl<S: RemoteListStore + 'static> OrderedListSync<S> {
    pub fn new(store: Arc<S>, collection: impl Into<String>) -> Self {
        let (tx, _) = watch::channel(Arc::new(OrderedList::new()));
        Self {
            store,
            collection: collection.into(),
            view: Arc::new(tx),
            active: Mutex::new(SubscriptionSlot::default()),
            write_gate: tokio::sync::Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The view as of the last ingested snapshot
    pub fn view(&self) -> Arc<OrderedList> {
        self.view.borrow().clone()
    }

    /// Change notifications for the rendering layer, one per ingested snapshot
    pub fn watch(&self) -> watch::Receiver<Arc<OrderedList>> {
        self.view.subscribe()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, SubscriptionSlot> {
        self.active.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_subscribed(&self) -> bool {
        self.slot()
            .current
            .as_ref()
            .is_some_and(ActiveSubscription::is_running)
    }

    /// Open the snapshot stream and start ingesting. No-op if already subscribed.
    ///
    /// An `unsubscribe` issued while the stream is still being opened wins:
    /// the new stream is dropped and the view stays as it was.
    /// Must be called from within a tokio runtime.
    pub async fn subscribe(&self) -> DomainResult<()> {
        let epoch = {
            let slot = self.slot();
            if slot.current.as_ref().is_some_and(ActiveSubscription::is_running) {
                return Ok(());
            }
            slot.epoch
        };

        let subscription = self.store.subscribe(&self.collection).await?;

        let mut slot = self.slot();
        if slot.epoch != epoch {
            log::debug!("Discarding stream for '{}' opened across an unsubscribe", self.collection);
            return Ok(());
        }
        let live = Arc::new(Mutex::new(true));
        let task = tokio::spawn(pump(
            subscription,
            self.view.clone(),
            live.clone(),
            self.collection.clone(),
        ));
        let previous = slot.current.replace(ActiveSubscription { live, task });
        drop(slot);

        if let Some(previous) = previous {
            previous.stop();
        }
        log::info!("Subscribed to '{}'", self.collection);
        Ok(())
    }

    /// Stop ingesting. Safe to call any number of times; in-flight writes are not cancelled.
    pub fn unsubscribe(&self) {
        let active = {
            let mut slot = self.slot();
            slot.epoch += 1;
            slot.current.take()
        };
        if let Some(active) = active {
            active.stop();
            log::info!("Unsubscribed from '{}'", self.collection);
        }
    }

    /// Persist `sequence` as the new display order, `order = position + 1`.
    ///
    /// One atomic write; fails with `ReorderInFlight` while another
    /// renumbering for this list is still pending. The view only changes
    /// when the store pushes the resulting snapshot.
    pub async fn persist_order(&self, sequence: &[ItemId]) -> DomainResult<Vec<OrderUpdate>> {
        let _gate = self
            .write_gate
            .try_lock()
            .map_err(|_| DomainError::ReorderInFlight)?;

        let updates: Vec<OrderUpdate> = sequence
            .iter()
            .enumerate()
            .map(|(pos, id)| OrderUpdate::new(id.clone(), pos as i64 + 1))
            .collect();

        if let Err(e) = self.store.atomic_update(&self.collection, &updates).await {
            log::warn!("Renumbering of '{}' failed: {}", self.collection, e);
            return Err(e);
        }
        log::info!("Renumbered {} item(s) in '{}'", updates.len(), self.collection);
        Ok(updates)
    }
}

impl<S: RemoteListStore> Drop for OrderedListSync<S> {
    fn drop(&mut self) {
        let active = self.active.get_mut().unwrap_or_else(|e| e.into_inner()).current.take();
        if let Some(active) = active {
            active.stop();
        }
    }
}

/// Replace the view unless the subscription was stopped meanwhile
fn apply(live: &Mutex<bool>, view: &ViewSender, list: OrderedList) -> bool {
    let live = live.lock().unwrap_or_else(|e| e.into_inner());
    if !*live {
        return false;
    }
    view.send_replace(Arc::new(list));
    true
}

async fn pump(
    mut subscription: Subscription,
    view: ViewSender,
    live: Arc<Mutex<bool>>,
    collection: String,
) {
    while let Some(event) = subscription.next().await {
        match event {
            Ok(items) => {
                let count = items.len();
                if !apply(&live, &view, OrderedList::from_snapshot(items)) {
                    return;
                }
                log::debug!("Ingested snapshot of '{}' with {} item(s)", collection, count);
            }
            Err(e) => {
                // Keep the last good view
                log::warn!("Snapshot stream for '{}' failed: {}", collection, e);
            }
        }
    }
    log::info!("Snapshot stream for '{}' closed", collection);
}
