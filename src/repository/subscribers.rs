//! Snapshot fan-out shared by the store implementations

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::mpsc;

use super::traits::{SnapshotEvent, Subscription};

/// Open subscriptions grouped by collection
#[derive(Default)]
pub struct Subscribers {
    by_collection: Mutex<HashMap<String, Vec<mpsc::UnboundedSender<SnapshotEvent>>>>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber and queue its initial snapshot
    pub fn attach(&self, collection: &str, initial: SnapshotEvent) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tx.send(initial);
        let mut map = self.by_collection.lock().unwrap_or_else(|e| e.into_inner());
        map.entry(collection.to_string()).or_default().push(tx);
        Subscription::new(rx)
    }

    /// Push an event to every live subscriber, pruning detached ones
    pub fn publish(&self, collection: &str, event: SnapshotEvent) {
        let mut map = self.by_collection.lock().unwrap_or_else(|e| e.into_inner());
        let Some(senders) = map.get_mut(collection) else {
            return;
        };
        senders.retain(|tx| tx.send(event.clone()).is_ok());
        log::debug!("Published to {} subscriber(s) of '{}'", senders.len(), collection);
        if senders.is_empty() {
            map.remove(collection);
        }
    }

    /// End every stream of `collection`; receivers see the end after draining
    pub fn close(&self, collection: &str) {
        let mut map = self.by_collection.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(senders) = map.remove(collection) {
            log::info!("Closed {} stream(s) of '{}'", senders.len(), collection);
        }
    }

    pub fn count(&self, collection: &str) -> usize {
        let map = self.by_collection.lock().unwrap_or_else(|e| e.into_inner());
        map.get(collection).map_or(0, |senders| senders.iter().filter(|tx| !tx.is_closed()).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracked(subscribers: &Subscribers) -> Vec<String> {
        let map = subscribers.by_collection.lock().unwrap();
        let mut keys: Vec<String> = map.keys().cloned().collect();
        keys.sort();
        keys
    }

    #[tokio::test]
    async fn test_publish_forgets_collection_without_receivers() {
        let subscribers = Subscribers::new();
        let gone = subscribers.attach("drafts", Ok(Vec::new()));
        let mut kept = subscribers.attach("projects", Ok(Vec::new()));
        drop(gone);

        subscribers.publish("drafts", Ok(Vec::new()));
        subscribers.publish("projects", Ok(Vec::new()));
        assert_eq!(tracked(&subscribers), vec!["projects".to_string()]);

        assert!(kept.next().await.unwrap().unwrap().is_empty());
        assert!(kept.next().await.unwrap().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_close_ends_streams_after_queued_events() {
        let subscribers = Subscribers::new();
        let mut sub = subscribers.attach("projects", Ok(Vec::new()));

        subscribers.close("projects");
        assert!(tracked(&subscribers).is_empty());
        assert!(sub.next().await.unwrap().is_ok());
        assert!(sub.next().await.is_none());
    }
}
