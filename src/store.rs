//! Materialized List View
//!
//! The sorted, read-only copy of a collection derived from one snapshot.

use std::cmp::Ordering;

use crate::domain::{Entity, Item, ItemId};

/// Items of one snapshot, ascending by `order`
///
/// Items without an order come last. Ties are broken by id so the result
/// does not depend on the order the snapshot listed its documents in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderedList {
    items: Vec<Item>,
}

fn display_order(a: &Item, b: &Item) -> Ordering {
    let key = |item: &Item| (item.order.is_none(), item.order.unwrap_or_default());
    key(a).cmp(&key(b)).then_with(|| a.id.cmp(&b.id))
}

impl OrderedList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the view from a full snapshot, discarding nothing but its order
    pub fn from_snapshot(mut items: Vec<Item>) -> Self {
        items.sort_by(display_order);
        Self { items }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    /// Ids in display order
    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id().clone()).collect()
    }

    /// Highest order key, absent keys counted as 0; 0 for an empty list
    pub fn max_order(&self) -> i64 {
        self.items
            .iter()
            .map(|item| item.order.unwrap_or(0))
            .max()
            .unwrap_or(0)
    }

    pub fn position_of(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }
}
