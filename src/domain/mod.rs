//! Domain Layer
//!
//! Showcase items and the errors shared by every layer above.
//! This layer has NO external dependencies (except serde and thiserror).

mod entity;
mod item;

pub use entity::{DomainError, DomainResult, Entity};
pub use item::{Item, ItemFields, ItemId, NewItem, OrderUpdate};
