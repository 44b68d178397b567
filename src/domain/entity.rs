//! Domain Layer - Core Entity Trait
//!
//! This trait defines the basic contract for all domain entities.
//! All entities must have a unique ID and be thread-safe.

use serde::{Deserialize, Serialize};

/// Core trait for all domain entities
pub trait Entity: Sized + Send + Sync + Clone {
    /// The type of the entity's unique identifier
    type Id: Clone + Eq + std::hash::Hash + Send + Sync;

    /// Returns the entity's unique identifier
    fn id(&self) -> &Self::Id;
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
///
/// A renumbering that is silently superseded by a later one from another
/// editor is not an error: the store applies last-write-wins and the next
/// snapshot carries the winning order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum DomainError {
    /// Required field missing, rejected before any store call
    #[error("Invalid input: {0}")]
    Validation(String),
    /// Delete or update referencing a document the store does not have
    #[error("Not found: {0}")]
    NotFound(String),
    /// Subscription or write failed in the backend
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    /// A renumbering write for this list has not completed yet
    #[error("Reorder already in flight")]
    ReorderInFlight,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
