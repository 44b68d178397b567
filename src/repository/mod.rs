//! Repository Layer
//!
//! The remote store boundary and its implementations.

mod traits;
mod subscribers;
mod memory;
mod db;


pub use traits::{RemoteListStore, SnapshotEvent, Subscription};
pub use memory::MemoryStore;
pub use db::{init_db, SqliteStore};
