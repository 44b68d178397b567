//! SQLite Store
//!
//! `RemoteListStore` backed by a local SQLite database. Every collection
//! lives in one `items` table keyed by `(collection, id)`; snapshots are
//! re-read after each committed write and pushed to subscribers.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult, Item, ItemFields, ItemId, OrderUpdate};
use super::subscribers::Subscribers;
use super::traits::{RemoteListStore, Subscription};

fn store_err(e: rusqlite::Error) -> DomainError {
    DomainError::StoreUnavailable(e.to_string())
}

/// Open the database at `db_path` and run migrations
pub fn init_db(db_path: &Path) -> DomainResult<Connection> {
    let conn = Connection::open(db_path).map_err(store_err)?;
    run_migrations(&conn)?;
    Ok(conn)
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS items (
            collection TEXT NOT NULL,
            id TEXT NOT NULL,
            url TEXT NOT NULL,
            title TEXT,
            description TEXT,
            position INTEGER,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            PRIMARY KEY (collection, id)
        )",
        [],
    )
    .map_err(store_err)?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_items_position ON items(collection, position)",
        [],
    )
    .map_err(store_err)?;

    Ok(())
}

fn read_snapshot(conn: &Connection, collection: &str) -> DomainResult<Vec<Item>> {
    let mut stmt = conn
        .prepare("SELECT id, url, title, description, position FROM items WHERE collection = ?1")
        .map_err(store_err)?;
    let rows = stmt
        .query_map(params![collection], |row| {
            Ok(Item {
                id: ItemId::new(row.get::<_, String>(0)?),
                url: row.get(1)?,
                title: row.get(2)?,
                description: row.get(3)?,
                order: row.get(4)?,
            })
        })
        .map_err(store_err)?;

    let mut items = Vec::new();
    for row in rows {
        items.push(row.map_err(store_err)?);
    }
    Ok(items)
}

/// SQLite implementation of the remote list store
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    subscribers: Subscribers,
}

impl SqliteStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            conn,
            subscribers: Subscribers::new(),
        }
    }

    /// Open (creating if needed) a database file
    pub fn open(db_path: &Path) -> DomainResult<Self> {
        let conn = init_db(db_path)?;
        log::info!("Opened item store at {}", db_path.display());
        Ok(Self::new(Arc::new(Mutex::new(conn))))
    }

    pub fn open_in_memory() -> DomainResult<Self> {
        let conn = Connection::open_in_memory().map_err(store_err)?;
        run_migrations(&conn)?;
        Ok(Self::new(Arc::new(Mutex::new(conn))))
    }

    /// Last modification time of a document, in milliseconds since the epoch
    pub async fn updated_at(&self, collection: &str, id: &ItemId) -> DomainResult<Option<i64>> {
        let conn = self.conn.lock().await;
        conn.query_row(
            "SELECT updated_at FROM items WHERE collection = ?1 AND id = ?2",
            params![collection, id.as_str()],
            |row| row.get::<_, i64>(0),
        )
        .optional()
        .map_err(store_err)
    }

    fn publish(&self, conn: &Connection, collection: &str) {
        let event = read_snapshot(conn, collection);
        if let Err(e) = &event {
            log::warn!("Snapshot read for '{}' failed: {}", collection, e);
        }
        self.subscribers.publish(collection, event);
    }
}

#[async_trait]
impl RemoteListStore for SqliteStore {
    async fn subscribe(&self, collection: &str) -> DomainResult<Subscription> {
        let conn = self.conn.lock().await;
        let initial = read_snapshot(&conn, collection)?;
        Ok(self.subscribers.attach(collection, Ok(initial)))
    }

    async fn create(&self, collection: &str, fields: ItemFields) -> DomainResult<ItemId> {
        let conn = self.conn.lock().await;
        let id = uuid::Uuid::new_v4().to_string();
        let now = chrono::Utc::now().timestamp_millis();

        conn.execute(
            "INSERT INTO items (collection, id, url, title, description, position, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            params![collection, id, fields.url, fields.title, fields.description, fields.order, now],
        )
        .map_err(store_err)?;

        self.publish(&conn, collection);
        Ok(ItemId::new(id))
    }

    async fn delete(&self, collection: &str, id: &ItemId) -> DomainResult<()> {
        let conn = self.conn.lock().await;
        let removed = conn
            .execute(
                "DELETE FROM items WHERE collection = ?1 AND id = ?2",
                params![collection, id.as_str()],
            )
            .map_err(store_err)?;

        if removed == 0 {
            return Err(DomainError::NotFound(format!("Item {} not found", id)));
        }
        self.publish(&conn, collection);
        Ok(())
    }

    async fn atomic_update(&self, collection: &str, updates: &[OrderUpdate]) -> DomainResult<()> {
        let mut conn = self.conn.lock().await;
        let now = chrono::Utc::now().timestamp_millis();

        {
            // Dropping the transaction without commit rolls every row back
            let tx = conn.transaction().map_err(store_err)?;
            for update in updates {
                let changed = tx
                    .execute(
                        "UPDATE items SET position = ?1, updated_at = ?2 WHERE collection = ?3 AND id = ?4",
                        params![update.order, now, collection, update.id.as_str()],
                    )
                    .map_err(store_err)?;
                if changed == 0 {
                    return Err(DomainError::NotFound(format!("Item {} not found", update.id)));
                }
            }
            tx.commit().map_err(store_err)?;
        }

        self.publish(&conn, collection);
        Ok(())
    }
}
