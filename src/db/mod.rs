//! Record store for journal entries.
//!
//! Entries are kept in a SQLite database (optionally encrypted with SQLCipher)
//! behind an r2d2 connection pool. Callers depend on the [`EntryStore`] trait
//! rather than on [`Database`] directly, so tests and tools can substitute
//! their own store.
//!
//! # Module Structure
//!
//! - `schema`: Table definitions and schema initialization
//! - `entries`: Insert and query operations on entries
//!
//! # Example
//!
//! ```no_run
//! use fieldnotes::db::{Database, EntryStore, SortOrder};
//! use std::path::Path;
//!
//! let db = Database::open(Path::new("/tmp/fieldnotes.db"), None)?;
//! db.initialize_schema()?;
//! for stored in db.query_all(SortOrder::Descending)? {
//!     println!("{} {}", stored.id, stored.entry.location);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod entries;
pub mod schema;

use crate::entry::{EntryId, JournalEntry, StoredEntry};
use crate::errors::{AppResult, DatabaseError};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;
use tracing::{debug, info};

/// Type alias for a pooled SQLite connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Ordering of entries by timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Oldest first.
    Ascending,
    /// Newest first.
    #[default]
    Descending,
}

/// Durable collection of journal entries.
///
/// Entries are append-only: there is no update or delete.
pub trait EntryStore {
    /// Appends one entry and returns its identifier once the write is committed.
    fn insert(&self, entry: &JournalEntry) -> AppResult<EntryId>;

    /// Returns every entry ordered by timestamp.
    ///
    /// Entries with equal timestamps keep insertion order, so the most
    /// recently inserted one is last when ascending and first when descending.
    fn query_all(&self, order: SortOrder) -> AppResult<Vec<StoredEntry>>;

    /// Returns entries whose location contains `needle`, ignoring case,
    /// newest first.
    fn query_by_location(&self, needle: &str) -> AppResult<Vec<StoredEntry>>;

    /// Looks up a single entry.
    fn get(&self, id: EntryId) -> AppResult<Option<StoredEntry>>;
}

/// Database handle with connection pooling.
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Opens or creates the database file.
    ///
    /// When `key` is given the file is encrypted with SQLCipher using it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Database file cannot be opened
    /// - Wrong key provided for an existing encrypted database
    /// - Connection pool cannot be initialized
    pub fn open(db_path: &Path, key: Option<&str>) -> AppResult<Self> {
        debug!("Opening database at: {:?}", db_path);

        let manager = SqliteConnectionManager::file(db_path);
        let pool = Pool::builder()
            .max_size(4)
            .connection_customizer(Box::new(SqlCipherConfig {
                key: key.map(str::to_string),
            }))
            .build(manager)
            .map_err(DatabaseError::Pool)?;

        // Touch the schema so a wrong key fails here rather than on first use
        let conn = pool.get().map_err(DatabaseError::Pool)?;
        conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(DatabaseError::Sqlite)?;
        drop(conn);

        info!("Database opened successfully");
        Ok(Database { pool })
    }

    /// Opens a private in-memory database.
    ///
    /// The pool holds a single connection, since every SQLite in-memory
    /// connection is its own database.
    pub fn open_in_memory() -> AppResult<Self> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(DatabaseError::Pool)?;
        Ok(Database { pool })
    }

    /// Gets a connection from the pool.
    pub fn get_conn(&self) -> AppResult<PooledConnection> {
        self.pool
            .get()
            .map_err(|e| DatabaseError::Pool(e).into())
    }

    /// Initializes the database schema.
    ///
    /// Creates all necessary tables and indexes if they don't exist.
    /// This is idempotent and safe to call multiple times.
    pub fn initialize_schema(&self) -> AppResult<()> {
        let conn = self.get_conn()?;
        schema::create_tables(&conn)?;
        info!("Database schema initialized");
        Ok(())
    }
}

impl EntryStore for Database {
    fn insert(&self, entry: &JournalEntry) -> AppResult<EntryId> {
        let conn = self.get_conn()?;
        entries::insert_entry(&conn, entry)
    }

    fn query_all(&self, order: SortOrder) -> AppResult<Vec<StoredEntry>> {
        let conn = self.get_conn()?;
        entries::list_entries(&conn, order)
    }

    fn query_by_location(&self, needle: &str) -> AppResult<Vec<StoredEntry>> {
        let conn = self.get_conn()?;
        entries::find_by_location(&conn, needle)
    }

    fn get(&self, id: EntryId) -> AppResult<Option<StoredEntry>> {
        let conn = self.get_conn()?;
        entries::get_entry(&conn, id)
    }
}

/// Connection customizer that sets the SQLCipher key pragma when a key is configured.
#[derive(Debug)]
struct SqlCipherConfig {
    key: Option<String>,
}

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for SqlCipherConfig {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        if let Some(key) = &self.key {
            conn.pragma_update(None, "key", key)?;
            conn.pragma_update(None, "cipher_page_size", 4096)?;
            conn.pragma_update(None, "kdf_iter", 256000)?;
            conn.pragma_update(None, "cipher_hmac_algorithm", "HMAC_SHA512")?;
            conn.pragma_update(None, "cipher_kdf_algorithm", "PBKDF2_HMAC_SHA512")?;
        }
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(())
    }

    fn on_release(&self, _conn: Connection) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::test_support::sample_entry;
    use tempfile::TempDir;

    #[test]
    fn test_database_open_and_connect() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let db = Database::open(&db_path, None).unwrap();
        let conn = db.get_conn().unwrap();

        let result: i32 = conn
            .query_row("SELECT 1 + 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(result, 2);
    }

    #[test]
    fn test_wrong_key_fails() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let db1 = Database::open(&db_path, Some("correct_key")).unwrap();
        db1.initialize_schema().unwrap();
        db1.insert(&sample_entry("Viveros", 0)).unwrap();
        drop(db1);

        // SQLCipher may accept the key and fail only on first read
        match Database::open(&db_path, Some("wrong_key")) {
            Err(_) => {}
            Ok(db2) => {
                let read = db2.query_all(SortOrder::Ascending);
                assert!(read.is_err(), "Expected read to fail with wrong key");
            }
        }
    }

    #[test]
    fn test_initialize_schema_idempotent() {
        let db = Database::open_in_memory().unwrap();
        db.initialize_schema().unwrap();
        db.initialize_schema().unwrap();
    }

    #[test]
    fn test_store_trait_on_in_memory_database() {
        let db = Database::open_in_memory().unwrap();
        db.initialize_schema().unwrap();
        let store: &dyn EntryStore = &db;

        let id = store.insert(&sample_entry("Viveros", 5)).unwrap();
        let fetched = store.get(id).unwrap().unwrap();
        assert_eq!(fetched.entry.location, "Viveros");
        assert_eq!(store.query_all(SortOrder::Descending).unwrap().len(), 1);
    }
}
