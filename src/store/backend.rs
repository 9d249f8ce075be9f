//! Cache backend trait and SQLite implementation.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::entry::{CacheEntry, Collection};
use crate::error::{CacheError, Result};

/// Raw row as the backend sees it: the payload is opaque JSON.
pub type RawEntry = CacheEntry<serde_json::Value>;

/// Trait for persistence backends.
///
/// Implementations store the full envelope verbatim; liveness decisions
/// belong to the engine above. All operations are keyed by collection, and
/// `get_all` makes no ordering guarantee.
pub trait CacheBackend: Send + Sync {
  /// Upsert an entry (overwrite semantics on an existing id).
  fn put(&self, collection: Collection, entry: &RawEntry) -> Result<()>;

  /// Fetch one entry by id.
  fn get(&self, collection: Collection, id: &str) -> Result<Option<RawEntry>>;

  /// Fetch every entry in a collection.
  fn get_all(&self, collection: Collection) -> Result<Vec<RawEntry>>;

  /// Remove an entry. Succeeds as a no-op if absent.
  fn delete(&self, collection: Collection, id: &str) -> Result<()>;

  /// Remove every entry in a collection.
  fn clear(&self, collection: Collection) -> Result<()>;

  /// Remove entries whose `expires_at` is at or before `now_ms`.
  /// Returns how many were removed.
  fn delete_expired(&self, collection: Collection, now_ms: i64) -> Result<usize>;

  /// Raw entry count, live and stale alike.
  fn count(&self, collection: Collection) -> Result<u64>;
}

/// SQLite-backed persistence.
///
/// One table holds every collection, keyed `(collection, id)`, with
/// secondary indexes on `timestamp` and `expires_at` (the sweep scans the
/// latter). Provisioning is idempotent.
pub struct SqliteBackend {
  conn: Mutex<Connection>,
}

/// Schema for the cache table.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS cache_entries (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    data TEXT NOT NULL,
    timestamp INTEGER NOT NULL,
    expires_at INTEGER,
    version TEXT NOT NULL,
    PRIMARY KEY (collection, id)
);

CREATE INDEX IF NOT EXISTS idx_cache_entries_timestamp
    ON cache_entries(collection, timestamp);

CREATE INDEX IF NOT EXISTS idx_cache_entries_expires
    ON cache_entries(collection, expires_at);
"#;

impl SqliteBackend {
  /// Open (creating if absent) the database at the default location.
  pub fn open_default() -> Result<Self> {
    let path = Self::default_path()?;

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| CacheError::unavailable(format!("failed to create cache directory: {e}")))?;
    }

    Self::open(&path)
  }

  /// Open (creating if absent) the database at the given path.
  pub fn open(path: &Path) -> Result<Self> {
    let conn = Connection::open(path).map_err(|e| {
      CacheError::unavailable(format!(
        "failed to open cache database at {}: {e}",
        path.display()
      ))
    })?;

    Self::provision(conn)
  }

  /// In-memory database, gone when the backend is dropped.
  pub fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory()
      .map_err(|e| CacheError::unavailable(format!("failed to open in-memory database: {e}")))?;

    Self::provision(conn)
  }

  /// Default database path under the platform data directory.
  fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| CacheError::unavailable("could not determine data directory"))?;

    Ok(data_dir.join("carteira").join("cache.db"))
  }

  fn provision(conn: Connection) -> Result<Self> {
    conn
      .execute_batch(SCHEMA)
      .map_err(|e| CacheError::unavailable(format!("failed to provision cache schema: {e}")))?;

    Ok(Self {
      conn: Mutex::new(conn),
    })
  }

  fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
    self
      .conn
      .lock()
      .map_err(|_| CacheError::unavailable("connection lock poisoned"))
  }
}

impl CacheBackend for SqliteBackend {
  fn put(&self, collection: Collection, entry: &RawEntry) -> Result<()> {
    let conn = self.conn()?;
    let data = serde_json::to_string(&entry.data).map_err(CacheError::write)?;

    conn
      .execute(
        "INSERT OR REPLACE INTO cache_entries (collection, id, data, timestamp, expires_at, version)
         VALUES (?, ?, ?, ?, ?, ?)",
        params![
          collection.as_str(),
          entry.id,
          data,
          entry.timestamp,
          entry.expires_at,
          entry.version
        ],
      )
      .map_err(CacheError::write)?;

    Ok(())
  }

  fn get(&self, collection: Collection, id: &str) -> Result<Option<RawEntry>> {
    let conn = self.conn()?;

    let mut stmt = conn
      .prepare(
        "SELECT id, data, timestamp, expires_at, version FROM cache_entries
         WHERE collection = ? AND id = ?",
      )
      .map_err(CacheError::read)?;

    let row: Option<(String, String, i64, Option<i64>, String)> = stmt
      .query_row(params![collection.as_str(), id], |row| {
        Ok((
          row.get(0)?,
          row.get(1)?,
          row.get(2)?,
          row.get(3)?,
          row.get(4)?,
        ))
      })
      .optional()
      .map_err(CacheError::read)?;

    match row {
      Some((id, data, timestamp, expires_at, version)) => {
        let data = serde_json::from_str(&data).map_err(CacheError::read)?;
        Ok(Some(RawEntry {
          id,
          data,
          timestamp,
          expires_at,
          version,
        }))
      }
      None => Ok(None),
    }
  }

  fn get_all(&self, collection: Collection) -> Result<Vec<RawEntry>> {
    let conn = self.conn()?;

    let mut stmt = conn
      .prepare(
        "SELECT id, data, timestamp, expires_at, version FROM cache_entries
         WHERE collection = ?",
      )
      .map_err(CacheError::read)?;

    let rows: Vec<(String, String, i64, Option<i64>, String)> = stmt
      .query_map(params![collection.as_str()], |row| {
        Ok((
          row.get(0)?,
          row.get(1)?,
          row.get(2)?,
          row.get(3)?,
          row.get(4)?,
        ))
      })
      .map_err(CacheError::read)?
      .collect::<rusqlite::Result<_>>()
      .map_err(CacheError::read)?;

    let mut entries = Vec::with_capacity(rows.len());
    for (id, data, timestamp, expires_at, version) in rows {
      let data = serde_json::from_str(&data).map_err(CacheError::read)?;
      entries.push(RawEntry {
        id,
        data,
        timestamp,
        expires_at,
        version,
      });
    }

    Ok(entries)
  }

  fn delete(&self, collection: Collection, id: &str) -> Result<()> {
    let conn = self.conn()?;

    conn
      .execute(
        "DELETE FROM cache_entries WHERE collection = ? AND id = ?",
        params![collection.as_str(), id],
      )
      .map_err(CacheError::write)?;

    Ok(())
  }

  fn clear(&self, collection: Collection) -> Result<()> {
    let conn = self.conn()?;

    conn
      .execute(
        "DELETE FROM cache_entries WHERE collection = ?",
        params![collection.as_str()],
      )
      .map_err(CacheError::write)?;

    Ok(())
  }

  fn delete_expired(&self, collection: Collection, now_ms: i64) -> Result<usize> {
    let conn = self.conn()?;

    let removed = conn
      .execute(
        "DELETE FROM cache_entries
         WHERE collection = ? AND expires_at IS NOT NULL AND expires_at <= ?",
        params![collection.as_str(), now_ms],
      )
      .map_err(CacheError::write)?;

    Ok(removed)
  }

  fn count(&self, collection: Collection) -> Result<u64> {
    let conn = self.conn()?;

    let count: i64 = conn
      .query_row(
        "SELECT COUNT(*) FROM cache_entries WHERE collection = ?",
        params![collection.as_str()],
        |row| row.get(0),
      )
      .map_err(CacheError::read)?;

    Ok(count as u64)
  }
}
