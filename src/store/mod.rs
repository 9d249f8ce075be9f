//! Generic offline cache store: named collections of TTL-wrapped entries.
//!
//! The engine wraps every payload in a [`CacheEntry`] envelope, enforces
//! expiry lazily on reads, and offers a proactive sweep over all
//! collections. Persistence goes through the [`CacheBackend`] trait; the
//! default backend is SQLite.

mod backend;
mod entry;
mod sweep;

pub use backend::{CacheBackend, RawEntry, SqliteBackend};
pub use entry::{CacheEntry, Collection, SCHEMA_VERSION};
pub use sweep::spawn_sweeper;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::error::{CacheError, Result};

/// Sentinel for "no sweep has run yet".
const NEVER: i64 = i64::MIN;

/// Aggregate cache statistics.
///
/// Counts are raw cardinalities per collection: stale entries that the
/// sweep has not yet removed are included, so counts can overstate live
/// data (see [`CacheStore::get_all`]).
#[derive(Debug, Clone)]
pub struct CacheStats {
  /// Raw entry count across all collections.
  pub total_items: u64,
  /// Raw entry count per collection.
  pub store_stats: HashMap<Collection, u64>,
  /// When the last proactive sweep ran, if any.
  pub last_cleanup: Option<DateTime<Utc>>,
}

/// The offline cache engine.
///
/// An explicit value with caller-controlled lifecycle: opening provisions
/// the schema, dropping releases the backend handle. There is no global
/// instance; share a store by wrapping it in an `Arc`.
pub struct CacheStore<B: CacheBackend = SqliteBackend> {
  backend: B,
  clock: Clock,
  /// Epoch ms of the last completed sweep.
  last_cleanup: AtomicI64,
}

impl CacheStore {
  /// Open the cache database at the default platform data directory.
  pub fn open() -> Result<Self> {
    Ok(Self::with_backend(
      SqliteBackend::open_default()?,
      Clock::system(),
    ))
  }

  /// Open the cache database at the given path.
  pub fn open_at(path: &Path) -> Result<Self> {
    Ok(Self::with_backend(SqliteBackend::open(path)?, Clock::system()))
  }

  /// In-memory store, gone when dropped.
  pub fn open_in_memory() -> Result<Self> {
    Ok(Self::with_backend(
      SqliteBackend::open_in_memory()?,
      Clock::system(),
    ))
  }
}

impl<B: CacheBackend> CacheStore<B> {
  /// Build a store over an explicit backend and clock.
  pub fn with_backend(backend: B, clock: Clock) -> Self {
    Self {
      backend,
      clock,
      last_cleanup: AtomicI64::new(NEVER),
    }
  }

  pub fn clock(&self) -> &Clock {
    &self.clock
  }

  /// Upsert `data` under `id`, stamped now and expiring after `ttl`.
  ///
  /// `None` means the entry never expires. A zero `ttl` is accepted as-is
  /// and produces an entry that is already stale on the next read.
  pub async fn set<T: Serialize>(
    &self,
    collection: Collection,
    id: &str,
    data: &T,
    ttl: Option<Duration>,
  ) -> Result<()> {
    let now = self.clock.now_ms();

    let entry = RawEntry {
      id: id.to_string(),
      data: serde_json::to_value(data).map_err(CacheError::write)?,
      timestamp: now,
      expires_at: ttl.map(|d| now + d.as_millis() as i64),
      version: SCHEMA_VERSION.to_string(),
    };

    self.backend.put(collection, &entry)
  }

  /// Fetch the payload under `id`, or `None` if absent or expired.
  ///
  /// An expired entry is removed on access; removal is best-effort and
  /// never fails the read.
  pub async fn get<T: DeserializeOwned>(
    &self,
    collection: Collection,
    id: &str,
  ) -> Result<Option<T>> {
    let entry = match self.backend.get(collection, id)? {
      Some(entry) => entry,
      None => return Ok(None),
    };

    if !entry.is_live(self.clock.now_ms()) {
      if let Err(e) = self.backend.delete(collection, id) {
        warn!(collection = %collection, id, error = %e, "failed to remove expired entry");
      }
      return Ok(None);
    }

    let data = serde_json::from_value(entry.data).map_err(CacheError::read)?;
    Ok(Some(data))
  }

  /// Fetch every live payload in a collection, in unspecified order.
  ///
  /// Expired rows are filtered out but left in place for the sweep to
  /// collect: bulk reads stay write-free, at the cost of raw counts
  /// overstating live data until the next sweep.
  pub async fn get_all<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>> {
    let now = self.clock.now_ms();

    let mut items = Vec::new();
    for entry in self.backend.get_all(collection)? {
      if !entry.is_live(now) {
        continue;
      }
      items.push(serde_json::from_value(entry.data).map_err(CacheError::read)?);
    }

    Ok(items)
  }

  /// Remove the entry under `id`. Succeeds as a no-op if absent.
  pub async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
    self.backend.delete(collection, id)
  }

  /// Remove every entry in a collection.
  pub async fn clear(&self, collection: Collection) -> Result<()> {
    self.backend.clear(collection)
  }

  /// Sweep expired entries out of every collection.
  ///
  /// Best-effort per collection: one collection's failure is logged and
  /// the sweep moves on to the rest.
  pub async fn clear_expired(&self) -> Result<()> {
    let now = self.clock.now_ms();

    for collection in Collection::ALL {
      match self.backend.delete_expired(collection, now) {
        Ok(0) => {}
        Ok(removed) => {
          debug!(collection = %collection, removed, "swept expired entries");
        }
        Err(e) => {
          warn!(collection = %collection, error = %e, "sweep failed for collection");
        }
      }
    }

    self.last_cleanup.store(now, Ordering::SeqCst);
    Ok(())
  }

  /// Raw entry counts per collection plus the last sweep time.
  pub async fn stats(&self) -> Result<CacheStats> {
    let mut store_stats = HashMap::new();
    let mut total_items = 0;

    for collection in Collection::ALL {
      let count = self.backend.count(collection)?;
      total_items += count;
      store_stats.insert(collection, count);
    }

    let last_cleanup = match self.last_cleanup.load(Ordering::SeqCst) {
      NEVER => None,
      ms => DateTime::from_timestamp_millis(ms),
    };

    Ok(CacheStats {
      total_items,
      store_stats,
      last_cleanup,
    })
  }
}
