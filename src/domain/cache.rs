//! Typed cache facade consumed by the wallet UI layer.

use std::future::Future;
use std::sync::Arc;

use crate::error::Result;
use crate::store::{CacheBackend, CacheStats, CacheStore, Collection, SqliteBackend};
use crate::sync::ConnectivityMonitor;

use super::{AgencyData, BenefitData, Cached, DocumentData};

/// Fixed key of the single settings slot.
const SETTINGS_KEY: &str = "user-settings";

/// Offline cache with typed accessors per domain collection.
///
/// This is the whole surface the presentation layer sees: TTL policy and
/// collection routing are fixed here, the generic store stays hidden.
/// Clones are cheap and share the store and the connectivity signal.
pub struct OfflineCache<B: CacheBackend = SqliteBackend> {
  store: Arc<CacheStore<B>>,
  connectivity: ConnectivityMonitor,
}

impl<B: CacheBackend> Clone for OfflineCache<B> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
      connectivity: self.connectivity.clone(),
    }
  }
}

impl OfflineCache {
  /// Open the cache at the default location, assuming connectivity until
  /// the platform reports otherwise.
  pub fn open() -> Result<Self> {
    Ok(Self::new(
      Arc::new(CacheStore::open()?),
      ConnectivityMonitor::new(true),
    ))
  }
}

impl<B: CacheBackend> OfflineCache<B> {
  pub fn new(store: Arc<CacheStore<B>>, connectivity: ConnectivityMonitor) -> Self {
    Self {
      store,
      connectivity,
    }
  }

  /// The underlying generic store, for hosts scheduling their own sweep.
  pub fn store(&self) -> &Arc<CacheStore<B>> {
    &self.store
  }

  pub fn connectivity(&self) -> &ConnectivityMonitor {
    &self.connectivity
  }

  /// Save one item under its type's collection and TTL policy.
  pub async fn save<T: Cached>(&self, item: &T) -> Result<()> {
    self
      .store
      .set(T::collection(), &item.cache_key(), item, T::ttl())
      .await
  }

  /// Save a batch of items, each under its own key.
  pub async fn save_all<T: Cached>(&self, items: &[T]) -> Result<()> {
    for item in items {
      self.save(item).await?;
    }
    Ok(())
  }

  pub async fn save_benefits(&self, benefits: &[BenefitData]) -> Result<()> {
    self.save_all(benefits).await
  }

  pub async fn get_benefits(&self) -> Result<Vec<BenefitData>> {
    self.store.get_all(Collection::Benefits).await
  }

  pub async fn get_benefit(&self, id: &str) -> Result<Option<BenefitData>> {
    self.store.get(Collection::Benefits, id).await
  }

  pub async fn save_agencies(&self, agencies: &[AgencyData]) -> Result<()> {
    self.save_all(agencies).await
  }

  pub async fn get_agencies(&self) -> Result<Vec<AgencyData>> {
    self.store.get_all(Collection::Agencies).await
  }

  pub async fn save_document(&self, document: &DocumentData) -> Result<()> {
    self.save(document).await
  }

  pub async fn get_documents(&self) -> Result<Vec<DocumentData>> {
    self.store.get_all(Collection::Documents).await
  }

  pub async fn delete_document(&self, id: &str) -> Result<()> {
    self.store.delete(Collection::Documents, id).await
  }

  /// Store user settings under the single fixed slot. The payload shape is
  /// the caller's business; settings never expire.
  pub async fn save_settings(&self, settings: &serde_json::Value) -> Result<()> {
    self
      .store
      .set(Collection::Settings, SETTINGS_KEY, settings, None)
      .await
  }

  pub async fn get_settings(&self) -> Result<Option<serde_json::Value>> {
    self.store.get(Collection::Settings, SETTINGS_KEY).await
  }

  /// Sweep expired entries out of every collection.
  pub async fn clear_expired(&self) -> Result<()> {
    self.store.clear_expired().await
  }

  /// Empty every collection.
  pub async fn clear_all(&self) -> Result<()> {
    for collection in Collection::ALL {
      self.store.clear(collection).await?;
    }
    Ok(())
  }

  pub async fn stats(&self) -> Result<CacheStats> {
    self.store.stats().await
  }

  pub fn is_online(&self) -> bool {
    self.connectivity.is_online()
  }

  /// See [`ConnectivityMonitor::sync_when_online`].
  pub async fn sync_when_online<F, Fut, T, E>(&self, callback: F) -> std::result::Result<T, E>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
  {
    self.connectivity.sync_when_online(callback).await
  }
}
