//! Persisted record envelope and the fixed collection set.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CacheError;

/// Schema version tag written into every entry.
pub const SCHEMA_VERSION: &str = "1";

/// The fixed set of collections in the cache database.
///
/// Collections are declared statically so the persistence boundary is
/// checked at compile time; string names only appear at parse edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
  Benefits,
  Agencies,
  Documents,
  Notifications,
  Settings,
  UserProfile,
}

impl Collection {
  /// Every collection, in provisioning order.
  pub const ALL: [Collection; 6] = [
    Collection::Benefits,
    Collection::Agencies,
    Collection::Documents,
    Collection::Notifications,
    Collection::Settings,
    Collection::UserProfile,
  ];

  /// Stable name used as the namespace key in the backend.
  pub fn as_str(&self) -> &'static str {
    match self {
      Collection::Benefits => "benefits",
      Collection::Agencies => "agencies",
      Collection::Documents => "documents",
      Collection::Notifications => "notifications",
      Collection::Settings => "settings",
      Collection::UserProfile => "userProfile",
    }
  }
}

impl fmt::Display for Collection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Collection {
  type Err = CacheError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "benefits" => Ok(Collection::Benefits),
      "agencies" => Ok(Collection::Agencies),
      "documents" => Ok(Collection::Documents),
      "notifications" => Ok(Collection::Notifications),
      "settings" => Ok(Collection::Settings),
      "userProfile" => Ok(Collection::UserProfile),
      other => Err(CacheError::UnknownCollection(other.to_string())),
    }
  }
}

/// Envelope wrapped around every persisted payload.
///
/// Consumers never see the envelope; adapters unwrap `data` on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<T> {
  /// Primary key within the collection.
  pub id: String,
  /// The opaque payload.
  pub data: T,
  /// Creation/update time, milliseconds since the Unix epoch.
  pub timestamp: i64,
  /// Absent means the entry never expires.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub expires_at: Option<i64>,
  /// Schema version that wrote the entry.
  pub version: String,
}

impl<T> CacheEntry<T> {
  /// An entry is live if it has no expiry or the expiry has not passed.
  pub fn is_live(&self, now_ms: i64) -> bool {
    match self.expires_at {
      None => true,
      Some(at) => now_ms <= at,
    }
  }
}
