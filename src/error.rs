//! Error taxonomy for the offline cache.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Errors surfaced by the cache engine.
///
/// An expired or missing entry is not an error: reads report it as `None`.
#[derive(Debug, Error)]
pub enum CacheError {
  /// Persistent storage cannot be opened or provisioned in this
  /// environment (no usable data directory, unreadable database file).
  #[error("persistent storage unavailable: {reason}")]
  StorageUnavailable { reason: String },

  /// A collection name outside the fixed set was referenced. Only
  /// reachable through the string-parsing surface; the typed API makes
  /// this unrepresentable.
  #[error("unknown collection `{0}`")]
  UnknownCollection(String),

  /// Backend failure while reading, including payload deserialization.
  #[error("cache read failed")]
  Read {
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },

  /// Backend failure while writing, including payload serialization.
  #[error("cache write failed")]
  Write {
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },
}

impl CacheError {
  pub(crate) fn unavailable(reason: impl Into<String>) -> Self {
    Self::StorageUnavailable {
      reason: reason.into(),
    }
  }

  pub(crate) fn read(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
    Self::Read {
      source: source.into(),
    }
  }

  pub(crate) fn write(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
    Self::Write {
      source: source.into(),
    }
  }
}
