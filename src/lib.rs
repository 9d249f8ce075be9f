//! Offline cache engine for the Carteira Digital de Benefícios Sociais
//! client.
//!
//! The wallet UI keeps working through connectivity gaps by reading and
//! writing a local cache instead of talking to anything live. This crate
//! is that cache:
//!
//! - [`CacheStore`]: a generic key-value store over SQLite with six fixed
//!   [`Collection`]s, every payload wrapped in a timestamped, optionally
//!   expiring [`CacheEntry`] envelope. Expiry is enforced lazily on point
//!   reads and proactively by [`spawn_sweeper`].
//! - [`OfflineCache`]: the typed facade the UI consumes — benefits expire
//!   after a day, agencies after a week, documents and settings never.
//! - [`ConnectivityMonitor`]: the ambient online/offline signal, with
//!   `sync_when_online` deferring a callback until connectivity returns.
//!
//! Alternative backends plug in through [`CacheBackend`].

mod clock;
mod domain;
mod error;
mod store;
mod sync;

pub use clock::Clock;
pub use domain::{
  AgencyData, BenefitData, BenefitStatus, Cached, Coordinates, DocumentData, OfflineCache,
};
pub use error::{CacheError, Result};
pub use store::{
  spawn_sweeper, CacheBackend, CacheEntry, CacheStats, CacheStore, Collection, RawEntry,
  SqliteBackend, SCHEMA_VERSION,
};
pub use sync::ConnectivityMonitor;
