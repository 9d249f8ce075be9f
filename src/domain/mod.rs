//! Domain payload types and their per-collection cache policies.

mod cache;

pub use cache::OfflineCache;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::store::Collection;

/// Cache policy for a domain type: which collection it persists into and
/// how long an entry stays trustworthy.
pub trait Cached: Serialize + DeserializeOwned {
  /// Collection the type persists into.
  fn collection() -> Collection;

  /// Key within the collection.
  fn cache_key(&self) -> String;

  /// How long a written entry stays fresh. `None` means it never expires.
  fn ttl() -> Option<Duration>;
}

/// Payment status of a benefit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BenefitStatus {
  Active,
  Suspended,
  Cancelled,
}

/// A social benefit as shown in the wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitData {
  pub id: String,
  pub name: String,
  pub status: BenefitStatus,
  pub value: f64,
  pub last_payment: String,
  pub next_payment: String,
  /// Re-registration deadline, when one is scheduled.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub recadastro_date: Option<String>,
}

/// Geographic position of an agency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
  pub lat: f64,
  pub lng: f64,
}

/// A bank agency servicing benefit withdrawals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgencyData {
  pub id: String,
  pub name: String,
  pub address: String,
  pub phone: String,
  pub services: Vec<String>,
  pub coordinates: Coordinates,
  /// Distance from the user's last known position, in km.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub distance: Option<f64>,
}

/// A document uploaded by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentData {
  pub id: String,
  pub name: String,
  #[serde(rename = "type")]
  pub doc_type: String,
  pub url: String,
  pub upload_date: String,
  /// Size in bytes.
  pub size: u64,
}

impl Cached for BenefitData {
  fn collection() -> Collection {
    Collection::Benefits
  }

  fn cache_key(&self) -> String {
    self.id.clone()
  }

  // Benefit status follows payment cycles; a day is as long as it can be
  // trusted stale.
  fn ttl() -> Option<Duration> {
    Some(Duration::from_secs(24 * 60 * 60))
  }
}

impl Cached for AgencyData {
  fn collection() -> Collection {
    Collection::Agencies
  }

  fn cache_key(&self) -> String {
    self.id.clone()
  }

  // Agency listings change rarely.
  fn ttl() -> Option<Duration> {
    Some(Duration::from_secs(7 * 24 * 60 * 60))
  }
}

impl Cached for DocumentData {
  fn collection() -> Collection {
    Collection::Documents
  }

  fn cache_key(&self) -> String {
    self.id.clone()
  }

  // User-owned artifacts have no natural expiry.
  fn ttl() -> Option<Duration> {
    None
  }
}
