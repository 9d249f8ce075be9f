//! Time source used for entry timestamps and expiry checks.

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Clock the engine reads when stamping and expiring entries.
///
/// Expiry uses wall-clock milliseconds since the Unix epoch, with no grace
/// period or skew compensation. The manual variant shares its instant across
/// clones so tests can advance time without sleeping.
#[derive(Clone, Debug)]
pub enum Clock {
  /// Wall clock.
  System,
  /// Manually driven clock (epoch milliseconds).
  Manual(Arc<AtomicI64>),
}

impl Clock {
  pub fn system() -> Self {
    Clock::System
  }

  /// A manual clock starting at the given epoch-millisecond instant.
  pub fn manual(start_ms: i64) -> Self {
    Clock::Manual(Arc::new(AtomicI64::new(start_ms)))
  }

  /// Current time in milliseconds since the Unix epoch.
  pub fn now_ms(&self) -> i64 {
    match self {
      Clock::System => Utc::now().timestamp_millis(),
      Clock::Manual(ms) => ms.load(Ordering::SeqCst),
    }
  }

  /// Advance a manual clock. Has no effect on the system clock.
  pub fn advance(&self, by: Duration) {
    if let Clock::Manual(ms) = self {
      ms.fetch_add(by.as_millis() as i64, Ordering::SeqCst);
    }
  }
}

impl Default for Clock {
  fn default() -> Self {
    Clock::System
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_manual_clock_advances() {
    let clock = Clock::manual(1_000);
    assert_eq!(clock.now_ms(), 1_000);
    clock.advance(Duration::from_millis(500));
    assert_eq!(clock.now_ms(), 1_500);
  }

  #[test]
  fn test_manual_clock_shared_across_clones() {
    let clock = Clock::manual(0);
    let other = clock.clone();
    clock.advance(Duration::from_secs(1));
    assert_eq!(other.now_ms(), 1_000);
  }
}
